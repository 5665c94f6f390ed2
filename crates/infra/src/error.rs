//! Storage error model.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use causaldb_core::{CodecError, DomainError};

/// Storage operation error.
///
/// `Io` is fatal for a session: the engine does not attempt partial-row recovery,
/// callers are expected to stop. The other variants describe bad input.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Rejection from the in-memory mirror.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("event table is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}
