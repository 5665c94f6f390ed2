//! Domain and codec error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of event construction. IO
/// concerns belong to the storage layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty payload where one is required).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An event declared more causal parents than a row can hold.
    #[error("too many parents: {count} (max {max})")]
    TooManyParents { count: usize, max: usize },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Failure to turn raw bytes back into an `Event`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("row has {actual} bytes, expected {expected}")]
    RowLength { expected: usize, actual: usize },

    /// The parent count byte is outside `0..=MAX_PARENTS`.
    #[error("corrupt row for event {id}: parent_count {parent_count}")]
    CorruptRow { id: u32, parent_count: u8 },
}
