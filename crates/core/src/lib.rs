//! `causaldb-core`: event model and on-disk row encoding.
//!
//! This crate contains **pure** primitives (no file or network IO): the `Event`
//! value, its identifier type, and the fixed-width codec used by the storage layer.

pub mod codec;
pub mod error;
pub mod event;
pub mod id;

pub use codec::{decode, encode, Row, ROW_SIZE};
pub use error::{CodecError, DomainError, DomainResult};
pub use event::{truncate_payload, Event, MAX_DATA_LENGTH, MAX_PARENTS};
pub use id::EventId;
