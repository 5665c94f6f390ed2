//! Storage layer: append-only event file, in-memory mirror, and the command protocol.

pub mod command;
pub mod config;
pub mod error;
pub mod event_file;
pub mod event_log;
pub mod event_table;
pub mod store;


pub use command::{Command, Outcome};
pub use config::{LoadPolicy, StoreConfig, StoreOverrides};
pub use error::{StoreError, TableError};
pub use event_file::EventFile;
pub use event_log::{EventLog, InMemoryEventLog};
pub use event_table::{EventTable, DEFAULT_TABLE_CAPACITY};
pub use store::{EventStore, InsertOutcome};
