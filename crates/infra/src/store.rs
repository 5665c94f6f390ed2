//! Session object tying the event log to its in-memory mirror.
//!
//! One `EventStore` owns one log handle and one table for its whole lifetime.
//! There is no process-wide state: independent stores are independent sessions.
//!
//! ```text
//! insert:  log.append (durable) -> table.insert (may be rejected when full)
//! get:     table.find -> on miss, log.find_by_id (full scan)
//! ```

use tracing::{debug, instrument, warn};

use causaldb_core::{Event, EventId};

use crate::config::{LoadPolicy, StoreConfig};
use crate::error::{StoreError, TableError};
use crate::event_file::EventFile;
use crate::event_log::EventLog;
use crate::event_table::EventTable;

/// Result of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Persisted and visible in the table.
    Mirrored,
    /// Persisted, but the table was full; only a log scan will find it.
    PersistedOnly,
}

impl InsertOutcome {
    pub fn is_mirrored(self) -> bool {
        matches!(self, Self::Mirrored)
    }
}

/// Write-through event store over an [`EventLog`].
#[derive(Debug)]
pub struct EventStore<L = EventFile> {
    log: L,
    table: EventTable,
}

impl EventStore<EventFile> {
    /// Open (or create) the configured file and build the table from it.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let file = EventFile::open(&config.path)?.with_sync_on_write(config.sync_on_write);
        Self::with_log(file, config.table_capacity, config.load_policy)
    }
}

impl<L: EventLog> EventStore<L> {
    /// Wrap an existing log, loading the table with `policy`.
    pub fn with_log(mut log: L, capacity: usize, policy: LoadPolicy) -> Result<Self, StoreError> {
        let table = EventTable::load(&mut log, capacity, policy)?;
        Ok(Self { log, table })
    }

    /// Persist `event`, then mirror it if the table has room.
    ///
    /// Duplicate ids are accepted; lookups keep returning the earliest one.
    #[instrument(skip_all, fields(id = %event.id()))]
    pub fn insert(&mut self, event: Event) -> Result<InsertOutcome, StoreError> {
        self.log.append(&event)?;

        match self.table.insert(event) {
            Ok(()) => Ok(InsertOutcome::Mirrored),
            Err(TableError::CapacityExceeded { capacity }) => {
                warn!(capacity, "table full; event persisted but not mirrored");
                Ok(InsertOutcome::PersistedOnly)
            }
        }
    }

    /// Table first, then a full log scan.
    pub fn get(&mut self, id: EventId) -> Result<Option<Event>, StoreError> {
        if let Some(event) = self.table.find(id) {
            debug!(%id, "table hit");
            return Ok(Some(event.clone()));
        }

        let found = self.log.find_by_id(id)?;
        debug!(%id, found = found.is_some(), "table miss, scanned log");
        Ok(found)
    }

    /// Events in the table, in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &Event> {
        self.table.iter()
    }

    pub fn table(&self) -> &EventTable {
        &self.table
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    /// End the session, closing the log.
    pub fn close(self) -> Result<(), StoreError> {
        self.log.close()
    }
}
