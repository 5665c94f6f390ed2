//! Append-only event log boundary.
//!
//! `EventLog` is the persistence seam under [`EventStore`](crate::EventStore). The
//! production implementation is [`EventFile`](crate::EventFile); `InMemoryEventLog`
//! keeps encoded rows in a `Vec` and is intended for tests/dev.

use tracing::warn;

use causaldb_core::{codec, Event, EventId, Row};

use crate::error::StoreError;

/// Append-only, row-oriented event log.
///
/// ## Semantics
///
/// - `append` writes exactly one row after all existing rows
/// - `find_by_id` scans from the first row and returns the **earliest** match
/// - `scan` yields every decodable row in write order
///
/// Rows are never rewritten or deleted. Methods take `&mut self` because scans share
/// the single handle's read position; one logical caller at a time.
pub trait EventLog {
    /// Append one event and make it durable before returning.
    fn append(&mut self, event: &Event) -> Result<(), StoreError>;

    /// First event with `id`, in write order.
    fn find_by_id(&mut self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// All decodable events, in write order.
    fn scan(&mut self) -> Result<Vec<Event>, StoreError>;

    /// Number of whole rows in the log.
    fn row_count(&mut self) -> Result<u64, StoreError>;

    /// Release the underlying resources.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// In-memory append-only log.
///
/// Stores encoded rows, so lookups exercise the same codec as the file.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventLog {
    rows: Vec<Row>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw rows in write order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl InMemoryEventLog {
    /// Decodable rows in write order; corrupt ones are skipped with a warning.
    fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(row_index, row)| match codec::decode(row) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(row_index, error = %e, "skipping corrupt row");
                    None
                }
            })
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&mut self, event: &Event) -> Result<(), StoreError> {
        self.rows.push(codec::encode(event));
        Ok(())
    }

    fn find_by_id(&mut self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.events().find(|event| event.id() == id))
    }

    fn scan(&mut self) -> Result<Vec<Event>, StoreError> {
        Ok(self.events().collect())
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        Ok(self.rows.len() as u64)
    }
}
