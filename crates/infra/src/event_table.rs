//! In-memory mirror of the event log.

use tracing::{debug, info, warn};

use causaldb_core::{Event, EventId};

use crate::config::LoadPolicy;
use crate::error::{StoreError, TableError};
use crate::event_log::EventLog;

/// Default number of events the mirror holds.
pub const DEFAULT_TABLE_CAPACITY: usize = 1000;

/// Capacity-bounded, insertion-ordered cache of events.
///
/// The log stays authoritative: anything missing here may still be found with a
/// log scan.
#[derive(Debug, Clone)]
pub struct EventTable {
    events: Vec<Event>,
    capacity: usize,
}

impl EventTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity,
        }
    }

    /// Build the mirror with the given load policy.
    pub fn load<L: EventLog>(
        log: &mut L,
        capacity: usize,
        policy: LoadPolicy,
    ) -> Result<Self, StoreError> {
        let table = match policy {
            LoadPolicy::ContiguousPrefix => Self::build_from(log, capacity)?,
            LoadPolicy::FullScan => Self::build_full(log, capacity)?,
        };
        info!(?policy, events = table.len(), capacity, "event table loaded");
        Ok(table)
    }

    /// Contiguous-prefix load: look up ids 1, 2, 3, ... in the log and stop at the
    /// first id that is missing (or when the table is full).
    ///
    /// Events whose ids fall outside that run are left out of the mirror.
    pub fn build_from<L: EventLog>(log: &mut L, capacity: usize) -> Result<Self, StoreError> {
        let mut table = Self::new(capacity);
        let mut next = Some(EventId::new(1));

        while let Some(id) = next {
            if table.is_full() {
                debug!(%id, "table full, stopping prefix load");
                break;
            }
            match log.find_by_id(id)? {
                Some(event) => table.events.push(event),
                None => break,
            }
            next = id.next();
        }

        Ok(table)
    }

    /// Full-scan load: every row in write order, up to capacity.
    pub fn build_full<L: EventLog>(log: &mut L, capacity: usize) -> Result<Self, StoreError> {
        let mut table = Self::new(capacity);
        let events = log.scan()?;
        let total = events.len();

        table.events.extend(events.into_iter().take(capacity));
        if total > capacity {
            warn!(total, capacity, "log holds more events than the table can mirror");
        }

        Ok(table)
    }

    /// Append to the mirror unless it is full.
    pub fn insert(&mut self, event: Event) -> Result<(), TableError> {
        if self.is_full() {
            return Err(TableError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.events.push(event);
        Ok(())
    }

    /// First event with `id`, in insertion order.
    pub fn find(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= self.capacity
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::InMemoryEventLog;

    fn log_with(ids: &[u32]) -> InMemoryEventLog {
        let mut log = InMemoryEventLog::new();
        for &id in ids {
            log.append(&Event::root(id, format!("event {id}"))).unwrap();
        }
        log
    }

    fn ids(table: &EventTable) -> Vec<u32> {
        table.iter().map(|e| e.id().get()).collect()
    }

    #[test]
    fn prefix_load_stops_at_first_gap() {
        let mut log = log_with(&[1, 2, 3, 5]);
        let table = EventTable::build_from(&mut log, DEFAULT_TABLE_CAPACITY).unwrap();

        assert_eq!(ids(&table), vec![1, 2, 3]);
        assert!(table.find(EventId::new(5)).is_none());
        assert!(log.find_by_id(EventId::new(5)).unwrap().is_some());
    }

    #[test]
    fn prefix_load_follows_ids_not_write_order() {
        let mut log = log_with(&[2, 1, 3]);
        let table = EventTable::build_from(&mut log, DEFAULT_TABLE_CAPACITY).unwrap();
        assert_eq!(ids(&table), vec![1, 2, 3]);
    }

    #[test]
    fn prefix_load_is_empty_without_id_one() {
        let mut log = log_with(&[2, 3]);
        let table = EventTable::build_from(&mut log, DEFAULT_TABLE_CAPACITY).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn prefix_load_respects_capacity() {
        let mut log = log_with(&[1, 2, 3, 4]);
        let table = EventTable::build_from(&mut log, 2).unwrap();
        assert_eq!(ids(&table), vec![1, 2]);
    }

    #[test]
    fn full_scan_mirrors_every_row_in_write_order() {
        let mut log = log_with(&[1, 2, 3, 5, 40]);
        let table = EventTable::load(&mut log, DEFAULT_TABLE_CAPACITY, LoadPolicy::FullScan).unwrap();
        assert_eq!(ids(&table), vec![1, 2, 3, 5, 40]);
    }

    #[test]
    fn full_scan_truncates_to_capacity() {
        let mut log = log_with(&[9, 8, 7]);
        let table = EventTable::build_full(&mut log, 2).unwrap();
        assert_eq!(ids(&table), vec![9, 8]);
    }

    #[test]
    fn insert_rejects_when_full() {
        let mut table = EventTable::new(1);
        table.insert(Event::root(1u32, "a")).unwrap();

        let err = table.insert(Event::root(2u32, "b")).unwrap_err();
        assert_eq!(err, TableError::CapacityExceeded { capacity: 1 });
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_returns_first_duplicate() {
        let mut table = EventTable::default();
        table.insert(Event::root(7u32, "first")).unwrap();
        table.insert(Event::root(7u32, "second")).unwrap();

        assert_eq!(table.find(EventId::new(7)).unwrap().data(), "first");
    }
}
