//! Operations exposed over HTTP, on top of one shared [`EventStore`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use causaldb_core::{truncate_payload, DomainError, DomainResult, Event, EventId};
use causaldb_infra::{EventLog, EventStore, EventFile, InsertOutcome, StoreError};

use crate::app::dto::{CreateEventRequest, EventResponse};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store lock was poisoned by a panicking request.
    #[error("{0}")]
    Unavailable(String),
}

/// Shared state for handlers. The store is single-writer, hence the mutex.
#[derive(Debug)]
pub struct AppServices<L = EventFile> {
    store: Mutex<EventStore<L>>,
    static_dir: PathBuf,
}

impl<L: EventLog> AppServices<L> {
    pub fn new(store: EventStore<L>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: Mutex::new(store),
            static_dir: static_dir.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut EventStore<L>) -> Result<T, StoreError>,
    ) -> Result<T, ServiceError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| ServiceError::Unavailable("event store lock poisoned".to_string()))?;
        Ok(f(&mut *store)?)
    }

    /// Every event in the in-memory table, in insertion order.
    pub fn list_events(&self) -> Result<Vec<EventResponse>, ServiceError> {
        self.with_store(|store| Ok(store.list().map(EventResponse::from).collect()))
    }

    /// Table lookup with file-scan fallback.
    pub fn get_event(&self, id: EventId) -> Result<Option<EventResponse>, ServiceError> {
        self.with_store(|store| {
            Ok(store
                .get(id)?
                .as_ref()
                .map(EventResponse::from))
        })
    }

    /// Validate and persist one event.
    pub fn insert_event(&self, req: CreateEventRequest) -> Result<InsertOutcome, ServiceError> {
        let event = validate(req)?;
        tracing::info!(id = %event.id(), parents = event.parent_count(), "inserting event");
        self.with_store(|store| store.insert(event))
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Request rules, checked against the payload as it will be stored.
fn validate(req: CreateEventRequest) -> DomainResult<Event> {
    if req.id == 0 {
        return Err(DomainError::validation("Invalid event ID"));
    }

    let mut data = req.data;
    truncate_payload(&mut data);
    if data.is_empty() {
        return Err(DomainError::validation("Event data cannot be empty"));
    }

    Event::new(req.id, data, req.parents.into_iter().map(EventId::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use causaldb_infra::{InMemoryEventLog, LoadPolicy};

    fn services(capacity: usize) -> AppServices<InMemoryEventLog> {
        let store =
            EventStore::with_log(InMemoryEventLog::new(), capacity, LoadPolicy::ContiguousPrefix).unwrap();
        AppServices::new(store, "frontend")
    }

    fn req(id: u32, data: &str, parents: &[u32]) -> CreateEventRequest {
        CreateEventRequest {
            id,
            data: data.to_string(),
            parents: parents.to_vec(),
        }
    }

    #[test]
    fn insert_then_list() {
        let svc = services(10);
        svc.insert_event(req(1, "root", &[])).unwrap();
        svc.insert_event(req(2, "child", &[1])).unwrap();

        let events = svc.list_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].parents, vec![1]);
        assert_eq!(events[1].parent_count, 1);
    }

    #[test]
    fn validation_rules() {
        let svc = services(10);
        assert!(matches!(svc.insert_event(req(0, "x", &[])), Err(ServiceError::Validation(_))));
        assert!(matches!(svc.insert_event(req(1, "", &[])), Err(ServiceError::Validation(_))));
        assert!(matches!(
            svc.insert_event(req(1, "x", &[1, 2, 3, 4, 5, 6, 7, 8, 9])),
            Err(ServiceError::Validation(_))
        ));
        assert!(svc.list_events().unwrap().is_empty());
    }

    #[test]
    fn payload_that_is_empty_once_stored_is_rejected() {
        let svc = services(10);
        let err = svc.insert_event(req(1, "\0hidden", &[])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg == "Event data cannot be empty"));

        svc.insert_event(req(2, "a\0b", &[])).unwrap();
        assert_eq!(svc.get_event(EventId::new(2)).unwrap().unwrap().data, "a");
    }

    #[test]
    fn full_table_reports_persisted_only() {
        let svc = services(1);
        assert_eq!(svc.insert_event(req(1, "a", &[])).unwrap(), InsertOutcome::Mirrored);
        assert_eq!(svc.insert_event(req(2, "b", &[])).unwrap(), InsertOutcome::PersistedOnly);
        assert_eq!(svc.get_event(EventId::new(2)).unwrap().unwrap().data, "b");
    }
}
