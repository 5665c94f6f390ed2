use serde::{Deserialize, Serialize};

use causaldb_core::Event;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub parents: Vec<u32>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: u32,
    pub data: String,
    pub parent_count: u8,
    pub parents: Vec<u32>,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().get(),
            data: event.data().to_string(),
            parent_count: event.parent_count(),
            parents: event.parents().iter().map(|p| p.get()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: u32,
    /// `false` when the in-memory table was full; the event is still persisted.
    pub mirrored: bool,
}
