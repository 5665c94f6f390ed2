use axum::{routing::get, Router};

pub mod events;
pub mod static_files;
pub mod system;

/// Router for the JSON API (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/:id", get(events::get_event))
}
