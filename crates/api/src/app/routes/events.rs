//! Event endpoints.
//!
//! Store calls do blocking file IO, so they run on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use causaldb_core::EventId;

use crate::app::dto::{CreateEventRequest, CreatedResponse};
use crate::app::services::{AppServices, ServiceError};
use crate::app::errors;

async fn blocking<T, F>(f: F) -> Result<T, axum::response::Response>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(errors::service_error_to_response(e)),
        Err(e) => Err(errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            e.to_string(),
        )),
    }
}

/// GET /api/events
///
/// All events in the in-memory table, in insertion order.
pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match blocking(move || services.list_events()).await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/events/:id
pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let id = match raw_id.parse::<EventId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(error = %e, "rejected event id");
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "Invalid event ID");
        }
    };

    match blocking(move || services.get_event(id)).await {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Event not found"),
        Err(resp) => resp,
    }
}

/// POST /api/events
///
/// Body: `{ "id": 2, "data": "child", "parents": [1] }`.
pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text());
        }
    };

    let id = req.id;
    match blocking(move || services.insert_event(req)).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(CreatedResponse {
                message: "Event created successfully".to_string(),
                id,
                mirrored: outcome.is_mirrored(),
            }),
        )
            .into_response(),
        Err(resp) => resp,
    }
}
