//! Static asset fallback for non-API paths.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
};

use crate::app::services::AppServices;

/// Serve `<static_dir><path>`, with `/` mapped to `index.html`.
pub async fn serve(
    Extension(services): Extension<Arc<AppServices>>,
    uri: Uri,
) -> axum::response::Response {
    let Some(path) = resolve(services.static_dir(), uri.path()) else {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&path))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "static file not served");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
    }
}

/// Map a request path into `root`, refusing anything that could escape it.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() { "index.html" } else { relative };

    let relative = Path::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}
