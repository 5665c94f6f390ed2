//! HTTP API: JSON event endpoints plus static file serving.

pub mod app;
pub mod middleware;
