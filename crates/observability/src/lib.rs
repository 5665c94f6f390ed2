//! Tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging for a service: JSON at `info` unless
/// `CAUSALDB_LOG_FORMAT` / `RUST_LOG` say otherwise.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(format_from_env(LogFormat::Json), "info");
}

/// Initialize logging for an interactive terminal session.
///
/// Log lines share the terminal with the prompt, so only warnings and errors are
/// shown by default, in the human-readable format.
pub fn init_interactive() {
    tracing::init(format_from_env(LogFormat::Pretty), "warn");
}

fn format_from_env(fallback: LogFormat) -> LogFormat {
    resolve_format(std::env::var("CAUSALDB_LOG_FORMAT").ok(), fallback)
}

fn resolve_format(raw: Option<String>, fallback: LogFormat) -> LogFormat {
    raw.and_then(|raw| raw.parse().ok()).unwrap_or(fallback)
}
