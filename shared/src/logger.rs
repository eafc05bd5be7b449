//! Logging Infrastructure
//!
//! Structured logging setup shared by all service binaries.

/// Initialize the logger
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
