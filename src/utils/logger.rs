//! Logging setup
//!
//! Structured logging via tracing, filtered with `RUST_LOG` when set.

/// Initialize the logger with a default filter
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glow_server=info,tower_http=info".into()),
        )
        .with_target(false)
        .init();
}
