//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Configure log level from config, overridable via RUST_LOG
//!
//! # Design Decisions
//! - The library itself only emits events; only binaries install a
//!   subscriber, so embedding hosts keep control of their logging

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `log_level` comes from config and is
/// the fallback when RUST_LOG is unset. Calling twice panics, as with
/// any global subscriber install; binaries call it once at startup.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("marketplace_wallet={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
