//! Tracing initialization
//!
//! The engine itself only emits `tracing` events; the embedding request
//! layer decides when to install a subscriber. This helper wires up the
//! standard stack for binaries that do not bring their own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber, honoring `RUST_LOG` when set
/// and falling back to the configured level.
pub fn init(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("alexandria_engine={}", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
