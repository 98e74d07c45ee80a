//! Tracing setup helpers for binaries and examples embedding the
//! pipeline.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes a tracing subscriber reading `RUST_LOG`, defaulting to
/// `info`.
///
/// Intended for application entry points; calling it twice panics in
/// tracing-subscriber, so libraries should leave initialization to the
/// embedding binary.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
