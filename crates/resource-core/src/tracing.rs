//! # Observability & Tracing
//!
//! Structured logging setup for binaries built on this crate.
//!
//! The store actor, the service and the interaction routes all log through
//! the `tracing` crate with structured fields (`kind`, `id`, `route`,
//! `size`), so `RUST_LOG=debug` shows every operation with its payload and
//! `RUST_LOG=info` keeps just the lifecycle events.
//!
//! The compact format hides the crate/module prefix (`with_target(false)`);
//! the `kind` field carries that information more usefully.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. `default_filter` applies when
/// `RUST_LOG` is unset (e.g. `"info"`). Call once, from `main`.
pub fn setup_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .compact()
        .init();
}
