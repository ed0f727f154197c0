//! LayerZip - layer-preserving archive export for layered image documents
//!
//! This is the main library crate. The host editor is reached only through
//! the traits in [`host`]; [`commands`] wires the two user commands to the
//! exporters in [`export`].

pub mod commands;
pub mod core;
pub mod export;
pub mod host;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the logging subscriber. Safe to call more than once.
pub fn init() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "layerzip=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("LayerZip initializing...");
    }
}
