//! Shared building blocks used by every export path.
//!
//! Nothing here depends on a particular host implementation.

pub mod config;
pub mod errors;

pub use config::ExportSettings;
pub use errors::ExportError;
