//! Configuration for the Solstice gallery runtime.
//!
//! Resolves a [`GalleryConfig`] from files, inline JSON and environment
//! overrides, checks it against guard rails and sets up logging. The
//! `solstice-config` binary exposes the same loader for inspection.

pub mod loader;
pub mod logging;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, EnvLookup,
    error::ConfigLoadError,
};
pub use logging::init_tracing;
pub use models::{ConfigMetadata, ConfigSource, GalleryConfig, LoggingSettings};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
