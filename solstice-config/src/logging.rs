use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::models::LoggingSettings;

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured filter. Returns `false` if a subscriber was already set.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .is_ok()
}
