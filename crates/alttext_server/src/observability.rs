//! Tracing subscriber setup.

use crate::LoggingConfig;
use alttext_error::ConfigError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for the configured level.
///
/// `verbose` raises the proxy's own crates to `debug` without touching
/// dependencies.
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        format!(
            "{},alttext_server=debug,alttext_dispatch=debug,alttext_models=debug,alttext_cache=debug",
            config.level()
        )
    } else {
        config.level().clone()
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured filter when set.
///
/// # Errors
///
/// Returns a configuration error if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<(), ConfigError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config, verbose))
            .map_err(|e| ConfigError::new(format!("Invalid logging.level: {e}")))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if *config.json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| ConfigError::new(format!("Failed to initialize logging: {e}")))?;

    tracing::info!(json = *config.json(), "Logging initialized");
    Ok(())
}
