//! Layered proxy configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from alttext.toml)
//! - `~/.config/alttext/alttext.toml`
//! - `./alttext.toml`, or the file given with `--config`
//! - Environment variables prefixed `ALTTEXT__` (e.g. `ALTTEXT__SERVER__PORT`)

use alttext_cache::UploadCacheConfig;
use alttext_dispatch::TransportLimits;
use alttext_error::{AltTextResult, ConfigError};
use alttext_models::GeminiConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../alttext.toml");

/// HTTP listener settings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into))]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    port: u16,

    /// Largest accepted request body
    #[serde(default = "default_body_limit")]
    body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    150 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output settings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into))]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Complete proxy configuration.
///
/// # Example
///
/// ```
/// use alttext_server::AppConfig;
///
/// let config = AppConfig::from_toml_str("[server]\nport = 8080").unwrap();
/// assert_eq!(*config.server().port(), 8080);
/// assert_eq!(config.gemini().model(), "gemini-2.5-flash");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// HTTP listener
    #[serde(default)]
    server: ServerConfig,

    /// Gemini backend
    #[serde(default)]
    gemini: GeminiConfig,

    /// Inline and upload size thresholds
    #[serde(default)]
    transport: TransportLimits,

    /// Upload cache
    #[serde(default)]
    cache: UploadCacheConfig,

    /// Log output
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from every source.
    ///
    /// When `path` is given it replaces `./alttext.toml` and must exist.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or parsed, or
    /// if the transport thresholds are inconsistent.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> AltTextResult<Self> {
        debug!("Loading configuration: environment > explicit or local file > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home_config) = home_config_path() {
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("alttext").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("ALTTEXT")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document does not parse or the
    /// result fails validation.
    pub fn from_toml_str(toml: &str) -> AltTextResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transport.validate()?;
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::new("server.body_limit_bytes must be positive"));
        }
        if self.gemini.max_poll_attempts() == &0 {
            return Err(ConfigError::new("gemini.max_poll_attempts must be positive"));
        }
        Ok(())
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> AltTextResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")))?;

        config.validate()?;
        debug!(
            bind = %config.server.bind_address(),
            model = %config.gemini.model(),
            cache_enabled = config.cache.enabled(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/alttext/alttext.toml"))
}
