//! Gemini backend configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the Gemini backend.
///
/// Deserialized from the `[gemini]` section of the proxy configuration.
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
pub struct GeminiConfig {
    /// API root, without a trailing version segment
    #[serde(default = "default_api_base")]
    api_base: String,

    /// Model used for every generation call
    #[serde(default = "default_model")]
    model: String,

    /// Delay between upload status checks (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Status checks performed before an upload is abandoned
    #[serde(default = "default_max_poll_attempts")]
    max_poll_attempts: u32,

    /// Whole-request HTTP timeout (seconds); none when unset
    #[serde(default)]
    request_timeout_secs: Option<u64>,

    /// Directory for staged uploads; the system temp dir when unset
    #[serde(default)]
    staging_dir: Option<PathBuf>,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    300
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: None,
            staging_dir: None,
        }
    }
}

impl GeminiConfig {
    /// Upload status poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub(crate) fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}
