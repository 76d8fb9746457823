//! Errors raised while loading or validating proxy settings.

/// A bad or missing setting, tagged with where it was detected.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Record a settings problem at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use alttext_error::ConfigError;
    ///
    /// let err = ConfigError::new("server.port must be between 1 and 65535");
    /// assert!(err.to_string().starts_with("Configuration Error: server.port"));
    /// assert!(err.file.ends_with(".rs"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
