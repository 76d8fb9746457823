//! Top-level error wrapper types.

use crate::{ConfigError, TransportError, UpstreamError, ValidationError};

/// Every error family a proxy operation can produce.
///
/// # Examples
///
/// ```
/// use alttext_error::{AltTextError, AltTextErrorKind, ConfigError};
///
/// let err: AltTextError = ConfigError::new("bad port").into();
/// assert!(matches!(err.kind(), AltTextErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AltTextErrorKind {
    /// Caller-fixable request problem
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Local or infrastructure fault
    #[from(TransportError)]
    Transport(TransportError),
    /// Backend rejection or unusable backend output
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

impl AltTextErrorKind {
    /// Message suitable for returning to a client.
    ///
    /// Uses the inner kind's description and drops the source location.
    pub fn public_message(&self) -> String {
        match self {
            AltTextErrorKind::Validation(e) => e.kind.to_string(),
            AltTextErrorKind::Transport(e) => e.kind.to_string(),
            AltTextErrorKind::Upstream(e) => e.kind.to_string(),
            AltTextErrorKind::Config(e) => e.message.clone(),
        }
    }
}

/// Alttext error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("AltText Error: {}", _0)]
pub struct AltTextError(Box<AltTextErrorKind>);

impl AltTextError {
    /// Create a new error from a kind.
    pub fn new(kind: AltTextErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AltTextErrorKind {
        &self.0
    }

    /// Consume the error and return its kind.
    pub fn into_kind(self) -> AltTextErrorKind {
        *self.0
    }
}

impl<T> From<T> for AltTextError
where
    T: Into<AltTextErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for alttext operations.
pub type AltTextResult<T> = std::result::Result<T, AltTextError>;
