//! Upstream (backend) error types.

/// Backend rejections and unusable backend output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// Backend answered with a non-success status
    #[display("Gemini API Error: {}", message)]
    Status {
        /// HTTP status reported by the backend
        status: u16,
        /// Backend-provided message
        message: String,
    },
    /// Backend answered successfully but no text could be extracted
    #[display("empty response")]
    EmptyResponse,
}

impl UpstreamErrorKind {
    /// Status code reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamErrorKind::Status { status, .. } => Some(*status),
            UpstreamErrorKind::EmptyResponse => None,
        }
    }
}

/// Upstream error with location tracking.
///
/// # Examples
///
/// ```
/// use alttext_error::{UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(UpstreamErrorKind::Status {
///     status: 503,
///     message: "Model is overloaded".to_string(),
/// });
/// assert_eq!(err.kind.status(), Some(503));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new upstream error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
