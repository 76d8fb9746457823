//! Transport error types.

/// Local or infrastructure faults between the proxy and the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TransportErrorKind {
    /// Temporary staging file could not be created, written, or opened
    #[display("Failed to stage upload: {}", _0)]
    Staging(String),
    /// Request never produced an HTTP response
    #[display("Network error: {}", _0)]
    Network(String),
    /// Remote store refused the upload submission
    #[display("Upload rejected: {}", _0)]
    UploadRejected(String),
    /// Remote store reported the uploaded object as failed
    #[display("Upload processing failed: {}", _0)]
    UploadFailed(String),
    /// Uploaded object never reached a terminal state
    #[display("Upload not ready after {} status checks", attempts)]
    UploadTimedOut {
        /// Number of status checks performed
        attempts: u32,
    },
    /// A response arrived but could not be interpreted
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
}

/// Transport error with location tracking.
///
/// # Examples
///
/// ```
/// use alttext_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::UploadTimedOut { attempts: 3 });
/// assert!(format!("{}", err).contains("3 status checks"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new transport error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
