//! Validation error types.

/// Caller-fixable request problems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// One or more required request fields were absent or empty
    #[display("Missing required fields: {}", _0.join(", "))]
    MissingFields(Vec<String>),
    /// A field was present but had the wrong shape
    #[display("Invalid value for '{}': {}", field, reason)]
    InvalidField {
        /// The offending field name
        field: String,
        /// Why it was rejected
        reason: String,
    },
    /// The media payload was not valid base64
    #[display("Invalid base64 payload: {}", _0)]
    InvalidBase64(String),
    /// The declared MIME type cannot be used for the requested operation
    #[display("Invalid mime type for {}. Expected {}, got \"{}\"", operation, expected, actual)]
    UnsupportedMimeType {
        /// Operation being performed
        operation: String,
        /// What the operation accepts
        expected: String,
        /// What the caller declared
        actual: String,
    },
    /// Payload exceeds the largest size any transport accepts
    #[display("payload exceeds maximum supported size ({} bytes > {} bytes)", size, max)]
    PayloadTooLarge {
        /// Decoded payload size in bytes
        size: u64,
        /// Largest accepted size in bytes
        max: u64,
    },
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use alttext_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::PayloadTooLarge { size: 10, max: 5 });
/// assert!(err.is_payload_too_large());
/// assert!(err.kind.to_string().contains("maximum supported size"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error should be reported as "payload too large" (HTTP 413).
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self.kind, ValidationErrorKind::PayloadTooLarge { .. })
    }
}
