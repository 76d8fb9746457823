//! Error types for the alttext proxy.
//!
//! Every failure a request can end in belongs to one of three families:
//!
//! - [`ValidationError`] - the caller sent something unusable; never reaches the backend
//! - [`TransportError`] - a local or infrastructure fault (staging, upload, network)
//! - [`UpstreamError`] - the backend rejected the request or returned nothing usable
//!
//! [`ConfigError`] covers startup problems.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use alttext_error::{AltTextResult, ValidationError, ValidationErrorKind};
//!
//! fn check(mime: Option<&str>) -> AltTextResult<&str> {
//!     let mime = mime.ok_or_else(|| {
//!         ValidationError::new(ValidationErrorKind::MissingFields(vec!["mimeType".into()]))
//!     })?;
//!     Ok(mime)
//! }
//!
//! assert!(check(None).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod transport;
mod upstream;
mod validation;

pub use config::ConfigError;
pub use error::{AltTextError, AltTextErrorKind, AltTextResult};
pub use transport::{TransportError, TransportErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
