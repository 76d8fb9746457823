//! Terminal dispatch outcomes.

use serde::Serialize;

/// Which JSON field a successful result is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OutputKind {
    /// `{"altText": ...}`
    #[display("altText")]
    AltText,
    /// `{"vttContent": ...}`
    #[display("vttContent")]
    VttContent,
}

/// JSON response body.
///
/// Serializes externally tagged, so each variant becomes a single-field
/// object such as `{"altText": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseBody {
    /// Alt text or condensed text
    AltText(String),
    /// WebVTT captions
    VttContent(String),
    /// Error description
    Error(String),
}

/// Terminal result of one dispatch.
///
/// Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The backend produced usable output
    Success {
        /// Field the text is reported under
        output: OutputKind,
        /// Post-processed text
        text: String,
    },
    /// The backend rejected the request or returned nothing usable
    UpstreamError {
        /// Backend HTTP status, absent for an empty response
        status: Option<u16>,
        /// Stage-qualified message
        message: String,
    },
    /// Staging, upload or network fault
    TransportError {
        /// Stage-qualified message
        message: String,
    },
    /// The request was unusable; the backend was never called
    ValidationError {
        /// Payload exceeded the largest supported size
        too_large: bool,
        /// Description of the problem
        message: String,
    },
}

impl DispatchOutcome {
    /// Successful alt-text (or condensed text) result.
    pub fn alt_text(text: impl Into<String>) -> Self {
        Self::Success {
            output: OutputKind::AltText,
            text: text.into(),
        }
    }

    /// Successful caption result.
    pub fn vtt_content(text: impl Into<String>) -> Self {
        Self::Success {
            output: OutputKind::VttContent,
            text: text.into(),
        }
    }

    /// Whether the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// HTTP status code this outcome maps to.
    ///
    /// # Examples
    ///
    /// ```
    /// use alttext_core::DispatchOutcome;
    ///
    /// let outcome = DispatchOutcome::UpstreamError { status: Some(503), message: "busy".into() };
    /// assert_eq!(outcome.http_status(), 502);
    ///
    /// let outcome = DispatchOutcome::UpstreamError { status: Some(429), message: "slow down".into() };
    /// assert_eq!(outcome.http_status(), 400);
    /// ```
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::ValidationError { too_large: true, .. } => 413,
            Self::ValidationError { .. } => 400,
            Self::UpstreamError {
                status: Some(status),
                ..
            } if *status < 500 => 400,
            Self::UpstreamError { .. } => 502,
            Self::TransportError { .. } => 500,
        }
    }

    /// Response body for this outcome.
    pub fn body(&self) -> ResponseBody {
        match self {
            Self::Success {
                output: OutputKind::AltText,
                text,
            } => ResponseBody::AltText(text.clone()),
            Self::Success {
                output: OutputKind::VttContent,
                text,
            } => ResponseBody::VttContent(text.clone()),
            Self::UpstreamError { message, .. }
            | Self::TransportError { message }
            | Self::ValidationError { message, .. } => ResponseBody::Error(message.clone()),
        }
    }
}
