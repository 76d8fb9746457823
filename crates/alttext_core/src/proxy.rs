//! Wire request body and operation routing.

use alttext_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Deserializer, Serialize};

/// The JSON body accepted by the dispatch endpoint.
///
/// Every field is optional at the wire level; which ones are required depends
/// on the resolved [`Operation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// `condense_text` selects text condensation
    pub operation: Option<String>,
    /// `generateCaptions` selects caption generation, `condenseText` condensation
    pub action: Option<String>,
    /// Base64-encoded media payload
    pub base64_data: Option<String>,
    /// Declared MIME type (parameters allowed)
    pub mime_type: Option<String>,
    /// Approximate media duration in seconds
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: Option<f64>,
    /// Client hint that the media came from a video
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_video: Option<bool>,
    /// Client prefers inline transport even for large payloads
    #[serde(default, deserialize_with = "lenient_flag")]
    pub use_compression: Option<bool>,
    /// Text to condense
    pub text: Option<String>,
    /// Condensation directive
    pub directive: Option<String>,
    /// Condensation target length (number or free text)
    pub target_length: Option<serde_json::Value>,
    /// Client correlation id, logged only
    pub transcript_id: Option<serde_json::Value>,
}

/// Hint flags are only honoured when they are a JSON boolean.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

/// Durations may arrive as numbers or numeric strings; anything else is dropped.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl ProxyRequest {
    /// Parse a request from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the value is not an object or a text
    /// field has the wrong JSON type. The `duration`, `isVideo` and
    /// `useCompression` hints never fail parsing.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::new(ValidationErrorKind::InvalidField {
                field: "body".to_string(),
                reason: "expected a JSON object".to_string(),
            }));
        }
        serde_json::from_value(value).map_err(|e| {
            ValidationError::new(ValidationErrorKind::InvalidField {
                field: "body".to_string(),
                reason: e.to_string(),
            })
        })
    }

    /// The operation this request asks for.
    pub fn operation(&self) -> Operation {
        Operation::resolve(self.operation.as_deref(), self.action.as_deref())
    }

    /// Whether the client flagged the media as coming from a video.
    pub fn is_video_hint(&self) -> bool {
        self.is_video.unwrap_or(false)
    }

    /// Whether the client prefers inline transport.
    pub fn compression_preferred(&self) -> bool {
        self.use_compression.unwrap_or(false)
    }

    /// Target length rendered for inclusion in an instruction.
    pub fn target_length_text(&self) -> Option<String> {
        match self.target_length.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// The three operations the proxy performs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, derive_more::Display,
)]
pub enum Operation {
    /// Describe an image or video for screen readers
    #[display("alt text generation")]
    GenerateAltText,
    /// Produce WebVTT captions for a video
    #[display("caption generation")]
    GenerateCaptions,
    /// Shorten text toward a target length
    #[display("text condensation")]
    CondenseText,
}

impl Operation {
    /// Resolve the operation from the `operation` and `action` fields.
    ///
    /// Either field may name condensation, and `operation` is checked first.
    /// An unknown or absent `action` falls back to alt-text generation.
    ///
    /// # Examples
    ///
    /// ```
    /// use alttext_core::Operation;
    ///
    /// assert_eq!(Operation::resolve(Some("condense_text"), None), Operation::CondenseText);
    /// assert_eq!(Operation::resolve(None, Some("condenseText")), Operation::CondenseText);
    /// assert_eq!(Operation::resolve(None, Some("generateCaptions")), Operation::GenerateCaptions);
    /// assert_eq!(Operation::resolve(None, Some("somethingElse")), Operation::GenerateAltText);
    /// ```
    pub fn resolve(operation: Option<&str>, action: Option<&str>) -> Self {
        match (operation, action) {
            (Some("condense_text" | "condenseText"), _) => Operation::CondenseText,
            (_, Some("condense_text" | "condenseText")) => Operation::CondenseText,
            (_, Some("generateCaptions" | "generate_captions")) => Operation::GenerateCaptions,
            _ => Operation::GenerateAltText,
        }
    }
}
