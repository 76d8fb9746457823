//! Request and response types for backend generation.

use serde::{Deserialize, Serialize};

/// One piece of content sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Part {
    /// Plain text (instructions or text to transform)
    Text(String),
    /// Base64 payload embedded in the request
    InlineData {
        /// MIME type declared to the backend
        mime_type: String,
        /// Base64-encoded bytes
        data: String,
    },
    /// Reference to an uploaded object
    FileData {
        /// MIME type declared to the backend
        mime_type: String,
        /// URI returned by the upload
        file_uri: String,
    },
}

/// Sampling parameters for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
    /// Nucleus sampling
    pub top_p: Option<f32>,
    /// Top-k sampling
    pub top_k: Option<u32>,
}

impl GenerationConfig {
    /// Parameters used for alt-text descriptions.
    pub fn alt_text() -> Self {
        Self {
            temperature: Some(0.2),
            max_output_tokens: Some(2048),
            top_p: Some(0.95),
            top_k: Some(64),
        }
    }

    /// Parameters used for WebVTT caption generation (longer output).
    pub fn captions() -> Self {
        Self {
            temperature: Some(0.2),
            max_output_tokens: Some(4096),
            top_p: Some(0.95),
            top_k: Some(40),
        }
    }

    /// Parameters used for text condensation.
    pub fn condensation() -> Self {
        Self {
            temperature: Some(0.2),
            max_output_tokens: Some(1024),
            top_p: None,
            top_k: None,
        }
    }
}

/// A single-turn generation request.
///
/// # Examples
///
/// ```
/// use alttext_core::{GenerateRequest, GenerationConfig, Part};
///
/// let request = GenerateRequest::new(
///     vec![Part::Text("Describe this image.".to_string())],
///     GenerationConfig::alt_text(),
/// );
/// assert_eq!(request.parts.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Content parts, in order
    pub parts: Vec<Part>,
    /// Sampling parameters
    pub config: GenerationConfig,
}

impl GenerateRequest {
    /// Create a request from parts and a config.
    pub fn new(parts: Vec<Part>, config: GenerationConfig) -> Self {
        Self { parts, config }
    }

    /// The instruction text, if the first part is text.
    pub fn instructions(&self) -> Option<&str> {
        match self.parts.first() {
            Some(Part::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// What the backend produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Extracted text, `None` when the backend answered without any
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Response carrying text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Response with nothing extractable.
    pub fn empty() -> Self {
        Self { text: None }
    }
}
