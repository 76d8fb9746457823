//! Trait definitions for media backends.

use alttext_core::{GenerateRequest, GenerateResponse, RemoteHandle};
use alttext_error::AltTextResult;
use async_trait::async_trait;

/// Core trait every generative backend implements.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Generate text for a single-turn multimodal request.
    ///
    /// A response without extractable text is returned as
    /// [`GenerateResponse::empty`], not as an error; the caller decides how to
    /// report it.
    async fn generate(&self, req: &GenerateRequest) -> AltTextResult<GenerateResponse>;

    /// Upload a payload to the backend's file store.
    ///
    /// Returns once the stored object is ready to be referenced.
    async fn upload(&self, data: &[u8], mime_type: &str) -> AltTextResult<RemoteHandle>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}
