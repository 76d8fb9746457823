//! Gemini REST client.

use super::config::GeminiConfig;
use super::dto::{
    Content, FileResource, FileState, GenerateContentRequest, GenerateContentResponse,
    UploadResponse, WirePart, error_message,
};
use super::staging::StagedPayload;
use alttext_core::{GenerateRequest, GenerateResponse, RemoteHandle};
use alttext_error::{
    AltTextResult, ConfigError, TransportError, TransportErrorKind, UpstreamError,
    UpstreamErrorKind,
};
use alttext_interface::MediaBackend;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Gemini backend using the public REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is blank or the HTTP client
    /// cannot be built.
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> AltTextResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::new("Gemini API key is empty").into());
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs() {
            builder = builder.timeout(Duration::from_secs(*secs));
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Create a client reading the key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is unset.
    pub fn from_env(config: GeminiConfig) -> AltTextResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|e| ConfigError::new(format!("GEMINI_API_KEY not set: {e}")))?;
        Self::new(api_key, config)
    }

    /// Backend settings.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base(),
            self.config.model()
        )
    }

    /// Open a resumable upload session and return its upload URL.
    async fn start_upload(&self, size: u64, mime_type: &str) -> AltTextResult<String> {
        let url = format!("{}/upload/v1beta/files", self.config.base());
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": "alttext-upload" } }))
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::new(TransportErrorKind::UploadRejected(format!(
                "upload start returned {}: {}",
                status.as_u16(),
                error_message(status.as_u16(), &body)
            )))
            .into());
        }

        response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                TransportError::new(TransportErrorKind::MalformedResponse(
                    "upload start response carried no upload URL".to_string(),
                ))
                .into()
            })
    }

    /// Send the staged bytes and finalize the session.
    async fn finalize_upload(
        &self,
        upload_url: &str,
        staged: &StagedPayload,
    ) -> AltTextResult<FileResource> {
        let response = self
            .http
            .post(upload_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .header(reqwest::header::CONTENT_LENGTH, staged.size().to_string())
            .body(staged.body().await?)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::new(TransportErrorKind::UploadRejected(format!(
                "upload finalize returned {}: {}",
                status.as_u16(),
                error_message(status.as_u16(), &body)
            )))
            .into());
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            TransportError::new(TransportErrorKind::MalformedResponse(format!(
                "upload response: {e}"
            )))
        })?;
        Ok(uploaded.file)
    }

    async fn fetch_file(&self, name: &str) -> AltTextResult<FileResource> {
        let url = format!("{}/v1beta/{}", self.config.base(), name);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::new(TransportErrorKind::UploadRejected(format!(
                "status check returned {}: {}",
                status.as_u16(),
                error_message(status.as_u16(), &body)
            )))
            .into());
        }

        response.json().await.map_err(|e| {
            TransportError::new(TransportErrorKind::MalformedResponse(format!(
                "file resource: {e}"
            )))
            .into()
        })
    }

    /// Poll the stored file until it is usable, fails, or the attempt budget runs out.
    #[instrument(skip(self, file), fields(name = %file.name))]
    async fn wait_until_active(&self, mut file: FileResource) -> AltTextResult<FileResource> {
        let max_attempts = *self.config.max_poll_attempts();
        let mut attempts = 0;

        loop {
            match file.state {
                FileState::Active => {
                    debug!(attempts, "Uploaded file is active");
                    return Ok(file);
                }
                FileState::Failed => {
                    let reason = file
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| format!("{} failed processing", file.name));
                    warn!(%reason, "Uploaded file failed processing");
                    return Err(TransportError::new(TransportErrorKind::UploadFailed(reason)).into());
                }
                FileState::Processing | FileState::StateUnspecified => {}
            }

            if attempts >= max_attempts {
                warn!(attempts, "Uploaded file never became active");
                return Err(
                    TransportError::new(TransportErrorKind::UploadTimedOut { attempts }).into(),
                );
            }

            tokio::time::sleep(self.config.poll_interval()).await;
            attempts += 1;
            file = self.fetch_file(&file.name).await?;
        }
    }
}

fn network_error(e: reqwest::Error) -> TransportError {
    TransportError::new(TransportErrorKind::Network(e.to_string()))
}

#[async_trait]
impl MediaBackend for GeminiClient {
    #[instrument(skip(self, req), fields(model = %self.config.model(), parts = req.parts.len()))]
    async fn generate(&self, req: &GenerateRequest) -> AltTextResult<GenerateResponse> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: req.parts.iter().map(WirePart::from).collect(),
            }],
            generation_config: req.config.into(),
        };

        let response = self
            .http
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &text);
            warn!(status = status.as_u16(), %message, "Gemini rejected request");
            return Err(UpstreamError::new(UpstreamErrorKind::Status {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            TransportError::new(TransportErrorKind::MalformedResponse(format!(
                "generate response: {e}"
            )))
        })?;

        match parsed.text() {
            Some(text) => {
                debug!(chars = text.len(), "Gemini returned text");
                Ok(GenerateResponse::text(text))
            }
            None => {
                warn!("Gemini response contained no text");
                Ok(GenerateResponse::empty())
            }
        }
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(&self, data: &[u8], mime_type: &str) -> AltTextResult<RemoteHandle> {
        let staged = StagedPayload::write(self.config.staging_dir().as_deref(), data).await?;

        let upload_url = self.start_upload(staged.size(), mime_type).await?;
        let file = self.finalize_upload(&upload_url, &staged).await?;
        staged.discard();

        info!(name = %file.name, state = ?file.state, "Upload submitted");
        let file = self.wait_until_active(file).await?;

        Ok(RemoteHandle {
            uri: file.uri,
            mime_type: file.mime_type.unwrap_or_else(|| mime_type.to_string()),
            name: file.name,
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
