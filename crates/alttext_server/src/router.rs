//! HTTP routes.

use alttext_core::{DispatchOutcome, MediaDescriptor, Operation};
use alttext_dispatch::{Dispatcher, OperationContext, Purpose};
use alttext_error::ValidationErrorKind;
use axum::{
    Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, Request, State, multipart::MultipartError,
        rejection::BytesRejection,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const SERVICE_NAME: &str = "alttext-proxy";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create state around a dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// The dispatcher requests are handed to.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

/// Build the proxy router.
///
/// Bodies larger than `body_limit_bytes` are refused with 413 before any
/// handler runs.
pub fn create_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/generate-alt-text", post(generate))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Dispatch outcome rendered as an HTTP response.
#[derive(Debug)]
pub struct OutcomeResponse(pub DispatchOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> OutcomeResponse {
    OutcomeResponse(DispatchOutcome::ValidationError {
        too_large: false,
        message: message.into(),
    })
}

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "service": SERVICE_NAME })),
    )
}

async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.dispatcher.backend();
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Generates alt text, WebVTT captions and condensed text for media",
        "provider": backend.provider_name(),
        "model": backend.model_name(),
        "endpoints": {
            "health": "GET /health",
            "generate": "POST /generate-alt-text",
            "upload": "POST /upload",
        },
    }))
}

/// `POST /generate-alt-text` with a JSON body.
async fn generate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> OutcomeResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return OutcomeResponse(DispatchOutcome::ValidationError {
                too_large: e.status() == StatusCode::PAYLOAD_TOO_LARGE,
                message: e.body_text(),
            });
        }
    };
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Body is not JSON");
            return bad_request(format!("Invalid JSON body: {e}"));
        }
    };
    OutcomeResponse(state.dispatcher.handle_json(value).await)
}

/// Fields collected from a multipart upload.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<Bytes>,
    action: Option<String>,
    mime_type: Option<String>,
    is_video: bool,
    duration: Option<f64>,
    use_compression: bool,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = Some(field.bytes().await?),
                "action" => form.action = non_blank(field.text().await?),
                "mimeType" => form.mime_type = non_blank(field.text().await?),
                "isVideo" => form.is_video = field.text().await?.trim() == "true",
                "useCompression" => form.use_compression = field.text().await?.trim() == "true",
                "duration" => {
                    form.duration = field
                        .text()
                        .await?
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
                }
                other => debug!(field = other, "Ignoring multipart field"),
            }
        }
        Ok(form)
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `POST /upload` with a multipart form carrying raw media bytes.
#[instrument(skip_all)]
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> OutcomeResponse {
    let form = match UploadForm::read(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Failed to read multipart body");
            return OutcomeResponse(DispatchOutcome::ValidationError {
                too_large: e.status() == StatusCode::PAYLOAD_TOO_LARGE,
                message: e.body_text(),
            });
        }
    };

    let Some(file) = form.file else {
        return bad_request("No file uploaded");
    };

    let operation = Operation::resolve(None, form.action.as_deref());
    let (Some(_), Some(mime_type)) = (&form.action, &form.mime_type) else {
        let missing = [("action", &form.action), ("mimeType", &form.mime_type)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return bad_request(format!(
            "{operation} failed: {}",
            ValidationErrorKind::MissingFields(missing)
        ));
    };

    let purpose = match operation {
        Operation::GenerateAltText => Purpose::AltText,
        Operation::GenerateCaptions => Purpose::Captions,
        Operation::CondenseText => {
            return bad_request(format!(
                "{operation} failed: {}",
                ValidationErrorKind::InvalidField {
                    field: "action".to_string(),
                    reason: "uploads support alt text and caption generation only".to_string(),
                }
            ));
        }
    };

    let descriptor = MediaDescriptor::new(mime_type, form.is_video, file.len() as u64)
        .with_duration(form.duration);
    let context = OperationContext {
        purpose,
        compression_preferred: form.use_compression,
    };
    OutcomeResponse(state.dispatcher.handle_media(descriptor, &file, context).await)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}
