//! Request dispatch.

use crate::classifier::{backend_mime_type, classify};
use crate::instructions::{
    InstructionContext, Purpose, condensation_instructions, select_instructions,
};
use crate::planner::TransportLimits;
use crate::postprocess::{finalize_alt_text, normalize_webvtt};
use crate::stage::{RequestStage, StageTracker};
use alttext_cache::UploadCache;
use alttext_core::{
    DispatchOutcome, GenerateRequest, GenerationConfig, MediaDescriptor, Operation, Part,
    ProxyRequest, TransportPlan,
};
use alttext_error::{
    AltTextError, AltTextErrorKind, AltTextResult, UpstreamError, UpstreamErrorKind,
    ValidationError, ValidationErrorKind,
};
use alttext_interface::MediaBackend;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Per-request options for a media operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    /// Alt text or captions
    pub purpose: Purpose,
    /// Client prefers inline transport over remote upload
    pub compression_preferred: bool,
}

impl OperationContext {
    fn operation(&self) -> Operation {
        match self.purpose {
            Purpose::AltText => Operation::GenerateAltText,
            Purpose::Captions => Operation::GenerateCaptions,
        }
    }
}

/// Runs requests through classification, planning, the backend and
/// post-processing.
///
/// Holds no per-request state; share one instance behind an `Arc`.
pub struct Dispatcher {
    backend: Arc<dyn MediaBackend>,
    cache: Arc<UploadCache>,
    limits: TransportLimits,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.backend.provider_name())
            .field("model", &self.backend.model_name())
            .field("cached_uploads", &self.cache.len())
            .field("limits", &self.limits)
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher over a backend, a shared upload cache and size limits.
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        cache: Arc<UploadCache>,
        limits: TransportLimits,
    ) -> Self {
        info!(
            provider = backend.provider_name(),
            model = backend.model_name(),
            inline_max_bytes = limits.inline_max_bytes(),
            upload_max_bytes = limits.upload_max_bytes(),
            "Dispatcher ready"
        );
        Self {
            backend,
            cache,
            limits,
        }
    }

    /// The backend requests are sent to.
    pub fn backend(&self) -> &Arc<dyn MediaBackend> {
        &self.backend
    }

    /// The shared upload cache.
    pub fn cache(&self) -> &Arc<UploadCache> {
        &self.cache
    }

    /// Size limits used for planning.
    pub fn limits(&self) -> &TransportLimits {
        &self.limits
    }

    /// Dispatch a raw JSON body.
    ///
    /// A body that does not parse as a request becomes a validation outcome;
    /// the backend is not called.
    pub async fn handle_json(&self, body: serde_json::Value) -> DispatchOutcome {
        let operation = Operation::resolve(
            body.get("operation").and_then(|v| v.as_str()),
            body.get("action").and_then(|v| v.as_str()),
        );
        match ProxyRequest::from_json(body) {
            Ok(request) => self.handle(&request).await,
            Err(e) => failure_outcome(operation, e.into()),
        }
    }

    /// Dispatch a parsed request to the operation it names.
    #[instrument(skip(self, request), fields(operation = %request.operation(), transcript_id = ?request.transcript_id))]
    pub async fn handle(&self, request: &ProxyRequest) -> DispatchOutcome {
        let operation = request.operation();
        match operation {
            Operation::CondenseText => match self.condense(request).await {
                Ok(text) => DispatchOutcome::alt_text(text),
                Err(e) => failure_outcome(operation, e),
            },
            Operation::GenerateAltText | Operation::GenerateCaptions => {
                self.handle_media_request(request, operation).await
            }
        }
    }

    async fn handle_media_request(
        &self,
        request: &ProxyRequest,
        operation: Operation,
    ) -> DispatchOutcome {
        let (descriptor, payload) = match decode_media(request) {
            Ok(decoded) => decoded,
            Err(e) => return failure_outcome(operation, e),
        };

        let purpose = match operation {
            Operation::GenerateCaptions => Purpose::Captions,
            _ => Purpose::AltText,
        };
        let context = OperationContext {
            purpose,
            compression_preferred: request.compression_preferred(),
        };
        self.handle_media(descriptor, &payload, context).await
    }

    /// Dispatch an already-decoded media payload.
    #[instrument(
        skip(self, descriptor, payload),
        fields(
            purpose = %context.purpose,
            mime_type = %descriptor.raw_mime_type,
            size = payload.len(),
            category = tracing::field::Empty,
            plan = tracing::field::Empty,
        )
    )]
    pub async fn handle_media(
        &self,
        descriptor: MediaDescriptor,
        payload: &[u8],
        context: OperationContext,
    ) -> DispatchOutcome {
        let operation = context.operation();
        let mut tracker = StageTracker::new(uuid::Uuid::new_v4().to_string());
        let result = self.run_media(&mut tracker, &descriptor, payload, context).await;

        let outcome_stage = if result.is_ok() {
            RequestStage::Succeeded
        } else {
            RequestStage::Failed
        };
        tracker.advance(outcome_stage);

        match result {
            Ok(text) => match context.purpose {
                Purpose::AltText => DispatchOutcome::alt_text(text),
                Purpose::Captions => DispatchOutcome::vtt_content(text),
            },
            Err(e) => failure_outcome(operation, e),
        }
    }

    async fn run_media(
        &self,
        tracker: &mut StageTracker,
        descriptor: &MediaDescriptor,
        payload: &[u8],
        context: OperationContext,
    ) -> AltTextResult<String> {
        if context.purpose == Purpose::Captions && !descriptor.is_video_type() {
            return Err(ValidationError::new(ValidationErrorKind::UnsupportedMimeType {
                operation: Operation::GenerateCaptions.to_string(),
                expected: "video/*".to_string(),
                actual: descriptor.raw_mime_type.clone(),
            })
            .into());
        }

        let category = classify(descriptor);
        tracing::Span::current().record("category", tracing::field::display(category));
        tracker.advance(RequestStage::Classified);

        let instruction_context = InstructionContext {
            purpose: context.purpose,
            duration_seconds: descriptor.approx_duration_seconds,
        };
        let instructions = select_instructions(category, &instruction_context);
        tracker.advance(RequestStage::InstructionsSelected);

        let plan = self
            .limits
            .plan(descriptor.payload_size_bytes, context.compression_preferred)?;
        tracing::Span::current().record("plan", tracing::field::display(plan));
        tracker.advance(RequestStage::TransportPlanned);

        let mime_type = match context.purpose {
            Purpose::AltText => backend_mime_type(descriptor),
            Purpose::Captions => descriptor.raw_mime_type.clone(),
        };

        let media_part = match plan {
            TransportPlan::Inline => {
                tracker.advance(RequestStage::InlineReady);
                Part::InlineData {
                    mime_type,
                    data: STANDARD.encode(payload),
                }
            }
            TransportPlan::RemoteUpload => {
                tracker.advance(RequestStage::Uploading);
                let handle = self
                    .cache
                    // Keyed on what the client declared, not the type sent upstream.
                    .get_or_upload(payload, &descriptor.raw_mime_type, || {
                        self.backend.upload(payload, &mime_type)
                    })
                    .await?;
                tracker.advance(RequestStage::Uploaded);
                Part::FileData {
                    mime_type: handle.mime_type,
                    file_uri: handle.uri,
                }
            }
        };

        let config = match context.purpose {
            Purpose::AltText => GenerationConfig::alt_text(),
            Purpose::Captions => GenerationConfig::captions(),
        };
        let request = GenerateRequest::new(vec![Part::Text(instructions), media_part], config);
        let text = self.generate_text(tracker, &request).await?;

        Ok(match context.purpose {
            Purpose::AltText => finalize_alt_text(category, &text),
            Purpose::Captions => normalize_webvtt(&text),
        })
    }

    async fn condense(&self, request: &ProxyRequest) -> AltTextResult<String> {
        let mut tracker = StageTracker::new(uuid::Uuid::new_v4().to_string());

        let text = non_empty(request.text.as_deref());
        let directive = non_empty(request.directive.as_deref());
        let target_length = request.target_length_text();

        let mut missing = Vec::new();
        if text.is_none() {
            missing.push("text".to_string());
        }
        if directive.is_none() {
            missing.push("directive".to_string());
        }
        if target_length.is_none() {
            missing.push("targetLength".to_string());
        }
        let (Some(text), Some(directive), Some(target_length)) = (text, directive, target_length)
        else {
            tracker.advance(RequestStage::Failed);
            return Err(ValidationError::new(ValidationErrorKind::MissingFields(missing)).into());
        };

        debug!(chars = text.len(), %target_length, "Condensing text");
        let instructions = condensation_instructions(text, directive, &target_length);
        tracker.advance(RequestStage::InstructionsSelected);
        tracker.advance(RequestStage::InlineReady);

        let generate = GenerateRequest::new(
            vec![Part::Text(instructions)],
            GenerationConfig::condensation(),
        );
        let result = self.generate_text(&mut tracker, &generate).await;
        tracker.advance(if result.is_ok() {
            RequestStage::Succeeded
        } else {
            RequestStage::Failed
        });

        let condensed = result?.trim().to_string();
        debug!(from = text.len(), to = condensed.len(), "Condensed text");
        Ok(condensed)
    }

    async fn generate_text(
        &self,
        tracker: &mut StageTracker,
        request: &GenerateRequest,
    ) -> AltTextResult<String> {
        tracker.advance(RequestStage::BackendCalled);
        let response = self.backend.generate(request).await?;
        response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| UpstreamError::new(UpstreamErrorKind::EmptyResponse).into())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate the media fields of a request and decode its payload.
fn decode_media(request: &ProxyRequest) -> AltTextResult<(MediaDescriptor, Vec<u8>)> {
    let base64_data = non_empty(request.base64_data.as_deref());
    let mime_type = non_empty(request.mime_type.as_deref());

    let (Some(base64_data), Some(mime_type)) = (base64_data, mime_type) else {
        let mut missing = Vec::new();
        if base64_data.is_none() {
            missing.push("base64Data".to_string());
        }
        if mime_type.is_none() {
            missing.push("mimeType".to_string());
        }
        return Err(ValidationError::new(ValidationErrorKind::MissingFields(missing)).into());
    };

    let payload = STANDARD
        .decode(base64_data.trim())
        .map_err(|e| ValidationError::new(ValidationErrorKind::InvalidBase64(e.to_string())))?;

    let duration = request
        .duration
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0);
    let descriptor = MediaDescriptor::new(mime_type, request.is_video_hint(), payload.len() as u64)
        .with_duration(duration);

    debug!(
        mime_type = %descriptor.raw_mime_type,
        declared = mime_type,
        size = descriptor.payload_size_bytes,
        "Decoded media payload"
    );
    Ok((descriptor, payload))
}

/// Map an error to a terminal outcome whose message names the failed operation.
fn failure_outcome(operation: Operation, err: AltTextError) -> DispatchOutcome {
    let message = format!("{operation} failed: {}", err.kind().public_message());
    match err.into_kind() {
        AltTextErrorKind::Validation(e) => {
            debug!(%message, "Rejected request");
            DispatchOutcome::ValidationError {
                too_large: e.is_payload_too_large(),
                message,
            }
        }
        AltTextErrorKind::Upstream(e) => {
            warn!(status = ?e.kind.status(), %message, "Backend did not produce output");
            DispatchOutcome::UpstreamError {
                status: e.kind.status(),
                message,
            }
        }
        AltTextErrorKind::Transport(_) | AltTextErrorKind::Config(_) => {
            warn!(%message, "Transport failure");
            DispatchOutcome::TransportError { message }
        }
    }
}
