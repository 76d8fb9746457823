//! End-to-end dispatcher tests against a mock backend.

mod test_utils;

use alttext_cache::UploadCache;
use alttext_core::{DispatchOutcome, MediaDescriptor, OutputKind, Part, ProxyRequest};
use alttext_dispatch::{Dispatcher, OperationContext, Purpose, TransportLimitsBuilder};
use serde_json::json;
use std::sync::Arc;
use test_utils::{MockBackend, MockBehavior, UploadBehavior, dispatcher_with, payload_b64};

const MIB: usize = 1024 * 1024;

fn request(body: serde_json::Value) -> ProxyRequest {
    ProxyRequest::from_json(body).expect("valid request body")
}

fn message(outcome: &DispatchOutcome) -> &str {
    match outcome {
        DispatchOutcome::Success { text, .. } => text,
        DispatchOutcome::UpstreamError { message, .. }
        | DispatchOutcome::TransportError { message }
        | DispatchOutcome::ValidationError { message, .. } => message,
    }
}

#[tokio::test]
async fn video_frame_alt_text_gets_prefix() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("A cat sits on a ledge."));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "action": "generateAltText",
            "base64Data": payload_b64(1024),
            "mimeType": "image/jpeg",
            "isVideo": true
        })))
        .await;

    assert_eq!(outcome.http_status(), 200);
    assert_eq!(
        outcome,
        DispatchOutcome::alt_text("A frame from a video showing a cat sits on a ledge.")
    );

    let sent = backend.last_request().expect("backend called");
    assert!(sent.instructions().unwrap_or_default().contains("A frame from a video showing"));
    assert!(matches!(
        &sent.parts[1],
        Part::InlineData { mime_type, .. } if mime_type == "image/jpeg"
    ));
    Ok(())
}

#[tokio::test]
async fn large_captions_request_is_uploaded() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success(
        "00:00:00.000 --> 00:00:04.000\n[Music]",
    ));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "action": "generateCaptions",
            "base64Data": payload_b64(30 * MIB),
            "mimeType": "video/webm",
            "duration": 45
        })))
        .await;

    assert_eq!(outcome.http_status(), 200);
    let DispatchOutcome::Success { output, text } = &outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(*output, OutputKind::VttContent);
    assert!(text.starts_with("WEBVTT"));

    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.uploads(), vec![(30 * MIB, "video/webm".to_string())]);

    let sent = backend.last_request().expect("backend called");
    assert!(
        sent.instructions()
            .unwrap_or_default()
            .contains("approximately 45 seconds long")
    );
    match &sent.parts[1] {
        Part::FileData {
            mime_type,
            file_uri,
        } => {
            assert_eq!(mime_type, "video/webm");
            assert!(file_uri.ends_with("mock-1"));
        }
        other => panic!("expected a file reference, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn compression_preference_keeps_mid_size_inline() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("A short clip of waves."));
    let limits = TransportLimitsBuilder::default()
        .inline_max_bytes(16)
        .upload_max_bytes(1024)
        .build()?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(UploadCache::default()), limits);

    let outcome = dispatcher
        .handle(&request(json!({
            "base64Data": payload_b64(512),
            "mimeType": "video/mp4",
            "isVideo": true,
            "useCompression": true
        })))
        .await;

    assert!(outcome.is_success());
    assert_eq!(backend.upload_calls(), 0);
    let sent = backend.last_request().expect("backend called");
    assert!(matches!(sent.parts[1], Part::InlineData { .. }));
    Ok(())
}

#[tokio::test]
async fn oversize_payload_is_rejected_before_backend() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let limits = TransportLimitsBuilder::default()
        .inline_max_bytes(16)
        .upload_max_bytes(64)
        .build()?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(UploadCache::default()), limits);

    let outcome = dispatcher
        .handle(&request(json!({
            "base64Data": payload_b64(65),
            "mimeType": "video/mp4",
            "isVideo": true,
            "useCompression": true
        })))
        .await;

    assert_eq!(outcome.http_status(), 413);
    assert!(message(&outcome).starts_with("alt text generation failed:"));
    assert_eq!(backend.generate_calls(), 0);
    assert_eq!(backend.upload_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_mime_type_never_reaches_backend() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let dispatcher = dispatcher_with(backend.clone());

    for action in ["generateAltText", "generateCaptions"] {
        let outcome = dispatcher
            .handle(&request(json!({
                "action": action,
                "base64Data": payload_b64(8)
            })))
            .await;
        assert_eq!(outcome.http_status(), 400, "{action}");
        assert!(message(&outcome).contains("mimeType"), "{action}");
    }
    assert_eq!(backend.generate_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_base64_is_a_validation_error() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "base64Data": "***not base64***",
            "mimeType": "image/png"
        })))
        .await;

    assert_eq!(outcome.http_status(), 400);
    assert_eq!(backend.generate_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn captions_require_video_type() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "action": "generateCaptions",
            "base64Data": payload_b64(8),
            "mimeType": "image/png"
        })))
        .await;

    assert_eq!(outcome.http_status(), 400);
    assert!(message(&outcome).starts_with("caption generation failed:"));
    assert_eq!(backend.generate_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn condense_requires_directive() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "operation": "condense_text",
            "text": "A long description of a sunset over the sea.",
            "targetLength": 50
        })))
        .await;

    assert_eq!(outcome.http_status(), 400);
    assert!(message(&outcome).starts_with("text condensation failed:"));
    assert!(message(&outcome).contains("directive"));
    assert!(!message(&outcome).contains("targetLength"));
    assert_eq!(backend.generate_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn condense_returns_trimmed_text() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("  Sunset over the sea.\n"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle(&request(json!({
            "action": "condenseText",
            "text": "A long description of a sunset over the sea.",
            "directive": "Keep the colors.",
            "targetLength": "30"
        })))
        .await;

    assert_eq!(outcome, DispatchOutcome::alt_text("Sunset over the sea."));
    let sent = backend.last_request().expect("backend called");
    assert_eq!(sent.parts.len(), 1);
    let instructions = sent.instructions().unwrap_or_default();
    assert!(instructions.contains("TARGET LENGTH: 30"));
    assert!(instructions.contains("DIRECTIVE: Keep the colors."));
    Ok(())
}

#[tokio::test]
async fn backend_status_maps_to_http_status() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_status(503, "model overloaded"));
    let dispatcher = dispatcher_with(backend.clone());
    let body = request(json!({ "base64Data": payload_b64(8), "mimeType": "image/png" }));

    let outcome = dispatcher.handle(&body).await;
    assert_eq!(outcome.http_status(), 502);
    assert_eq!(
        message(&outcome),
        "alt text generation failed: Gemini API Error: model overloaded"
    );

    backend.set_behavior(MockBehavior::Status(429, "quota".into()));
    assert_eq!(dispatcher.handle(&body).await.http_status(), 400);

    backend.set_behavior(MockBehavior::Empty);
    let outcome = dispatcher.handle(&body).await;
    assert_eq!(outcome.http_status(), 502);
    assert!(matches!(
        outcome,
        DispatchOutcome::UpstreamError { status: None, .. }
    ));

    backend.set_behavior(MockBehavior::Success("   ".into()));
    assert_eq!(dispatcher.handle(&body).await.http_status(), 502);
    Ok(())
}

#[tokio::test]
async fn upload_failure_is_a_transport_error() -> anyhow::Result<()> {
    let backend = Arc::new(
        MockBackend::new_success("unused").with_upload_behavior(UploadBehavior::Failed),
    );
    let limits = TransportLimitsBuilder::default()
        .inline_max_bytes(16)
        .upload_max_bytes(1024)
        .build()?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(UploadCache::default()), limits);

    let outcome = dispatcher
        .handle(&request(json!({
            "base64Data": payload_b64(64),
            "mimeType": "video/mp4",
            "isVideo": true
        })))
        .await;

    assert_eq!(outcome.http_status(), 500);
    assert!(message(&outcome).starts_with("alt text generation failed:"));
    assert_eq!(backend.generate_calls(), 0);
    assert!(dispatcher.cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn retry_after_backend_failure_reuses_upload() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_status(500, "internal"));
    let limits = TransportLimitsBuilder::default()
        .inline_max_bytes(16)
        .upload_max_bytes(1024)
        .build()?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(UploadCache::default()), limits);
    let body = request(json!({
        "base64Data": payload_b64(64),
        "mimeType": "video/mp4",
        "isVideo": true
    }));

    assert_eq!(dispatcher.handle(&body).await.http_status(), 502);
    backend.set_behavior(MockBehavior::Success("A drone flies over a field.".into()));
    let outcome = dispatcher.handle(&body).await;

    assert!(outcome.is_success());
    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.generate_calls(), 2);
    let requests = backend.requests();
    assert_eq!(requests[0].parts[1], requests[1].parts[1]);
    Ok(())
}

#[tokio::test]
async fn webm_alt_text_is_declared_as_mp4() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("A person waves."));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle_media(
            MediaDescriptor::new("video/webm; codecs=vp9", true, 8),
            &[0u8; 8],
            OperationContext {
                purpose: Purpose::AltText,
                compression_preferred: false,
            },
        )
        .await;

    assert!(outcome.is_success());
    let sent = backend.last_request().expect("backend called");
    assert!(matches!(
        &sent.parts[1],
        Part::InlineData { mime_type, .. } if mime_type == "video/mp4"
    ));
    Ok(())
}

#[tokio::test]
async fn non_object_body_is_rejected() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("unused"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher.handle_json(json!(["not", "an", "object"])).await;
    assert_eq!(outcome.http_status(), 400);
    assert!(message(&outcome).starts_with("alt text generation failed:"));

    let outcome = dispatcher
        .handle_json(json!({ "action": "generateCaptions", "mimeType": 42 }))
        .await;
    assert_eq!(outcome.http_status(), 400);
    assert!(message(&outcome).starts_with("caption generation failed:"));
    assert_eq!(backend.generate_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn loosely_typed_hints_do_not_reject_request() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("00:00:00.000 --> 00:00:05.000\nHello"));
    let dispatcher = dispatcher_with(backend.clone());

    let outcome = dispatcher
        .handle_json(json!({
            "action": "generateCaptions",
            "base64Data": payload_b64(256),
            "mimeType": "video/mp4",
            "duration": "45",
            "isVideo": "true",
            "useCompression": "no"
        }))
        .await;

    assert_eq!(outcome.http_status(), 200);
    let sent = backend.last_request().expect("backend called");
    assert!(
        sent.instructions()
            .unwrap_or_default()
            .contains("approximately 45 seconds long")
    );

    backend.set_behavior(MockBehavior::Success("A still image.".into()));
    let outcome = dispatcher
        .handle_json(json!({
            "base64Data": payload_b64(256),
            "mimeType": "image/png",
            "duration": "long",
            "isVideo": "yes"
        }))
        .await;
    assert_eq!(outcome, DispatchOutcome::alt_text("A still image."));
    Ok(())
}

#[tokio::test]
async fn uploads_are_cached_per_declared_type() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("A person waves."));
    let limits = TransportLimitsBuilder::default()
        .inline_max_bytes(16)
        .upload_max_bytes(1024)
        .build()?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(UploadCache::default()), limits);
    let context = OperationContext {
        purpose: Purpose::AltText,
        compression_preferred: false,
    };
    let bytes = [7u8; 64];

    for mime_type in ["video/webm", "video/mp4", "video/webm"] {
        let outcome = dispatcher
            .handle_media(MediaDescriptor::new(mime_type, true, 64), &bytes, context)
            .await;
        assert!(outcome.is_success(), "{mime_type}");
    }

    assert_eq!(backend.upload_calls(), 2);
    assert!(
        backend
            .uploads()
            .iter()
            .all(|(_, declared)| declared == "video/mp4")
    );
    assert_eq!(backend.generate_calls(), 3);
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_are_independent() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("Short version."));
    let dispatcher = dispatcher_with(backend.clone());

    let bodies: Vec<ProxyRequest> = (0..4)
        .map(|i| {
            request(json!({
                "operation": "condense_text",
                "text": format!("Long text number {i}."),
                "directive": "Be brief.",
                "targetLength": 20,
                "transcriptId": i
            }))
        })
        .collect();

    let outcomes =
        futures::future::join_all(bodies.iter().map(|body| dispatcher.handle(body))).await;

    assert!(outcomes.iter().all(DispatchOutcome::is_success));
    assert_eq!(backend.generate_calls(), 4);
    let mut texts: Vec<String> = backend
        .requests()
        .iter()
        .filter_map(|r| r.instructions().map(str::to_string))
        .collect();
    texts.sort();
    texts.dedup();
    assert_eq!(texts.len(), 4);
    Ok(())
}
