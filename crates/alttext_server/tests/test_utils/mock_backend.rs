//! Mock media backend for router tests.

use alttext_core::{GenerateRequest, GenerateResponse, RemoteHandle};
use alttext_error::{AltTextResult, UpstreamError, UpstreamErrorKind};
use alttext_interface::MediaBackend;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Backend answering every call the same way.
pub struct MockBackend {
    response: Result<String, (u16, String)>,
    generate_calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockBackend {
    /// Backend that always succeeds with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new(Ok(text.into()))
    }

    /// Backend that always fails with `status`.
    pub fn new_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(Err((status, message.into())))
    }

    fn new(response: Result<String, (u16, String)>) -> Self {
        Self {
            response,
            generate_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate` calls.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// The most recent `generate` request.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MediaBackend for MockBackend {
    async fn generate(&self, req: &GenerateRequest) -> AltTextResult<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req.clone());
        match &self.response {
            Ok(text) => Ok(GenerateResponse::text(text.clone())),
            Err((status, message)) => Err(UpstreamError::new(UpstreamErrorKind::Status {
                status: *status,
                message: message.clone(),
            })
            .into()),
        }
    }

    async fn upload(&self, _data: &[u8], mime_type: &str) -> AltTextResult<RemoteHandle> {
        Ok(RemoteHandle {
            name: "files/mock".to_string(),
            uri: "https://files.mock/v1beta/files/mock".to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
