//! Mock media backend for testing.

use alttext_core::{GenerateRequest, GenerateResponse, RemoteHandle};
use alttext_error::{
    AltTextResult, TransportError, TransportErrorKind, UpstreamError, UpstreamErrorKind,
};
use alttext_interface::MediaBackend;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How `generate` answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given text
    Success(String),
    /// Return success with no text
    Empty,
    /// Fail with the given backend status and message
    Status(u16, String),
}

/// How `upload` answers.
#[derive(Debug, Clone)]
pub enum UploadBehavior {
    /// Return a handle for `files/mock-N`
    Ready,
    /// Fail as if the remote store reported FAILED
    Failed,
}

/// Mock backend recording every call.
pub struct MockBackend {
    behavior: Mutex<MockBehavior>,
    upload_behavior: UploadBehavior,
    generate_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
    uploads: Mutex<Vec<(usize, String)>>,
}

impl MockBackend {
    /// Backend that always succeeds with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Backend that always fails with `status`.
    pub fn new_status(status: u16, message: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Status(status, message.into()))
    }

    /// Backend with custom generate behavior and working uploads.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            upload_behavior: UploadBehavior::Ready,
            generate_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Replace the upload behavior.
    pub fn with_upload_behavior(mut self, behavior: UploadBehavior) -> Self {
        self.upload_behavior = behavior;
        self
    }

    /// Change how later `generate` calls answer.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Number of `generate` calls.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Number of `upload` calls.
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// Every request passed to `generate`, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent `generate` request.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// `(size, mime_type)` of every upload, in order.
    pub fn uploads(&self) -> Vec<(usize, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaBackend for MockBackend {
    async fn generate(&self, req: &GenerateRequest) -> AltTextResult<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req.clone());

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockBehavior::Success(text) => Ok(GenerateResponse::text(text)),
            MockBehavior::Empty => Ok(GenerateResponse::empty()),
            MockBehavior::Status(status, message) => {
                Err(UpstreamError::new(UpstreamErrorKind::Status { status, message }).into())
            }
        }
    }

    async fn upload(&self, data: &[u8], mime_type: &str) -> AltTextResult<RemoteHandle> {
        let n = self.upload_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.uploads
            .lock()
            .unwrap()
            .push((data.len(), mime_type.to_string()));

        match self.upload_behavior {
            UploadBehavior::Ready => Ok(RemoteHandle {
                name: format!("files/mock-{n}"),
                uri: format!("https://files.mock/v1beta/files/mock-{n}"),
                mime_type: mime_type.to_string(),
            }),
            UploadBehavior::Failed => Err(TransportError::new(TransportErrorKind::UploadFailed(
                "files/mock failed processing".into(),
            ))
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
