//! In-process fake of the Gemini REST endpoints.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted answer for `generateContent`.
#[derive(Debug, Clone)]
pub enum FakeGenerate {
    /// 200 with a single text part
    Text(String),
    /// 200 with no candidates
    Empty,
    /// Non-success status with a Google error envelope
    Error { status: u16, message: String },
}

#[derive(Debug)]
struct Shared {
    base_url: String,
    generate: Mutex<FakeGenerate>,
    file_states: Mutex<VecDeque<&'static str>>,
    last_generate_body: Mutex<Option<Value>>,
    last_api_key: Mutex<Option<String>>,
    uploaded_len: Mutex<Option<usize>>,
    upload_starts: AtomicUsize,
    generate_calls: AtomicUsize,
    status_checks: AtomicUsize,
}

impl Shared {
    /// Pop the next scripted file state, repeating the last one forever.
    fn next_state(&self) -> &'static str {
        let mut states = self.file_states.lock().unwrap();
        if states.len() > 1 {
            states.pop_front().unwrap_or("ACTIVE")
        } else {
            states.front().copied().unwrap_or("ACTIVE")
        }
    }

    fn file_json(&self, state: &str) -> Value {
        let error = if state == "FAILED" {
            json!({ "message": "video could not be processed" })
        } else {
            Value::Null
        };
        json!({
            "name": "files/fake-123",
            "uri": format!("{}/v1beta/files/fake-123", self.base_url),
            "mimeType": "video/mp4",
            "state": state,
            "error": error,
        })
    }
}

/// Running fake server.
pub struct FakeGemini {
    shared: Arc<Shared>,
}

impl FakeGemini {
    /// Start a fake answering generate calls with `generate` and reporting
    /// `file_states` in order (the finalize response takes the first one).
    pub async fn start(generate: FakeGenerate, file_states: &[&'static str]) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake gemini");
        let addr: SocketAddr = listener.local_addr().expect("local addr");

        let shared = Arc::new(Shared {
            base_url: format!("http://{addr}"),
            generate: Mutex::new(generate),
            file_states: Mutex::new(file_states.iter().copied().collect()),
            last_generate_body: Mutex::new(None),
            last_api_key: Mutex::new(None),
            uploaded_len: Mutex::new(None),
            upload_starts: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            status_checks: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/v1beta/models/:model_action", post(generate_content))
            .route("/upload/v1beta/files", post(start_upload))
            .route("/upload-session/:id", post(finalize_upload))
            .route("/v1beta/files/:id", get(file_status))
            .with_state(Arc::clone(&shared));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { shared }
    }

    /// Base URL to configure the client with.
    pub fn base_url(&self) -> String {
        self.shared.base_url.clone()
    }

    pub fn generate_calls(&self) -> usize {
        self.shared.generate_calls.load(Ordering::SeqCst)
    }

    pub fn upload_starts(&self) -> usize {
        self.shared.upload_starts.load(Ordering::SeqCst)
    }

    pub fn status_checks(&self) -> usize {
        self.shared.status_checks.load(Ordering::SeqCst)
    }

    pub fn uploaded_len(&self) -> Option<usize> {
        *self.shared.uploaded_len.lock().unwrap()
    }

    pub fn last_generate_body(&self) -> Option<Value> {
        self.shared.last_generate_body.lock().unwrap().clone()
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.shared.last_api_key.lock().unwrap().clone()
    }
}

async fn generate_content(
    State(shared): State<Arc<Shared>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    shared.generate_calls.fetch_add(1, Ordering::SeqCst);
    *shared.last_api_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *shared.last_generate_body.lock().unwrap() = Some(body);

    if !model_action.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let scripted = shared.generate.lock().unwrap().clone();
    match scripted {
        FakeGenerate::Text(text) => Json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
        .into_response(),
        FakeGenerate::Empty => Json(json!({ "candidates": [] })).into_response(),
        FakeGenerate::Error { status, message } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({ "error": { "code": status, "message": message } })),
        )
            .into_response(),
    }
}

async fn start_upload(State(shared): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    shared.upload_starts.fetch_add(1, Ordering::SeqCst);
    let is_start = headers
        .get("x-goog-upload-command")
        .and_then(|v| v.to_str().ok())
        == Some("start");
    if !is_start {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let upload_url = format!("{}/upload-session/session-1", shared.base_url);
    (StatusCode::OK, [("x-goog-upload-url", upload_url)]).into_response()
}

async fn finalize_upload(
    State(shared): State<Arc<Shared>>,
    Path(_id): Path<String>,
    body: Bytes,
) -> Response {
    *shared.uploaded_len.lock().unwrap() = Some(body.len());
    let state = shared.next_state();
    Json(json!({ "file": shared.file_json(state) })).into_response()
}

async fn file_status(State(shared): State<Arc<Shared>>, Path(_id): Path<String>) -> Response {
    shared.status_checks.fetch_add(1, Ordering::SeqCst);
    let state = shared.next_state();
    Json(shared.file_json(state)).into_response()
}
