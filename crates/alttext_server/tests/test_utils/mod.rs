//! Test utilities for router tests.

#[allow(dead_code)]
pub mod mock_backend;

pub use mock_backend::MockBackend;

use alttext_cache::UploadCache;
use alttext_dispatch::{Dispatcher, TransportLimits};
use alttext_server::{AppState, create_router};
use axum::Router;
use std::sync::Arc;

/// Router over `backend` with default limits and the given body limit.
pub fn router_with(backend: Arc<MockBackend>, body_limit_bytes: usize) -> Router {
    let dispatcher = Dispatcher::new(
        backend,
        Arc::new(UploadCache::default()),
        TransportLimits::default(),
    );
    create_router(AppState::new(Arc::new(dispatcher)), body_limit_bytes)
}
