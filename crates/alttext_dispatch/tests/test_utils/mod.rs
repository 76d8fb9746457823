//! Test utilities for dispatcher tests.
//!
//! This module provides a mock backend and request helpers.

#[allow(dead_code)]
pub mod mock_backend;

#[allow(unused_imports)]
pub use mock_backend::{MockBehavior, MockBackend, UploadBehavior};

use alttext_cache::UploadCache;
use alttext_dispatch::{Dispatcher, TransportLimits};
use base64::Engine;
use std::sync::Arc;

/// Build a dispatcher over `backend` with a fresh cache and default limits.
#[allow(dead_code)]
pub fn dispatcher_with(backend: Arc<MockBackend>) -> Dispatcher {
    Dispatcher::new(
        backend,
        Arc::new(UploadCache::default()),
        TransportLimits::default(),
    )
}

/// Base64-encode `len` bytes of filler.
#[allow(dead_code)]
pub fn payload_b64(len: usize) -> String {
    base64::engine::general_purpose::STANDARD.encode(vec![0x5au8; len])
}
