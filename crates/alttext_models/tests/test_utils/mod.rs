//! Test utilities for backend tests.
//!
//! Provides a local HTTP server that speaks the subset of the Gemini REST API
//! the client uses.

#[allow(dead_code)]
pub mod fake_gemini;

#[allow(unused_imports)]
pub use fake_gemini::{FakeGemini, FakeGenerate};
