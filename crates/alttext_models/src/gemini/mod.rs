//! Google Gemini REST backend.
//!
//! - `generateContent` for single-turn multimodal generation
//! - Files API resumable upload for large payloads, staged through a
//!   temporary file and polled until the stored object is usable

mod client;
mod config;
mod dto;
mod staging;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};
