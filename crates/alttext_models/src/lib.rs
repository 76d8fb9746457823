//! Generative backends for the alttext proxy.
//!
//! Currently a single provider: Google Gemini over its REST API, including
//! the Files API used for payloads too large to send inline.
//!
//! ```no_run
//! use alttext_core::{GenerateRequest, GenerationConfig, Part};
//! use alttext_interface::MediaBackend;
//! use alttext_models::{GeminiClient, GeminiConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env(GeminiConfig::default())?;
//! let request = GenerateRequest::new(
//!     vec![Part::Text("Say hello".to_string())],
//!     GenerationConfig::condensation(),
//! );
//! let response = client.generate(&request).await?;
//! println!("{:?}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, GeminiConfigBuilder};
