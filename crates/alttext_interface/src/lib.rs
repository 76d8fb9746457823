//! Backend capability trait for the alttext proxy.
//!
//! The dispatcher only needs two things from a generative backend: run a
//! single-turn generation, and park a large payload in the backend's file
//! store so later requests can reference it by handle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::MediaBackend;
