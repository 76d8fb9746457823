//! Core data types for the alttext proxy.
//!
//! These types describe a request as it moves through the dispatch pipeline:
//! the wire body ([`ProxyRequest`]), the derived [`MediaDescriptor`], its
//! [`ContentCategory`], the chosen [`TransportPlan`], the backend request and
//! response, and the terminal [`DispatchOutcome`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod descriptor;
mod generate;
mod outcome;
mod proxy;
mod transport;

pub use category::{ANIMATED_IMAGE_MIME_TYPES, ContentCategory, is_animated_image_type};
pub use descriptor::{MediaDescriptor, clean_mime_type};
pub use generate::{GenerateRequest, GenerateResponse, GenerationConfig, Part};
pub use outcome::{DispatchOutcome, OutputKind, ResponseBody};
pub use proxy::{Operation, ProxyRequest};
pub use transport::{RemoteHandle, TransportPlan};
