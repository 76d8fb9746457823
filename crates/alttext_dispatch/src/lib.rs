//! Media classification, transport planning and dispatch.
//!
//! A request flows one way through this crate:
//!
//! 1. [`classify`] buckets the media into a [`ContentCategory`](alttext_core::ContentCategory)
//! 2. [`select_instructions`] picks the matching instruction template
//! 3. [`TransportLimits::plan`] decides between inline and remote upload
//! 4. the [`Dispatcher`] calls the backend (through the upload cache when needed)
//! 5. [`finalize_alt_text`] / [`normalize_webvtt`] post-process the answer
//!
//! Every request ends in exactly one [`DispatchOutcome`](alttext_core::DispatchOutcome).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod dispatcher;
mod instructions;
mod planner;
mod postprocess;
mod stage;

pub use classifier::{backend_mime_type, classify};
pub use dispatcher::{Dispatcher, OperationContext};
pub use instructions::{
    DEFAULT_CAPTION_DURATION_SECS, InstructionContext, Purpose, VIDEO_FRAME_PREFIX,
    condensation_instructions, format_duration, select_instructions, template_for,
};
pub use planner::{INLINE_MAX_BYTES, TransportLimits, TransportLimitsBuilder, UPLOAD_MAX_BYTES};
pub use postprocess::{ensure_video_frame_prefix, finalize_alt_text, normalize_webvtt};
pub use stage::{RequestStage, StageTracker};
