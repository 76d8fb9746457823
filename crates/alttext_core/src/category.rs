//! Content categories.

/// MIME types treated as natively animated images.
pub const ANIMATED_IMAGE_MIME_TYPES: [&str; 3] = ["image/gif", "image/webp", "image/apng"];

/// Whether a cleaned MIME type is one of the recognized animated-image types.
///
/// # Examples
///
/// ```
/// use alttext_core::is_animated_image_type;
///
/// assert!(is_animated_image_type("image/gif"));
/// assert!(!is_animated_image_type("image/png"));
/// ```
pub fn is_animated_image_type(mime_type: &str) -> bool {
    ANIMATED_IMAGE_MIME_TYPES.contains(&mime_type)
}

/// Classification bucket for a media request.
///
/// Decides which instruction template is sent to the backend and which
/// post-processing rule applies to its answer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ContentCategory {
    /// A single static image
    #[display("still image")]
    StillImage,
    /// GIF/WebP/APNG, or a short clip sent without the video hint
    #[display("animated content")]
    AnimatedImage,
    /// A video with its native container preserved
    #[display("full video")]
    FullVideo,
    /// A still frame extracted upstream from a video
    #[display("video frame")]
    VideoFrame,
    /// Media of no particular kind
    #[display("generic media")]
    GenericMedia,
}

impl ContentCategory {
    /// Whether a duration hint is meaningful for this category.
    pub fn is_time_based(&self) -> bool {
        matches!(
            self,
            ContentCategory::FullVideo | ContentCategory::AnimatedImage
        )
    }
}
