//! Media descriptor.

/// Strip MIME parameters and normalize case.
///
/// Browsers report recorded media as e.g. `video/webm;codecs=vp9`; only the
/// essence is meaningful to classification and to the backend.
///
/// # Examples
///
/// ```
/// use alttext_core::clean_mime_type;
///
/// assert_eq!(clean_mime_type("video/webm;codecs=vp9"), "video/webm");
/// assert_eq!(clean_mime_type(" Image/PNG "), "image/png");
/// ```
pub fn clean_mime_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Per-request description of an inbound media payload.
///
/// Built fresh for every request and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    /// Declared MIME type, already cleaned with [`clean_mime_type`]
    pub raw_mime_type: String,
    /// Client hint that the media came from a video
    pub is_video_hint: bool,
    /// Approximate media duration, when the client knows it
    pub approx_duration_seconds: Option<f64>,
    /// Decoded payload size in bytes
    pub payload_size_bytes: u64,
}

impl MediaDescriptor {
    /// Create a descriptor, cleaning the declared MIME type.
    pub fn new(raw_mime_type: &str, is_video_hint: bool, payload_size_bytes: u64) -> Self {
        Self {
            raw_mime_type: clean_mime_type(raw_mime_type),
            is_video_hint,
            approx_duration_seconds: None,
            payload_size_bytes,
        }
    }

    /// Attach a duration hint.
    pub fn with_duration(mut self, seconds: Option<f64>) -> Self {
        self.approx_duration_seconds = seconds;
        self
    }

    /// Whether the declared type is an image type.
    pub fn is_image_type(&self) -> bool {
        self.raw_mime_type.starts_with("image/")
    }

    /// Whether the declared type is a video type.
    pub fn is_video_type(&self) -> bool {
        self.raw_mime_type.starts_with("video/")
    }
}
