//! Content classification.

use alttext_core::{ContentCategory, MediaDescriptor, is_animated_image_type};

/// Bucket a media descriptor into a content category.
///
/// Rules are checked in order and the first match wins:
///
/// 1. video hint on a non-animated image: a frame extracted from a video
/// 2. animated image type, or a video type sent without the hint: animation
/// 3. any remaining video type or video hint: full video
/// 4. everything else: still image
///
/// Never fails. Types that are neither `image/*` nor `video/*` are logged
/// and still classified.
///
/// # Examples
///
/// ```
/// use alttext_core::{ContentCategory, MediaDescriptor};
/// use alttext_dispatch::classify;
///
/// let frame = MediaDescriptor::new("image/jpeg", true, 1024);
/// assert_eq!(classify(&frame), ContentCategory::VideoFrame);
///
/// let gif = MediaDescriptor::new("image/gif", true, 1024);
/// assert_eq!(classify(&gif), ContentCategory::AnimatedImage);
/// ```
pub fn classify(descriptor: &MediaDescriptor) -> ContentCategory {
    let mime = descriptor.raw_mime_type.as_str();
    let animated = is_animated_image_type(mime);
    let is_image = descriptor.is_image_type();
    let is_video = descriptor.is_video_type();

    if !is_image && !is_video {
        tracing::warn!(mime_type = mime, "Unrecognized media type, classifying anyway");
    }

    let category = if descriptor.is_video_hint && is_image && !animated {
        ContentCategory::VideoFrame
    } else if animated || (is_video && !descriptor.is_video_hint) {
        ContentCategory::AnimatedImage
    } else if is_video || descriptor.is_video_hint {
        ContentCategory::FullVideo
    } else {
        ContentCategory::StillImage
    };

    tracing::debug!(
        mime_type = mime,
        is_video_hint = descriptor.is_video_hint,
        %category,
        "Classified media"
    );
    category
}

/// MIME type to declare to the backend for alt-text requests.
///
/// Animated images flagged as video, and WebM video, are declared as MP4,
/// which the backend handles more reliably. The payload bytes are unchanged.
pub fn backend_mime_type(descriptor: &MediaDescriptor) -> String {
    let mime = descriptor.raw_mime_type.as_str();
    if (descriptor.is_video_hint && is_animated_image_type(mime)) || mime == "video/webm" {
        tracing::debug!(from = mime, to = "video/mp4", "Overriding backend MIME type");
        "video/mp4".to_string()
    } else {
        mime.to_string()
    }
}
