//! Post-processing of backend output.

use crate::instructions::VIDEO_FRAME_PREFIX;
use alttext_core::ContentCategory;

/// Final alt text for a category: trimmed, with the frame prefix enforced.
pub fn finalize_alt_text(category: ContentCategory, text: &str) -> String {
    let text = text.trim();
    match category {
        ContentCategory::VideoFrame => ensure_video_frame_prefix(text),
        _ => text.to_string(),
    }
}

/// Prepend the video-frame prefix unless the text already carries it.
///
/// The check ignores case. When the prefix is added, the first letter of the
/// original text is lowercased so the sentence still reads naturally.
///
/// # Examples
///
/// ```
/// use alttext_dispatch::ensure_video_frame_prefix;
///
/// assert_eq!(
///     ensure_video_frame_prefix("A cat sits on a ledge."),
///     "A frame from a video showing a cat sits on a ledge."
/// );
/// assert_eq!(
///     ensure_video_frame_prefix("a frame from a video showing a dog."),
///     "a frame from a video showing a dog."
/// );
/// ```
pub fn ensure_video_frame_prefix(text: &str) -> String {
    let marker = "a frame from a video";
    let already_prefixed = text
        .get(..marker.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(marker));
    if already_prefixed {
        return text.to_string();
    }

    let mut chars = text.chars();
    let rest = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{VIDEO_FRAME_PREFIX} {rest}")
}

/// Normalize backend caption output into a WebVTT document.
///
/// Trims whitespace, unwraps a surrounding markdown code fence, and adds the
/// `WEBVTT` header when it is missing.
///
/// # Examples
///
/// ```
/// use alttext_dispatch::normalize_webvtt;
///
/// let vtt = normalize_webvtt("00:00:00.000 --> 00:00:02.000\nHello");
/// assert!(vtt.starts_with("WEBVTT\n\n00:00:00.000"));
/// ```
pub fn normalize_webvtt(text: &str) -> String {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string (e.g. "vtt") on the opening fence line.
        body = rest.split_once('\n').map_or("", |(_, after)| after);
        body = body.trim_end();
        body = body.strip_suffix("```").unwrap_or(body).trim();
    }

    if body.starts_with("WEBVTT") {
        body.to_string()
    } else {
        format!("WEBVTT\n\n{body}")
    }
}
