//! Instruction templates and selection.

use alttext_core::ContentCategory;

/// Prefix every video-frame description must start with.
pub const VIDEO_FRAME_PREFIX: &str = "A frame from a video showing";

/// Duration assumed for captioning when the client sent none.
pub const DEFAULT_CAPTION_DURATION_SECS: f64 = 60.0;

const STILL_IMAGE: &str = r#"You write alternative text (alt text) for static images so that blind and low-vision people using screen readers understand what the image shows.

WHAT TO COVER:
1. The kind of image: photograph, illustration, chart, diagram, screenshot, painting, and so on.
2. The most important subject first, then supporting detail.
3. Any visible text, transcribed exactly and placed in quotation marks.
4. What the image communicates in context, when that is evident.
5. Well-known people by name when they are clearly recognizable and it matters.
6. For interface screenshots, the relevant controls and their state.

STYLE:
- Plain, neutral, factual wording. No artistic interpretation.
- Short for simple images (roughly 150 characters), longer only when the content demands it.
- Complete sentences with correct grammar and punctuation, ending in a period.

AVOID:
- Openers such as "Image of" or "Picture showing".
- Emotions, opinions, or guesses about things that are not visible.
- Decorative or poetic language.

Reply with the alt text only. No preamble, no explanation."#;

const ANIMATED: &str = r#"You write alternative text for animated visuals (GIFs, animated WebP or APNG images, and short looping clips) so that screen reader users get the whole animation, not a single still.

WHAT TO COVER:
1. What kind of animation it is, for example "Animated GIF" or "Short looping clip".
2. The full sequence described as one continuous action.
3. Movement, transitions, and how the scene changes.
4. Whether it loops.
5. The moments that carry the point of the animation.
6. Any text that appears, transcribed exactly.

STYLE:
- Describe the action as a whole, in the present tense ("A dog repeatedly spins in a circle...").
- Be specific about motion and change while staying factual.

AVOID:
- Timestamps or frame-by-frame breakdowns.
- Openers such as "Video of" or "Animation showing".

Example: "Animated GIF of a cat on a windowsill lifting and lowering its head in a steady bobbing motion that loops without a break."

Reply with the alt text only. No preamble, no explanation."#;

const FULL_VIDEO: &str = r#"You write alternative text for complete videos so that people who cannot see them understand what happens from start to finish.

WHAT TO COVER:
1. The overall subject or purpose of the video, stated first.
2. How the visuals progress from scene to scene.
3. Significant actions, movement, and changes.
4. On-screen text, titles, and captions, transcribed exactly.
5. Settings and surroundings.
6. The moments that matter most.
7. Color, composition, and visual style where they add meaning.

COVERAGE:
- The beginning, middle, and end, not just the opening shot.
- Scene changes, graphics, charts, and other visual aids.
- Clothing, objects, and environment when relevant.

STYLE:
- Present tense, objective, and readable.
- Focus on what the picture shows that the soundtrack would not convey.

AVOID:
- Describing a single frame or the thumbnail only.
- Timestamped breakdowns.
- Openers such as "Video of" or "This video shows".

Reply with the alt text only. No preamble, no explanation."#;

const VIDEO_FRAME: &str = r#"You are describing one frame taken from a longer video; only this frame is available. Describe it as fully as possible while making clear it is a single moment.

WHAT TO COVER:
1. Begin with "A frame from a video showing" so readers know this is one frame.
2. Everything visible: people, expressions, posture, clothing, objects, setting.
3. Any visible text, transcribed exactly.
4. Color, lighting, and composition.
5. What the video is likely about and what action may be under way, based on this frame.

STYLE:
- Present tense, objective, and thorough, since this frame is all the reader gets.

Reply with the alt text only, starting with the required prefix."#;

const GENERIC_MEDIA: &str = r#"You write alternative text for media so that screen reader users understand what it contains.

Describe the most important content first, transcribe any visible text exactly, and keep the wording factual and concise. Do not begin with "Image of" or similar openers.

Reply with the alt text only. No preamble, no explanation."#;

const CAPTIONS: &str = r#"You produce WebVTT caption files for videos. Use both the picture and the soundtrack to write accurate, well-timed captions.

FORMAT (follow exactly):
1. The first line is "WEBVTT".
2. One blank line follows it.
3. Each cue is a timing line "HH:MM:SS.mmm --> HH:MM:SS.mmm", then one or two lines of caption text, then a blank line.

Example:
WEBVTT

00:00:00.000 --> 00:00:03.000
[Upbeat music]

00:00:03.000 --> 00:00:06.500
Welcome back to the workshop.

CAPTION RULES:
1. Transcribe speech word for word.
2. Put meaningful sound effects and music in square brackets, e.g. [Door slams], [Soft piano music].
3. Keep each cue between two and five seconds and split long sentences across cues.
4. Use correct punctuation and capitalization.
5. During silence, describe important visual action in brackets.
6. Label speakers when there is more than one, e.g. "Speaker 2: Thanks."
7. Note tone in brackets where it matters, e.g. [laughs], [whispering].

TIMING:
- Cues appear while the words are spoken and never last longer than five seconds.
- Leave short gaps between fast exchanges so captions stay readable.

Reply with the WebVTT content only, starting with "WEBVTT". No commentary and no markdown code fences."#;

const CONDENSATION: &str = r#"You shorten text while keeping its meaning.

RULES:
1. Keep every key fact, figure, and essential detail.
2. Keep the original tone and voice.
3. Remove repetition and filler.
4. Keep enough context for the result to read clearly on its own.
5. Meet the requested target length.

Reply with the condensed text only. No commentary."#;

/// What the backend is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Purpose {
    /// A screen-reader description
    AltText,
    /// A WebVTT caption track
    Captions,
}

/// Per-request inputs to instruction selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstructionContext {
    /// What the output is for
    pub purpose: Purpose,
    /// Approximate media duration, when known
    pub duration_seconds: Option<f64>,
}

impl InstructionContext {
    /// Alt-text context with an optional duration.
    pub fn alt_text(duration_seconds: Option<f64>) -> Self {
        Self {
            purpose: Purpose::AltText,
            duration_seconds,
        }
    }

    /// Caption context with an optional duration.
    pub fn captions(duration_seconds: Option<f64>) -> Self {
        Self {
            purpose: Purpose::Captions,
            duration_seconds,
        }
    }
}

/// Alt-text template for a category.
pub fn template_for(category: ContentCategory) -> &'static str {
    match category {
        ContentCategory::StillImage => STILL_IMAGE,
        ContentCategory::AnimatedImage => ANIMATED,
        ContentCategory::FullVideo => FULL_VIDEO,
        ContentCategory::VideoFrame => VIDEO_FRAME,
        ContentCategory::GenericMedia => GENERIC_MEDIA,
    }
}

/// Render a duration without a trailing `.0`.
///
/// # Examples
///
/// ```
/// use alttext_dispatch::format_duration;
///
/// assert_eq!(format_duration(45.0), "45");
/// assert_eq!(format_duration(12.5), "12.5");
/// ```
pub fn format_duration(seconds: f64) -> String {
    format!("{seconds}")
}

/// Build the full instruction text for a media request.
///
/// Pure; the same inputs always produce the same text.
pub fn select_instructions(category: ContentCategory, context: &InstructionContext) -> String {
    match context.purpose {
        Purpose::Captions => {
            let seconds = context
                .duration_seconds
                .unwrap_or(DEFAULT_CAPTION_DURATION_SECS);
            format!(
                "{CAPTIONS}\n\nThis video is approximately {} seconds long. Please create appropriate captions with timestamps that cover this duration.",
                format_duration(seconds)
            )
        }
        Purpose::AltText => {
            let template = template_for(category);
            match context.duration_seconds {
                Some(seconds) if category.is_time_based() => format!(
                    "{template}\n\nThis video is approximately {} seconds long.",
                    format_duration(seconds)
                ),
                _ => template.to_string(),
            }
        }
    }
}

/// Build the instruction text for a text condensation request.
pub fn condensation_instructions(text: &str, directive: &str, target_length: &str) -> String {
    format!(
        "{CONDENSATION}\n\nTARGET LENGTH: {target_length}\nDIRECTIVE: {directive}\n\nTEXT TO CONDENSE:\n{text}"
    )
}
