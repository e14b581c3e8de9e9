//! Request-level configuration for one reel.
//!
//! A [`RenderRequest`] is the loose, wire-facing shape. [`RenderRequest::validate`] turns it
//! into a [`ReelSpec`], the immutable value every pipeline stage reads from.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::emoji::augment_with_emoji;

/// Shortest accepted reel, in seconds.
pub const MIN_DURATION_SECS: i64 = 1;
/// Longest accepted reel, in seconds.
pub const MAX_DURATION_SECS: i64 = 20;
/// Longest accepted caption, in characters.
pub const MAX_TEXT_CHARS: usize = 600;

/// Output orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// 9:16, the reels default.
    #[default]
    Portrait,
    /// 16:9.
    Landscape,
}

impl AspectMode {
    /// Fixed pixel size for this orientation.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Portrait => Canvas {
                width: 720,
                height: 1280,
            },
            Self::Landscape => Canvas {
                width: 1280,
                height: 720,
            },
        }
    }
}

/// Typographic preset: type size and font family choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    /// Bold serif, medium size.
    #[default]
    Inspirational,
    /// Heavy sans, largest size.
    Impactful,
    /// Regular sans, smallest size.
    Minimal,
}

/// Frame background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Vertical two-color gradient with a radial highlight near the top.
    #[default]
    Gradient,
    /// Flat near-black fill.
    Dark,
    /// Flat off-white fill.
    Light,
}

/// Text entrance animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnimation {
    /// Alpha ramps in.
    #[default]
    Fade,
    /// Text rises from 80px below its resting position.
    Slide,
    /// Text grows from 92% to 102% scale.
    Zoom,
}

/// Whether the caption gets keyword emoji appended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiMode {
    /// Append up to two emoji picked from caption keywords.
    #[default]
    Auto,
    /// Leave the caption untouched.
    Off,
}

/// Which voices read the caption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationMode {
    /// Silent video (music only, if any).
    #[default]
    None,
    /// One voice reads the caption.
    Narrator,
    /// Narrator reads the caption, then a second voice answers.
    #[serde(alias = "narrator+character", alias = "dual")]
    NarratorCharacter,
}

impl NarrationMode {
    /// Whether any speech is synthesized.
    pub fn has_voice(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Voice gender bucket used for voice pairing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    /// Female narrator and character voices.
    #[default]
    Female,
    /// Male narrator and character voices.
    Male,
}

/// Caption language; drives voice pairing and the character reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish (default).
    #[default]
    Es,
    /// English.
    En,
}

impl Language {
    /// Parse a loose language tag; anything unrecognised falls back to Spanish.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "en" || tag.starts_with("en-") || tag.starts_with("en_") {
            Self::En
        } else {
            Self::Es
        }
    }
}

/// Background music selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicChoice {
    /// No music.
    #[default]
    None,
    /// Soft piano bed.
    Soft,
    /// Cinematic strings.
    Cinematic,
    /// Upbeat track.
    Happy,
}

/// Wire-facing reel request. Every knob except `text` has a default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Caption text.
    pub text: String,
    /// Duration in whole seconds; validated into `[1, 20]`.
    #[serde(default = "default_duration")]
    pub duration: i64,
    /// Output orientation.
    #[serde(default, alias = "aspectMode")]
    pub aspect: AspectMode,
    /// Typographic preset.
    #[serde(default)]
    pub style: VisualStyle,
    /// Frame background.
    #[serde(default)]
    pub background: BackgroundKind,
    /// Text animation.
    #[serde(default)]
    pub animation: TextAnimation,
    /// Emoji augmentation.
    #[serde(default, alias = "emojiMode")]
    pub emoji: EmojiMode,
    /// Narration voices.
    #[serde(default, alias = "narrationMode")]
    pub narration: NarrationMode,
    /// Voice gender bucket.
    #[serde(default, alias = "voiceGender")]
    pub voice_gender: VoiceGender,
    /// Language tag (`es`, `en`, ...).
    #[serde(default = "default_language")]
    pub language: String,
    /// Background music.
    #[serde(default)]
    pub music: MusicChoice,
    /// When true, a failed narration fails the request instead of degrading to a voiceless reel.
    #[serde(default, alias = "narrationRequired")]
    pub narration_required: bool,
}

fn default_duration() -> i64 {
    6
}

fn default_language() -> String {
    "es".to_string()
}

impl RenderRequest {
    /// Request with the given caption and every other knob at its default.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: default_duration(),
            aspect: AspectMode::default(),
            style: VisualStyle::default(),
            background: BackgroundKind::default(),
            animation: TextAnimation::default(),
            emoji: EmojiMode::default(),
            narration: NarrationMode::default(),
            voice_gender: VoiceGender::default(),
            language: default_language(),
            music: MusicChoice::default(),
            narration_required: false,
        }
    }

    /// Validate once at ingress and freeze into a [`ReelSpec`].
    pub fn validate(&self) -> ReelResult<ReelSpec> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ReelError::validation("text must be non-empty"));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ReelError::validation(format!(
                "text must be at most {MAX_TEXT_CHARS} characters"
            )));
        }
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.duration) {
            return Err(ReelError::validation(format!(
                "duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds, got {}",
                self.duration
            )));
        }

        let caption = match self.emoji {
            EmojiMode::Auto => augment_with_emoji(text),
            EmojiMode::Off => text.to_string(),
        };

        Ok(ReelSpec {
            text: text.to_string(),
            caption,
            duration_secs: self.duration as u32,
            fps: Fps::REELS,
            aspect: self.aspect,
            style: self.style,
            background: self.background,
            animation: self.animation,
            narration: self.narration,
            voice_gender: self.voice_gender,
            language: Language::from_tag(&self.language),
            music: self.music,
            narration_required: self.narration_required,
        })
    }
}

/// Validated, immutable per-request configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReelSpec {
    /// Trimmed caption as submitted; this is what the narrator reads.
    pub text: String,
    /// Caption as rendered on screen (emoji-augmented when requested).
    pub caption: String,
    /// Duration in seconds, within `[1, 20]`.
    pub duration_secs: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Output orientation.
    pub aspect: AspectMode,
    /// Typographic preset.
    pub style: VisualStyle,
    /// Frame background.
    pub background: BackgroundKind,
    /// Text animation.
    pub animation: TextAnimation,
    /// Narration voices.
    pub narration: NarrationMode,
    /// Voice gender bucket.
    pub voice_gender: VoiceGender,
    /// Resolved language.
    pub language: Language,
    /// Background music.
    pub music: MusicChoice,
    /// Whether narration failure fails the whole request.
    pub narration_required: bool,
}

impl ReelSpec {
    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.aspect.canvas()
    }

    /// Number of frames to render.
    pub fn total_frames(&self) -> u64 {
        self.fps.total_frames(self.duration_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
