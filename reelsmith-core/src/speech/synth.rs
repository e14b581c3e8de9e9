use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};

/// Provider input ceiling in characters; longer text is cut before submission.
pub const MAX_INPUT_CHARS: usize = 4096;
/// Slowest accepted speaking rate.
pub const MIN_SPEED: f32 = 0.25;
/// Fastest accepted speaking rate.
pub const MAX_SPEED: f32 = 4.0;

/// Which speaker a clip belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechRole {
    /// Reads the caption.
    Narrator,
    /// Answers the narrator in narrator-plus-character mode.
    Character,
}

/// Encoded audio container returned by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG layer III.
    #[default]
    Mp3,
    /// PCM WAV.
    Wav,
    /// Opus in Ogg.
    Opus,
    /// AAC in ADTS.
    Aac,
    /// FLAC.
    Flac,
}

impl AudioFormat {
    /// Provider `response_format` value and file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
        }
    }

    /// HTTP content type for the encoded bytes.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Opus => "audio/ogg",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
        }
    }
}

/// One text-to-speech call.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpeechRequest {
    /// Text to speak.
    pub text: String,
    /// Provider voice identifier.
    pub voice: String,
    /// Speaking rate multiplier.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Output encoding.
    #[serde(default)]
    pub format: AudioFormat,
    /// Optional delivery style hint.
    #[serde(default)]
    pub instructions: Option<String>,
}

fn default_speed() -> f32 {
    1.0
}

impl SpeechRequest {
    /// Request for `text` in `voice` at normal speed as MP3.
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            speed: default_speed(),
            format: AudioFormat::default(),
            instructions: None,
        }
    }

    /// Reject empty text, empty voice and out-of-range speed.
    pub fn validate(&self) -> ReelResult<()> {
        if self.text.trim().is_empty() {
            return Err(ReelError::validation("speech text must not be empty"));
        }
        if self.voice.trim().is_empty() {
            return Err(ReelError::validation("speech voice must not be empty"));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(ReelError::validation(format!(
                "speech speed must be within {MIN_SPEED}..={MAX_SPEED}, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Cut `text` to at most [`MAX_INPUT_CHARS`] characters.
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Text-to-speech capability.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether credentials are present. Checked before any rendering starts.
    fn is_configured(&self) -> bool;

    /// Encoded audio for `request`.
    async fn synthesize(&self, request: &SpeechRequest) -> ReelResult<Vec<u8>>;
}

#[cfg(test)]
#[path = "../../tests/unit/speech/synth.rs"]
mod tests;
