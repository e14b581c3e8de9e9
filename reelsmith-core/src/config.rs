//! Process configuration for the pipeline and the speech provider.
//!
//! Values come from environment variables with defaults; unparsable values fall back to the
//! default rather than failing startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::Fps;
use crate::render::pipeline::RenderThreading;
use crate::speech::synth::AudioFormat;

/// Default speech provider base URL.
pub const DEFAULT_SPEECH_BASE_URL: &str = "https://api.openai.com";
/// Default speech model.
pub const DEFAULT_SPEECH_MODEL: &str = "gpt-4o-mini-tts";

/// Text-to-speech provider settings.
#[derive(Clone)]
pub struct SpeechConfig {
    /// Bearer token; `None` means speech is unavailable.
    pub api_key: Option<String>,
    /// Provider base URL without trailing slash.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl SpeechConfig {
    /// Load from `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_TTS_MODEL` and
    /// `OPENAI_TTS_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            api_key: get("OPENAI_API_KEY")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            base_url: get("OPENAI_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.base_url),
            model: get("OPENAI_TTS_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(d.model),
            request_timeout: get("OPENAI_TTS_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(d.request_timeout),
        }
    }

    /// Same settings with `key` as the credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Pipeline settings shared by every request.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Parent of the per-request scratch directories.
    pub scratch_root: PathBuf,
    /// Where final assets are written.
    pub output_dir: PathBuf,
    /// Preferred font directory.
    pub font_dir: Option<PathBuf>,
    /// Background music directory.
    pub music_dir: PathBuf,
    /// Fixed part of the per-call timeout.
    pub timeout_base: Duration,
    /// Per-second-of-video part of the per-call timeout.
    pub timeout_per_sec: Duration,
    /// Frame rendering parallelism.
    pub threading: RenderThreading,
    /// Encoding requested from the speech provider for narration clips.
    pub speech_format: AudioFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: Fps::REELS,
            scratch_root: std::env::temp_dir().join("reelsmith"),
            output_dir: PathBuf::from("output"),
            font_dir: None,
            music_dir: PathBuf::from("assets/music"),
            timeout_base: Duration::from_secs(60),
            timeout_per_sec: Duration::from_secs(6),
            threading: RenderThreading::default(),
            speech_format: AudioFormat::Mp3,
        }
    }
}

impl PipelineConfig {
    /// Load from `REELSMITH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let path = |key: &str| get(key).filter(|s| !s.trim().is_empty()).map(PathBuf::from);
        let secs = |key: &str| get(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            fps: d.fps,
            scratch_root: path("REELSMITH_SCRATCH_DIR").unwrap_or(d.scratch_root),
            output_dir: path("REELSMITH_OUTPUT_DIR").unwrap_or(d.output_dir),
            font_dir: path("REELSMITH_FONT_DIR").or(d.font_dir),
            music_dir: path("REELSMITH_MUSIC_DIR").unwrap_or(d.music_dir),
            timeout_base: secs("REELSMITH_TIMEOUT_BASE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.timeout_base),
            timeout_per_sec: secs("REELSMITH_TIMEOUT_PER_SEC")
                .map(Duration::from_secs)
                .unwrap_or(d.timeout_per_sec),
            threading: RenderThreading {
                parallel: get("REELSMITH_RENDER_PARALLEL")
                    .map(|s| !matches!(s.trim(), "0" | "false" | "no" | "off"))
                    .unwrap_or(d.threading.parallel),
                chunk_size: get("REELSMITH_RENDER_CHUNK")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(d.threading.chunk_size),
                threads: get("REELSMITH_RENDER_THREADS")
                    .and_then(|s| s.trim().parse().ok())
                    .filter(|n: &usize| *n > 0),
            },
            speech_format: d.speech_format,
        }
    }

    /// Budget for one external call on a reel of `duration_secs` seconds.
    pub fn call_timeout(&self, duration_secs: u32) -> Duration {
        self.timeout_base + self.timeout_per_sec * duration_secs
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
