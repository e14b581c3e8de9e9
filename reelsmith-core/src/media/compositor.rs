use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::ReelResult;
use crate::media::engine::{MediaEngine, MediaInput, MediaJob};

/// Music level under narration, as a fraction of nominal.
pub const MUSIC_BED_VOLUME: f32 = 0.25;

/// Sidechain compressor settings that push music under the voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ducking {
    /// Voice level at which compression kicks in (linear, 0..1).
    pub threshold: f32,
    /// Compression ratio, `n:1`.
    pub ratio: f32,
    /// Attack in milliseconds.
    pub attack_ms: u32,
    /// Release in milliseconds.
    pub release_ms: u32,
}

impl Default for Ducking {
    fn default() -> Self {
        Self {
            threshold: 0.03,
            ratio: 10.0,
            attack_ms: 20,
            release_ms: 250,
        }
    }
}

/// Which audio recipe the final container uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioPlan {
    /// Voice over ducked, looped music.
    VoiceAndMusic,
    /// Voice track only.
    VoiceOnly,
    /// Looped music only.
    MusicOnly,
    /// No audio; the silent video is copied as-is.
    Silent,
}

impl AudioPlan {
    /// Plan for the given optional tracks.
    pub fn for_tracks(voice: bool, music: bool) -> Self {
        match (voice, music) {
            (true, true) => Self::VoiceAndMusic,
            (true, false) => Self::VoiceOnly,
            (false, true) => Self::MusicOnly,
            (false, false) => Self::Silent,
        }
    }

    /// Whether the output carries an audio stream.
    pub fn has_audio(self) -> bool {
        self != Self::Silent
    }
}

/// Filter graph for voice (input 1) over ducked music (input 2).
///
/// The voice is split: one copy keys the compressor, the other goes to the mix.
pub fn ducking_graph(ducking: Ducking) -> String {
    format!(
        "[1:a]asplit=2[voice_mix][voice_key];\
         [2:a]volume={vol}[bed];\
         [bed][voice_key]sidechaincompress=threshold={th}:ratio={ratio}:attack={atk}:release={rel}[ducked];\
         [voice_mix][ducked]amix=inputs=2:duration=longest:normalize=0:dropout_transition=0[aout]",
        vol = MUSIC_BED_VOLUME,
        th = ducking.threshold,
        ratio = ducking.ratio,
        atk = ducking.attack_ms,
        rel = ducking.release_ms,
    )
}

fn mux_output_args() -> Vec<String> {
    [
        "-c:v",
        "copy",
        "-c:a",
        "aac",
        "-b:a",
        "192k",
        "-shortest",
        "-movflags",
        "+faststart",
    ]
    .map(String::from)
    .to_vec()
}

/// Build the mux job for `video` plus optional tracks, or `None` when no audio is present.
///
/// Video is stream-copied, audio is re-encoded to AAC, and the shortest stream sets the
/// output length. Music is looped so it never ends before the video.
pub fn plan_mux(
    video: &Path,
    voice: Option<&Path>,
    music: Option<&Path>,
    output: &Path,
    ducking: Ducking,
) -> Option<MediaJob> {
    let video_in = MediaInput::file(video);
    let (label, inputs, filter_complex, maps) = match (voice, music) {
        (Some(voice), Some(music)) => (
            "mux_voice_music",
            vec![video_in, MediaInput::file(voice), MediaInput::looped(music)],
            Some(ducking_graph(ducking)),
            vec!["0:v".to_string(), "[aout]".to_string()],
        ),
        (Some(voice), None) => (
            "mux_voice",
            vec![video_in, MediaInput::file(voice)],
            None,
            vec!["0:v".to_string(), "1:a".to_string()],
        ),
        (None, Some(music)) => (
            "mux_music",
            vec![video_in, MediaInput::looped(music)],
            None,
            vec!["0:v".to_string(), "1:a".to_string()],
        ),
        (None, None) => return None,
    };
    Some(MediaJob {
        label,
        inputs,
        filter_complex,
        maps,
        output_args: mux_output_args(),
        output: output.to_path_buf(),
    })
}

/// Combine `video` with optional voice and music into `output`.
#[tracing::instrument(level = "debug", skip(engine), fields(video = %video.display()))]
pub async fn mux(
    engine: &dyn MediaEngine,
    video: &Path,
    voice: Option<&Path>,
    music: Option<&Path>,
    output: &Path,
    timeout: Duration,
) -> ReelResult<AudioPlan> {
    let plan = AudioPlan::for_tracks(voice.is_some(), music.is_some());
    match plan_mux(video, voice, music, output, Ducking::default()) {
        Some(job) => engine.run(&job, timeout).await?,
        None => {
            tokio::fs::copy(video, output).await.with_context(|| {
                format!(
                    "copy silent video '{}' to '{}'",
                    video.display(),
                    output.display()
                )
            })?;
        }
    }
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/media/compositor.rs"]
mod tests;
