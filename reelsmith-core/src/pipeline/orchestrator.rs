//! Per-request sequencing of render, speech, music and compositing.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::watch;
use uuid::Uuid;

use crate::assets::fonts::FontLibrary;
use crate::assets::music::MusicLibrary;
use crate::composition::model::{MusicChoice, NarrationMode, ReelSpec};
use crate::config::{PipelineConfig, SpeechConfig};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::compositor::{AudioPlan, mux};
use crate::media::concat::assemble_voice_track;
use crate::media::engine::{FfmpegEngine, MediaEngine};
use crate::pipeline::scratch::{ScratchDir, move_file};
use crate::render::pipeline::{CancelFlag, render_silent_video};
use crate::speech::openai::OpenAiSpeech;
use crate::speech::synth::{SpeechRequest, SpeechRole, SpeechSynthesizer};
use crate::speech::voices::{character_line, voice_for};

/// How long a stopped render may take to finish its current chunk.
const RENDER_STOP_GRACE: Duration = Duration::from_secs(10);

/// Request lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Request accepted.
    Received,
    /// Rendering the silent video.
    Rendering,
    /// Synthesizing and assembling the voice track.
    Synthesizing,
    /// Looking up the background track.
    SelectingMusic,
    /// Muxing video and audio.
    Compositing,
    /// Final asset available.
    Done,
    /// Request failed; no asset produced.
    Failed,
}

impl Stage {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Rendering => "rendering",
            Self::Synthesizing => "synthesizing",
            Self::SelectingMusic => "selecting_music",
            Self::Compositing => "compositing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// Where the video stream of the final asset comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoSource {
    /// Render the caption locally.
    Render,
    /// Use an existing local video, e.g. a downloaded remote-provider result.
    File(PathBuf),
}

/// The only artifact handed back to the caller.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FinalAsset {
    /// Request identifier; also the output file stem.
    pub id: Uuid,
    /// Output file.
    pub path: PathBuf,
    /// Audio recipe used.
    pub audio: AudioPlan,
    /// Container duration reported by the probe, if it succeeded.
    pub duration_secs: Option<f64>,
    /// Stages visited, in order.
    pub stages: Vec<Stage>,
    /// Optional parts that were skipped, with the reason.
    pub degraded: Vec<String>,
}

impl FinalAsset {
    /// Whether the asset carries an audio stream.
    pub fn has_audio(&self) -> bool {
        self.audio.has_audio()
    }
}

struct StageTrace {
    request_id: Uuid,
    stages: Vec<Stage>,
}

impl StageTrace {
    fn new(request_id: Uuid) -> Self {
        Self {
            request_id,
            stages: Vec::new(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(request_id = %self.request_id, stage = stage.as_str(), "stage");
        self.stages.push(stage);
    }
}

/// Runs reels end to end. Cheap to share behind an `Arc`; holds no per-request state.
pub struct Pipeline {
    config: PipelineConfig,
    speech: Arc<dyn SpeechSynthesizer>,
    engine: Arc<dyn MediaEngine>,
    fonts: FontLibrary,
    music: MusicLibrary,
    ffmpeg: PathBuf,
}

impl Pipeline {
    /// Pipeline over injected speech and media capabilities.
    pub fn new(
        config: PipelineConfig,
        speech: Arc<dyn SpeechSynthesizer>,
        engine: Arc<dyn MediaEngine>,
    ) -> Self {
        Self {
            fonts: FontLibrary::new(config.font_dir.clone()),
            music: MusicLibrary::new(config.music_dir.clone()),
            config,
            speech,
            engine,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }

    /// Production wiring: OpenAI speech plus the `ffmpeg` found on `PATH`.
    pub fn from_configs(config: PipelineConfig, speech: SpeechConfig) -> ReelResult<Self> {
        let engine = FfmpegEngine::locate()?;
        let ffmpeg = engine.ffmpeg().to_path_buf();
        let speech = OpenAiSpeech::new(speech)?;
        Ok(Self::new(config, Arc::new(speech), Arc::new(engine)).with_ffmpeg(ffmpeg))
    }

    /// Use `path` as the frame encoder executable.
    pub fn with_ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = path.into();
        self
    }

    /// Shared settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether narration can be produced.
    pub fn speech_available(&self) -> bool {
        self.speech.is_configured()
    }

    /// Render `spec` locally and compose it with its voice and music.
    pub async fn run(
        &self,
        spec: &ReelSpec,
        cancel: Option<watch::Receiver<bool>>,
    ) -> ReelResult<FinalAsset> {
        self.run_with_video(spec, VideoSource::Render, cancel).await
    }

    /// Like [`Pipeline::run`], with an explicit video source.
    pub async fn run_with_video(
        &self,
        spec: &ReelSpec,
        source: VideoSource,
        cancel: Option<watch::Receiver<bool>>,
    ) -> ReelResult<FinalAsset> {
        let mut trace = StageTrace::new(Uuid::new_v4());
        trace.enter(Stage::Received);
        match self.execute(spec, source, cancel.as_ref(), &mut trace).await {
            Ok(asset) => Ok(asset),
            Err(e) => {
                tracing::warn!(
                    request_id = %trace.request_id,
                    kind = e.kind(),
                    error = %e,
                    "request failed"
                );
                trace.enter(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        spec: &ReelSpec,
        source: VideoSource,
        cancel: Option<&watch::Receiver<bool>>,
        trace: &mut StageTrace,
    ) -> ReelResult<FinalAsset> {
        if spec.narration.has_voice() && !self.speech.is_configured() {
            return Err(ReelError::configuration(
                "narration requested but no speech provider credentials are configured",
            ));
        }
        check_cancel(cancel, "rendering")?;

        let scratch = ScratchDir::create(&self.config.scratch_root)?;
        let timeout = self.config.call_timeout(spec.duration_secs);
        let mut degraded = Vec::new();

        if source == VideoSource::Render {
            trace.enter(Stage::Rendering);
        }
        if spec.narration.has_voice() {
            trace.enter(Stage::Synthesizing);
        }
        let (video, voice) = tokio::join!(
            self.produce_video(spec, source, &scratch, timeout, cancel),
            self.produce_voice(spec, &scratch, timeout),
        );
        let video = video?;
        let voice = match voice {
            Ok(v) => v,
            Err(e) if !spec.narration_required => {
                tracing::warn!(request_id = %trace.request_id, error = %e, "narration failed, continuing without voice");
                degraded.push(format!("narration: {e}"));
                None
            }
            Err(e) => return Err(e),
        };

        check_cancel(cancel, "selecting_music")?;
        let music = if spec.music == MusicChoice::None {
            None
        } else {
            trace.enter(Stage::SelectingMusic);
            let found = self.music.resolve(spec.music);
            if found.is_none() {
                degraded.push(format!("music: track for {:?} unavailable", spec.music));
            }
            found
        };

        check_cancel(cancel, "compositing")?;
        trace.enter(Stage::Compositing);
        let staged = scratch.file("final.mp4");
        let audio = mux(
            self.engine.as_ref(),
            &video,
            voice.as_deref(),
            music.as_deref(),
            &staged,
            timeout,
        )
        .await?;

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .with_context(|| {
                format!(
                    "create output dir '{}'",
                    self.config.output_dir.display()
                )
            })?;
        let path = self
            .config
            .output_dir
            .join(format!("{}.mp4", trace.request_id));
        move_file(&staged, &path).await?;

        let duration_secs = match self.engine.probe_duration(&path).await {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(request_id = %trace.request_id, error = %e, "duration probe failed");
                None
            }
        };

        trace.enter(Stage::Done);
        tracing::info!(
            request_id = %trace.request_id,
            path = %path.display(),
            ?audio,
            duration_secs,
            "reel ready"
        );
        Ok(FinalAsset {
            id: trace.request_id,
            path,
            audio,
            duration_secs,
            stages: trace.stages.clone(),
            degraded,
        })
    }

    async fn produce_video(
        &self,
        spec: &ReelSpec,
        source: VideoSource,
        scratch: &ScratchDir,
        timeout: Duration,
        cancel: Option<&watch::Receiver<bool>>,
    ) -> ReelResult<PathBuf> {
        let path = match source {
            VideoSource::File(path) => {
                if !path.is_file() {
                    return Err(ReelError::validation(format!(
                        "video source '{}' does not exist",
                        path.display()
                    )));
                }
                return Ok(path);
            }
            VideoSource::Render => scratch.file("silent.mp4"),
        };

        let spec = spec.clone();
        let fonts = self.fonts.clone();
        let threading = self.config.threading.clone();
        let ffmpeg = self.ffmpeg.clone();
        let out = path.clone();
        let stop = CancelFlag::new();
        // Dropping this future (client gone) must also stop the blocking render.
        let _stop_on_drop = StopOnDrop(stop.clone());
        let render_stop = stop.clone();
        let mut task = tokio::task::spawn_blocking(move || {
            let font = fonts.resolve(spec.style)?;
            render_silent_video(&spec, &font, &out, &threading, &ffmpeg, &render_stop)
        });

        let reason = tokio::select! {
            joined = &mut task => {
                let stats = joined
                    .map_err(|e| ReelError::render(format!("render task failed: {e}")))??;
                tracing::debug!(?stats, "silent video rendered");
                return Ok(path);
            }
            () = tokio::time::sleep(timeout) => ReelError::Timeout {
                stage: "rendering",
                secs: timeout.as_secs(),
            },
            () = cancelled(cancel) => ReelError::Cancelled("rendering"),
        };

        stop.cancel();
        // Wait for the current chunk so the encoder is gone before scratch is removed.
        match tokio::time::timeout(RENDER_STOP_GRACE, task).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "render task failed while stopping"),
            Err(_) => tracing::warn!(
                grace_secs = RENDER_STOP_GRACE.as_secs(),
                "render task still running after stop request"
            ),
        }
        Err(reason)
    }

    async fn produce_voice(
        &self,
        spec: &ReelSpec,
        scratch: &ScratchDir,
        timeout: Duration,
    ) -> ReelResult<Option<PathBuf>> {
        if !spec.narration.has_voice() {
            return Ok(None);
        }
        let ext = self.config.speech_format.as_str();

        let mut narrator_req = SpeechRequest::new(
            spec.text.clone(),
            voice_for(spec.language, spec.voice_gender, SpeechRole::Narrator),
        );
        narrator_req.format = self.config.speech_format;
        let narrator_path = scratch.file(&format!("narrator.{ext}"));

        let (narrator, character) = if spec.narration == NarrationMode::NarratorCharacter {
            let mut character_req = SpeechRequest::new(
                character_line(spec.language, &spec.text),
                voice_for(spec.language, spec.voice_gender, SpeechRole::Character),
            );
            character_req.format = self.config.speech_format;
            let character_path = scratch.file(&format!("character.{ext}"));
            let (n, c) = tokio::try_join!(
                self.synthesize_clip(&narrator_req, narrator_path, timeout),
                self.synthesize_clip(&character_req, character_path, timeout),
            )?;
            (n, Some(c))
        } else {
            (
                self.synthesize_clip(&narrator_req, narrator_path, timeout)
                    .await?,
                None,
            )
        };

        let voice = assemble_voice_track(
            self.engine.as_ref(),
            &narrator,
            character.as_deref(),
            &scratch.file("voice.wav"),
            timeout,
        )
        .await?;
        Ok(Some(voice))
    }

    async fn synthesize_clip(
        &self,
        request: &SpeechRequest,
        path: PathBuf,
        timeout: Duration,
    ) -> ReelResult<PathBuf> {
        let bytes = with_timeout("synthesizing", timeout, self.speech.synthesize(request)).await?;
        write_bytes(&path, &bytes).await?;
        Ok(path)
    }

    /// Speech-only pass-through: synthesize `request` and return the encoded audio.
    pub async fn speak(&self, request: &SpeechRequest) -> ReelResult<Vec<u8>> {
        if !self.speech.is_configured() {
            return Err(ReelError::configuration(
                "speech provider credentials are not configured",
            ));
        }
        request.validate()?;
        with_timeout(
            "synthesizing",
            self.config.timeout_base,
            self.speech.synthesize(request),
        )
        .await
    }
}

struct StopOnDrop(CancelFlag);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Resolves once `cancel` is raised; never resolves without a receiver or after its sender
/// is gone.
async fn cancelled(cancel: Option<&watch::Receiver<bool>>) {
    if let Some(rx) = cancel {
        let mut rx = rx.clone();
        let raised = rx.wait_for(|c| *c).await.is_ok();
        if raised {
            return;
        }
    }
    std::future::pending::<()>().await
}

fn check_cancel(cancel: Option<&watch::Receiver<bool>>, next: &'static str) -> ReelResult<()> {
    match cancel {
        Some(rx) if *rx.borrow() => Err(ReelError::Cancelled(next)),
        _ => Ok(()),
    }
}

async fn with_timeout<T>(
    stage: &'static str,
    limit: Duration,
    fut: impl Future<Output = ReelResult<T>>,
) -> ReelResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or(Err(ReelError::Timeout {
            stage,
            secs: limit.as_secs(),
        }))
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> ReelResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
