//! Reelsmith turns a short piece of text into a vertical, narrated social-media reel.
//!
//! The crate owns the whole synthesis path: a validated [`ReelSpec`] is rendered frame by
//! frame on the CPU, piped to the system `ffmpeg` binary as a silent MP4, and then muxed
//! with synthesized narration and an optional music bed.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: `RenderRequest -> ReelSpec` (defaults applied, limits enforced)
//! 2. **Render**: `ReelSpec -> FrameRGBA*` (background, wrapped caption, animation state)
//! 3. **Encode**: frames stream into [`FfmpegSink`] to produce a silent H.264 video
//! 4. **Speak**: narrator (and optional character) lines go through a [`SpeechSynthesizer`]
//! 5. **Compose**: [`mux`] joins video, voice and a ducked music bed via a [`MediaEngine`]
//!
//! [`Pipeline`] drives the five stages with per-request scratch space, time budgets and
//! cancellation. Rendering and voice synthesis run concurrently.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic frames**: the same spec and font always rasterize to the same pixels.
//! - **No IO in renderers**: fonts are loaded once before the frame loop starts.
//! - **Premultiplied RGBA8** inside the renderer, flattened to opaque RGBA at the encoder.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod composition;
mod encode;
mod foundation;
mod layout;
mod media;
mod pipeline;
mod remote;
mod render;
mod speech;

pub mod config;

pub use assets::fonts::{BUILTIN_FONT_SOURCE, FontAsset, FontFace, FontLibrary};
pub use assets::music::MusicLibrary;
pub use assets::text::{ShapedLine, TextBrushRgba8, TextLayoutEngine};
pub use composition::model::{
    AspectMode, BackgroundKind, EmojiMode, Language, MAX_DURATION_SECS, MAX_TEXT_CHARS,
    MIN_DURATION_SECS, MusicChoice, NarrationMode, ReelSpec, RenderRequest, TextAnimation,
    VisualStyle, VoiceGender,
};
pub use config::{PipelineConfig, SpeechConfig};
pub use encode::ffmpeg::{
    FfmpegSink, FfmpegSinkConfig, ensure_parent_dir, find_on_path, is_ffmpeg_on_path,
};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use foundation::error::{
    DIAGNOSTIC_TAIL_BYTES, DIAGNOSTIC_TAIL_LINES, ReelError, ReelResult, bounded_tail,
};
pub use layout::emoji::{
    EMOJI_CATEGORIES, EmojiCategory, MAX_APPENDED_EMOJI, augment_with_emoji, matching_categories,
};
pub use layout::wrap::{FixedAdvance, MAX_LINES, TextMeasure, wrap_lines};
pub use media::compositor::{AudioPlan, Ducking, MUSIC_BED_VOLUME, ducking_graph, mux, plan_mux};
pub use media::concat::{assemble_voice_track, plan_concat};
pub use media::engine::{FfmpegEngine, MediaEngine, MediaInput, MediaJob};
pub use pipeline::orchestrator::{FinalAsset, Pipeline, Stage, VideoSource};
pub use pipeline::scratch::{ScratchDir, move_file};
pub use remote::jobs::{InMemoryJobStore, JobState, JobStatus, JobStore};
pub use remote::result_url::{ResultUrlStrategy, extract_result_url};
pub use render::animation::{AnimationState, animation_state, progress};
pub use render::background::paint_background;
pub use render::composite::over_in_place;
pub use render::frame::{FrameRGBA, FrameRenderer, PreparedCaption};
pub use render::pipeline::{
    CancelFlag, RenderStats, RenderThreading, render_silent_video, render_to_sink,
};
pub use render::style::{TextStyle, text_color};
pub use speech::openai::OpenAiSpeech;
pub use speech::synth::{
    AudioFormat, MAX_INPUT_CHARS, SpeechRequest, SpeechRole, SpeechSynthesizer, truncate_input,
};
pub use speech::voices::{character_line, voice_for};
