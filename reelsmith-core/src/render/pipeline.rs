use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::assets::fonts::FontAsset;
use crate::composition::model::ReelSpec;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkConfig};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::{FrameRGBA, FrameRenderer};

#[derive(Clone, Debug)]
/// Threading and chunking controls for multi-frame rendering.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 48,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused because their animation state repeated an earlier one in the chunk.
    pub frames_elided: u64,
}

/// Stop request shared between a render loop and whoever started it.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Flag that is not yet raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render loop to stop before its next chunk.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`CancelFlag::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Render every frame of `renderer` and push them to `sink` in strictly increasing order.
///
/// `cancel` is checked before each chunk. A cancelled or failed render returns without calling
/// [`FrameSink::end`]; the sink is responsible for discarding partial output when dropped.
pub fn render_to_sink(
    renderer: &FrameRenderer,
    fps: Fps,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
    cancel: &CancelFlag,
) -> ReelResult<RenderStats> {
    let total = renderer.total_frames();
    let canvas = renderer.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
    })?;

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let mut stats = RenderStats::default();
    let mut chunk_start = 0u64;
    while chunk_start < total {
        if cancel.is_cancelled() {
            tracing::debug!(frames_done = chunk_start, total, "render cancelled");
            return Err(ReelError::Cancelled("rendering"));
        }
        let chunk_end = (chunk_start + chunk_size).min(total);
        let (frames, frame_to_unique) = render_chunk(renderer, chunk_start..chunk_end, pool.as_ref())?;

        for (offset, &u) in frame_to_unique.iter().enumerate() {
            let frame = frames.get(u).ok_or_else(|| {
                ReelError::render("internal error: unique frame index out of range")
            })?;
            sink.push_frame(FrameIndex(chunk_start + offset as u64), frame)?;
        }

        let n = chunk_end - chunk_start;
        stats.frames_total += n;
        stats.frames_rendered += frames.len() as u64;
        stats.frames_elided += n - frames.len() as u64;
        chunk_start = chunk_end;
    }

    sink.end()?;
    tracing::debug!(?stats, "frames rendered");
    Ok(stats)
}

/// Render one chunk. Frames with equal animation state are rasterized once.
fn render_chunk(
    renderer: &FrameRenderer,
    range: std::ops::Range<u64>,
    pool: Option<&rayon::ThreadPool>,
) -> ReelResult<(Vec<FrameRGBA>, Vec<usize>)> {
    let mut unique_states = Vec::new();
    let mut slot_by_key = HashMap::new();
    let mut frame_to_unique = Vec::with_capacity((range.end - range.start) as usize);
    for i in range {
        let state = renderer.state_at(FrameIndex(i));
        let slot = *slot_by_key.entry(state.key()).or_insert_with(|| {
            unique_states.push(state);
            unique_states.len() - 1
        });
        frame_to_unique.push(slot);
    }

    let rendered: Vec<ReelResult<FrameRGBA>> = match pool {
        Some(pool) => pool.install(|| {
            unique_states
                .par_iter()
                .map(|s| renderer.render_state(*s))
                .collect()
        }),
        None => unique_states
            .iter()
            .map(|s| renderer.render_state(*s))
            .collect(),
    };
    let frames = rendered.into_iter().collect::<ReelResult<Vec<_>>>()?;
    Ok((frames, frame_to_unique))
}

/// Render `spec` into a silent H.264 MP4 at `out_path` using the `ffmpeg` executable.
///
/// Blocking; call from a blocking-capable thread.
pub fn render_silent_video(
    spec: &ReelSpec,
    font: &FontAsset,
    out_path: &Path,
    threading: &RenderThreading,
    ffmpeg: &Path,
    cancel: &CancelFlag,
) -> ReelResult<RenderStats> {
    let renderer = FrameRenderer::new(spec, font)?;
    let mut sink = FfmpegSink::new(FfmpegSinkConfig {
        binary: ffmpeg.to_path_buf(),
        out_path: out_path.to_path_buf(),
        overwrite: true,
    });
    render_to_sink(&renderer, spec.fps, &mut sink, threading, cancel)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::configuration(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
