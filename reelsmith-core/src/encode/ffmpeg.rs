use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{
    DIAGNOSTIC_TAIL_BYTES, DIAGNOSTIC_TAIL_LINES, ReelError, ReelResult, bounded_tail,
};
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkConfig {
    /// `ffmpeg` executable.
    pub binary: PathBuf,
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkConfig {
    /// Write to `out_path` with the `ffmpeg` found on `PATH`, overwriting.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns `ffmpeg` and streams raw frames to its stdin, producing a silent MP4.
///
/// Dropping the sink before a successful [`FrameSink::end`] kills the encoder and deletes the
/// partial output.
pub struct FfmpegSink {
    cfg_out: FfmpegSinkConfig,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(cfg_out: FfmpegSinkConfig) -> Self {
        Self {
            cfg_out,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Frames accepted since `begin`.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Arguments for the encoder process, excluding the program name.
pub(crate) fn encoder_args(cfg: &SinkConfig, out_path: &Path, overwrite: bool) -> Vec<String> {
    let mut args = vec![if overwrite { "-y" } else { "-n" }.to_string()];
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // For rawvideo input, `-r` before `-i` sets the input rate.
    args.push("-r".into());
    args.push(fps_arg(cfg.fps));
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-preset",
            "veryfast",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args.push(out_path.to_string_lossy().into_owned());
    args
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

impl FfmpegSink {
    fn spawn(&mut self, cfg: &SinkConfig) -> ReelResult<()> {
        let mut cmd = Command::new(&self.cfg_out.binary);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(encoder_args(cfg, &self.cfg_out.out_path, self.cfg_out.overwrite));

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::configuration(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::render("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::render("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.cfg_out.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "video encoder started"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    /// Kill a running encoder and remove whatever it wrote. No-op when nothing was spawned.
    pub fn abort(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        if let Err(e) = child.wait() {
            tracing::warn!(error = %e, "failed to reap ffmpeg");
        }
        if let Some(handle) = self.stderr_drain.take()
            && handle.join().is_err()
        {
            tracing::warn!("ffmpeg stderr drain thread panicked");
        }
        self.cfg = None;
        match std::fs::remove_file(&self.cfg_out.out_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                out = %self.cfg_out.out_path.display(),
                error = %e,
                "failed to remove partial video"
            ),
        }
        tracing::debug!(out = %self.cfg_out.out_path.display(), "video encoder aborted");
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

/// The encoder process starts with the first frame, so a sink that never receives one
/// leaves no process and no file behind.
impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::render("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::render("ffmpeg sink width/height must be non-zero"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::render(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.cfg_out.out_path)?;
        if !self.cfg_out.overwrite && self.cfg_out.out_path.exists() {
            return Err(ReelError::render(format!(
                "output file '{}' already exists",
                self.cfg_out.out_path.display()
            )));
        }

        self.abort();
        self.scratch = vec![0u8; (cfg.width * cfg.height * 4) as usize];
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ReelError::render("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::render(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::render(
                "frame.data size mismatch with width*height*4",
            ));
        }

        // ffmpeg has no premultiplied input format; flatten over black first.
        flatten_premul_to_opaque_rgba8(&mut self.scratch, &frame.data)?;

        if self.child.is_none() {
            self.spawn(&cfg)?;
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::render("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| ReelError::render(format!("failed to write frame to ffmpeg stdin: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        if self.cfg.is_none() {
            return Err(ReelError::render("ffmpeg sink not started"));
        }
        if self.frames_written == 0 {
            self.cfg = None;
            return Err(ReelError::render("video encoder received zero frames"));
        }

        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg sink is already finalized"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::render(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::render(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::render(format!(
                "ffmpeg exited with status {}: {}",
                status,
                bounded_tail(stderr.trim(), DIAGNOSTIC_TAIL_BYTES, DIAGNOSTIC_TAIL_LINES)
            )));
        }
        Ok(())
    }
}

fn flatten_premul_to_opaque_rgba8(dst: &mut [u8], src_premul: &[u8]) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "flatten_premul_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    // Premultiplied color over black is the color itself.
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        d[..3].copy_from_slice(&s[..3]);
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Locate an executable on `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Return `true` when `ffmpeg` can be found on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    find_on_path("ffmpeg").is_some()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
