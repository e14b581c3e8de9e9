//! External media tool invocation.
//!
//! Jobs are described as data ([`MediaJob`]) and executed by a [`MediaEngine`]; the production
//! engine shells out to `ffmpeg`/`ffprobe`, tests substitute recorders.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::foundation::error::{ReelError, ReelResult};

/// One input file of a [`MediaJob`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaInput {
    /// Input file.
    pub path: PathBuf,
    /// Repeat the input indefinitely (`-stream_loop -1`).
    pub loop_forever: bool,
}

impl MediaInput {
    /// Plain input read once.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loop_forever: false,
        }
    }

    /// Input looped until the output ends.
    pub fn looped(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loop_forever: true,
        }
    }
}

/// A single external media invocation: inputs, optional filter graph, stream maps, output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaJob {
    /// Short name used in logs and error messages.
    pub label: &'static str,
    /// Inputs in index order (`0:`, `1:`, ...).
    pub inputs: Vec<MediaInput>,
    /// `-filter_complex` graph, if any.
    pub filter_complex: Option<String>,
    /// `-map` selectors in order.
    pub maps: Vec<String>,
    /// Codec and container flags placed before the output path.
    pub output_args: Vec<String>,
    /// Output file.
    pub output: PathBuf,
}

impl MediaJob {
    /// Full `ffmpeg` argument list, excluding the program name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-hide_banner", "-loglevel", "error"]
            .map(String::from)
            .to_vec();
        for input in &self.inputs {
            if input.loop_forever {
                args.push("-stream_loop".into());
                args.push("-1".into());
            }
            args.push("-i".into());
            args.push(input.path.to_string_lossy().into_owned());
        }
        if let Some(graph) = &self.filter_complex {
            args.push("-filter_complex".into());
            args.push(graph.clone());
        }
        for map in &self.maps {
            args.push("-map".into());
            args.push(map.clone());
        }
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// Executes media jobs and inspects media files.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Run `job`, failing with [`ReelError::Timeout`] if it exceeds `timeout`.
    async fn run(&self, job: &MediaJob, timeout: Duration) -> ReelResult<()>;

    /// Container duration of `path` in seconds.
    async fn probe_duration(&self, path: &Path) -> ReelResult<f64>;
}

/// [`MediaEngine`] backed by the system `ffmpeg` and `ffprobe`.
#[derive(Clone, Debug)]
pub struct FfmpegEngine {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegEngine {
    /// Engine using explicit executables.
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Engine using the `ffmpeg` and `ffprobe` found on `PATH`.
    pub fn locate() -> ReelResult<Self> {
        let ffmpeg = which::which("ffmpeg")
            .map_err(|_| ReelError::configuration("ffmpeg not found on PATH"))?;
        let ffprobe = which::which("ffprobe")
            .map_err(|_| ReelError::configuration("ffprobe not found on PATH"))?;
        Ok(Self::new(ffmpeg, ffprobe))
    }

    /// `ffmpeg` executable.
    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn run(&self, job: &MediaJob, timeout: Duration) -> ReelResult<()> {
        let args = job.to_args();
        tracing::debug!(job = job.label, "running ffmpeg {}", args.join(" "));

        let child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ReelError::configuration(format!("failed to spawn ffmpeg: {e}")))?;

        // Dropping the child on timeout kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(|e| {
                ReelError::composition(format!("{}: failed to wait for ffmpeg", job.label), &e.to_string())
            })?,
            Err(_) => {
                tracing::warn!(job = job.label, secs = timeout.as_secs(), "ffmpeg timed out, killed");
                return Err(ReelError::Timeout {
                    stage: job.label,
                    secs: timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::composition(
                format!("{} exited with {}", job.label, output.status),
                &stderr,
            ));
        }
        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> ReelResult<f64> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ReelError::configuration(format!("failed to spawn ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(ReelError::composition(
                format!("ffprobe failed on '{}'", path.display()),
                &String::from_utf8_lossy(&output.stderr),
            ));
        }
        parse_probe_duration(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

pub(crate) fn parse_probe_duration(stdout: &[u8]) -> ReelResult<f64> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ReelError::composition("ffprobe output is not valid JSON", &e.to_string()))?;
    probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ReelError::composition("ffprobe reported no duration", ""))
}

#[cfg(test)]
#[path = "../../tests/unit/media/engine.rs"]
mod tests;
