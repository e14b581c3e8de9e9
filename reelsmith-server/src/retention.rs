//! Background removal of finished reels once their links expire.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::Context as _;
use tokio::time::interval;

/// Upper bound on the time between two sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Deletes `.mp4` files in the output directory older than a time-to-live.
#[derive(Debug, Clone)]
pub struct AssetSweeper {
    dir: PathBuf,
    ttl: Duration,
}

impl AssetSweeper {
    /// Sweeper over `dir` keeping files for `ttl`.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Time between sweeps: half the TTL, between one second and five minutes.
    pub fn period(&self) -> Duration {
        (self.ttl / 2).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
    }

    /// Sweep forever. Spawn as a background task.
    pub async fn run(self) {
        tracing::info!(
            dir = %self.dir.display(),
            ttl_secs = self.ttl.as_secs(),
            "starting asset sweeper"
        );
        let mut ticker = interval(self.period());
        loop {
            ticker.tick().await;
            match self.sweep_once().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "expired reels removed"),
                Err(e) => tracing::warn!(error = %e, "asset sweep failed"),
            }
        }
    }

    /// Remove every expired reel once; returns how many files were deleted.
    pub async fn sweep_once(&self) -> anyhow::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| format!("list '{}'", self.dir.display()));
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp4") {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let age = now
                .duration_since(meta.modified()?)
                .unwrap_or(Duration::ZERO);
            if age < self.ttl {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                // Removed by a download in the meantime.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove reel");
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "../tests/unit/retention.rs"]
mod tests;
