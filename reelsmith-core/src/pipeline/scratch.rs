use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;

/// Request-scoped scratch directory, removed with everything in it on drop.
#[derive(Debug)]
pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a uniquely named directory under `root`, creating `root` if needed.
    pub fn create(root: &Path) -> ReelResult<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("create scratch root '{}'", root.display()))?;
        let dir = tempfile::Builder::new()
            .prefix("reel-")
            .tempdir_in(root)
            .with_context(|| format!("create scratch dir in '{}'", root.display()))?;
        Ok(Self { dir })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a scratch file named `name`.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Move `from` to `to`, copying when a rename crosses filesystems.
pub async fn move_file(from: &Path, to: &Path) -> ReelResult<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to)
        .await
        .with_context(|| format!("move '{}' to '{}'", from.display(), to.display()))?;
    let _ = tokio::fs::remove_file(from).await;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scratch.rs"]
mod tests;
