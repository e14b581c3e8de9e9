use std::path::{Path, PathBuf};

use crate::composition::model::MusicChoice;

/// Read-only directory of background tracks, one file per [`MusicChoice`].
///
/// Tracks are never written, so any number of requests may read them at once.
#[derive(Clone, Debug)]
pub struct MusicLibrary {
    dir: PathBuf,
}

impl MusicLibrary {
    /// Library rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name backing `choice`, or `None` for [`MusicChoice::None`].
    pub fn file_name(choice: MusicChoice) -> Option<&'static str> {
        match choice {
            MusicChoice::None => None,
            MusicChoice::Soft => Some("soft.mp3"),
            MusicChoice::Cinematic => Some("cinematic.mp3"),
            MusicChoice::Happy => Some("happy.mp3"),
        }
    }

    /// Path of the track for `choice` if it exists on disk.
    pub fn resolve(&self, choice: MusicChoice) -> Option<PathBuf> {
        let name = Self::file_name(choice)?;
        let path = self.dir.join(name);
        if path.is_file() {
            Some(path)
        } else {
            tracing::warn!(?choice, path = %path.display(), "music track missing");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/music.rs"]
mod tests;
