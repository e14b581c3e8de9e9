use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::composition::model::VisualStyle;
use crate::foundation::error::ReelResult;

/// System directories searched after the configured font directory.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/noto",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/noto",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

const SERIF_BOLD: &[&str] = &[
    "DejaVuSerif-Bold.ttf",
    "LiberationSerif-Bold.ttf",
    "NotoSerif-Bold.ttf",
    "Georgia Bold.ttf",
    "georgiab.ttf",
];

const SANS_BOLD: &[&str] = &[
    "DejaVuSans-Bold.ttf",
    "LiberationSans-Bold.ttf",
    "NotoSans-Bold.ttf",
    "Arial Bold.ttf",
    "arialbd.ttf",
];

/// Faces with pictograph coverage, consulted per character after the caption face.
const EMOJI_FACES: &[&str] = &[
    "NotoEmoji-Regular.ttf",
    "NotoColorEmoji.ttf",
    "Symbola.ttf",
    "TwemojiMozilla.ttf",
    "OpenMoji-Regular.ttf",
    "seguiemj.ttf",
    "Apple Color Emoji.ttc",
];

const SANS_REGULAR: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "NotoSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];

/// DejaVu Sans, compiled in so a caption can always be drawn.
static BUILTIN_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Source path reported for the compiled-in face.
pub const BUILTIN_FONT_SOURCE: &str = "builtin:DejaVuSans.ttf";

/// Raw bytes of one font file plus where they came from.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// File the bytes were read from.
    pub source: PathBuf,
    /// Font file bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl FontFace {
    /// The compiled-in DejaVu Sans face.
    pub fn builtin() -> Self {
        Self {
            source: PathBuf::from(BUILTIN_FONT_SOURCE),
            bytes: Arc::new(BUILTIN_SANS.to_vec()),
        }
    }

    /// Whether these bytes are the compiled-in face.
    pub fn is_builtin(&self) -> bool {
        self.source.as_os_str() == BUILTIN_FONT_SOURCE
    }
}

/// Caption face for a style plus the faces used for characters it does not cover.
#[derive(Clone, Debug)]
pub struct FontAsset {
    /// File the caption face was read from.
    pub source: PathBuf,
    /// Caption face bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Fallback faces in lookup order; the compiled-in face is always last.
    pub fallbacks: Vec<FontFace>,
}

impl FontAsset {
    fn new(primary: FontFace, fallbacks: Vec<FontFace>) -> Self {
        Self {
            source: primary.source,
            bytes: primary.bytes,
            fallbacks,
        }
    }

    /// Whether the caption face itself is the compiled-in one.
    pub fn is_builtin(&self) -> bool {
        self.source.as_os_str() == BUILTIN_FONT_SOURCE
    }
}

/// Resolves a style's font from a configured directory and well-known system locations.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    dir: Option<PathBuf>,
    system: bool,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FontLibrary {
    /// Library that looks in `dir` first, then in system font directories.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir, system: true }
    }

    /// Library that only looks in `dir`, never in system font directories.
    pub fn isolated(dir: Option<PathBuf>) -> Self {
        Self { dir, system: false }
    }

    /// Preferred font file names for `style`, best first.
    pub fn candidates(style: VisualStyle) -> &'static [&'static str] {
        match style {
            VisualStyle::Inspirational => SERIF_BOLD,
            VisualStyle::Impactful => SANS_BOLD,
            VisualStyle::Minimal => SANS_REGULAR,
        }
    }

    /// Load the font for `style`.
    ///
    /// An unresolvable style font falls back to the default sans faces, then to any font file
    /// in the configured directory, then to the compiled-in face. Fallback faces for emoji and
    /// symbols are attached to the result.
    pub fn resolve(&self, style: VisualStyle) -> ReelResult<FontAsset> {
        let dirs = self.search_dirs();
        let fallbacks = self.fallback_faces(&dirs);
        let preferred = Self::candidates(style);

        for (rank, names) in [preferred, SANS_REGULAR, SANS_BOLD].into_iter().enumerate() {
            if let Some(path) = find_first(&dirs, names) {
                if rank > 0 {
                    tracing::warn!(?style, path = %path.display(), "style font missing, using fallback");
                }
                return Ok(FontAsset::new(load(&path)?, fallbacks));
            }
        }

        if let Some(dir) = self.dir.as_deref()
            && let Some(path) = any_font_in(dir)
        {
            tracing::warn!(?style, path = %path.display(), "using first font found in font dir");
            return Ok(FontAsset::new(load(&path)?, fallbacks));
        }

        tracing::warn!(
            ?style,
            searched = dirs.len(),
            "no font file found, using compiled-in DejaVu Sans"
        );
        Ok(FontAsset::new(FontFace::builtin(), fallbacks))
    }

    /// Emoji faces found on disk, unreadable ones skipped, then the compiled-in face.
    fn fallback_faces(&self, dirs: &[PathBuf]) -> Vec<FontFace> {
        let mut faces: Vec<FontFace> = EMOJI_FACES
            .iter()
            .filter_map(|name| find_first(dirs, std::slice::from_ref(name)))
            .filter_map(|path| match load(&path) {
                Ok(face) => Some(face),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping fallback face");
                    None
                }
            })
            .collect();
        if faces.is_empty() {
            tracing::debug!("no emoji face installed; pictographs limited to DejaVu coverage");
        }
        faces.push(FontFace::builtin());
        faces
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(SYSTEM_FONT_DIRS.len() + 2);
        if let Some(dir) = &self.dir {
            dirs.push(dir.clone());
            dirs.push(dir.join("fonts"));
        }
        if self.system {
            dirs.extend(SYSTEM_FONT_DIRS.iter().map(PathBuf::from));
        }
        dirs
    }
}

fn find_first(dirs: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .flat_map(|name| dirs.iter().map(move |d| d.join(name)))
        .find(|p| p.is_file())
}

fn any_font_in(dir: &Path) -> Option<PathBuf> {
    let rd = std::fs::read_dir(dir).ok()?;
    let mut found: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found.into_iter().next()
}

fn load(path: &Path) -> ReelResult<FontFace> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read font bytes from '{}'", path.display()))?;
    Ok(FontFace {
        source: path.to_path_buf(),
        bytes: Arc::new(bytes),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
