use super::*;
use crate::assets::fonts::{FontAsset, FontFace, FontLibrary};
use crate::composition::model::VisualStyle;

const HEART: &str = "\u{2764}";

fn white() -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    }
}

/// Glyph ids of the clusters covering `needle` in a single-line layout.
fn glyph_ids_for(layout: &parley::Layout<TextBrushRgba8>, text: &str, needle: &str) -> Vec<u32> {
    let start = text.find(needle).unwrap();
    let range = start..start + needle.len();
    let mut ids = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            for cluster in run.run().clusters() {
                let r = cluster.text_range();
                if r.start < range.end && range.start < r.end {
                    ids.extend(cluster.glyphs().map(|g| g.id));
                }
            }
        }
    }
    ids
}

/// The system serif bold face, which has no dingbat heart.
fn serif_without_heart() -> Option<FontAsset> {
    let font = FontLibrary::default()
        .resolve(VisualStyle::Inspirational)
        .ok()?;
    let name = font.source.file_name()?.to_str()?;
    (name == "DejaVuSerif-Bold.ttf").then_some(font)
}

#[test]
fn builtin_face_shapes_latin_and_heart() {
    let face = FontFace::builtin();
    let mut engine = TextLayoutEngine::new(&face.bytes, 48.0, white()).unwrap();
    assert_eq!(engine.family_name(), "DejaVu Sans");

    let text = format!("familia {HEART}");
    let layout = engine.layout_line(&text);
    assert!(layout.width() > 0.0);
    let ids = glyph_ids_for(&layout, &text, HEART);
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|&id| id != 0), "heart mapped to .notdef: {ids:?}");
}

#[test]
fn fallback_face_covers_characters_missing_from_caption_face() {
    let Some(serif) = serif_without_heart() else {
        eprintln!("skipping: DejaVu Serif Bold not installed");
        return;
    };
    let text = format!("familia {HEART}");

    let mut bare = TextLayoutEngine::new(&serif.bytes, 48.0, white()).unwrap();
    let tofu = glyph_ids_for(&bare.layout_line(&text), &text, HEART);
    assert!(tofu.contains(&0), "serif face unexpectedly covers the heart");

    let mut engine = TextLayoutEngine::new(&serif.bytes, 48.0, white()).unwrap();
    for face in &serif.fallbacks {
        engine.add_fallback(&face.bytes).unwrap();
    }
    assert_eq!(engine.families()[0], engine.family_name());
    assert!(engine.families().iter().any(|f| f == "DejaVu Sans"));

    let ids = glyph_ids_for(&engine.layout_line(&text), &text, HEART);
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|&id| id != 0), "heart still .notdef: {ids:?}");
}

#[test]
fn fallback_with_same_family_is_not_listed_twice() {
    let face = FontFace::builtin();
    let mut engine = TextLayoutEngine::new(&face.bytes, 32.0, white()).unwrap();
    engine.add_fallback(&face.bytes).unwrap();
    assert_eq!(engine.families(), ["DejaVu Sans".to_string()]);
}

#[test]
fn garbage_fallback_bytes_are_rejected() {
    let face = FontFace::builtin();
    let mut engine = TextLayoutEngine::new(&face.bytes, 32.0, white()).unwrap();
    assert!(engine.add_fallback(b"not a font").is_err());
    assert_eq!(engine.families().len(), 1);
}

#[test]
fn non_positive_size_is_rejected() {
    let face = FontFace::builtin();
    assert!(TextLayoutEngine::new(&face.bytes, 0.0, white()).is_err());
    assert!(TextLayoutEngine::new(&face.bytes, f32::NAN, white()).is_err());
}
