use super::*;

#[test]
fn styles_map_to_distinct_candidate_lists() {
    assert_eq!(
        FontLibrary::candidates(VisualStyle::Inspirational)[0],
        "DejaVuSerif-Bold.ttf"
    );
    assert_eq!(
        FontLibrary::candidates(VisualStyle::Impactful)[0],
        "DejaVuSans-Bold.ttf"
    );
    assert_eq!(
        FontLibrary::candidates(VisualStyle::Minimal)[0],
        "DejaVuSans.ttf"
    );
}

#[test]
fn configured_dir_wins_over_system_locations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DejaVuSans-Bold.ttf");
    std::fs::write(&path, b"not really a font").unwrap();

    let lib = FontLibrary::new(Some(dir.path().to_path_buf()));
    let font = lib.resolve(VisualStyle::Impactful).unwrap();
    assert_eq!(font.source, path);
    assert_eq!(font.bytes.as_slice(), b"not really a font");
}

#[test]
fn fonts_subdirectory_is_searched() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("fonts")).unwrap();
    let path = dir.path().join("fonts").join("DejaVuSans.ttf");
    std::fs::write(&path, b"x").unwrap();

    let lib = FontLibrary::new(Some(dir.path().to_path_buf()));
    assert_eq!(lib.resolve(VisualStyle::Minimal).unwrap().source, path);
}

#[test]
fn any_font_in_picks_sorted_font_files_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();
    std::fs::write(dir.path().join("b.OTF"), b"x").unwrap();
    std::fs::write(dir.path().join("a.ttf"), b"x").unwrap();

    assert_eq!(any_font_in(dir.path()), Some(dir.path().join("a.ttf")));
}

#[test]
fn any_font_in_missing_dir_is_none() {
    assert_eq!(any_font_in(Path::new("/definitely/not/here")), None);
}

#[test]
fn empty_dir_without_system_fonts_resolves_builtin_face() {
    let dir = tempfile::tempdir().unwrap();
    let lib = FontLibrary::isolated(Some(dir.path().to_path_buf()));

    for style in [
        VisualStyle::Inspirational,
        VisualStyle::Impactful,
        VisualStyle::Minimal,
    ] {
        let font = lib.resolve(style).unwrap();
        assert!(font.is_builtin());
        assert_eq!(font.source, Path::new(BUILTIN_FONT_SOURCE));
        assert!(font.bytes.len() > 100_000);
        assert_eq!(&font.bytes[..4], &[0x00, 0x01, 0x00, 0x00]);
    }
}

#[test]
fn builtin_face_is_always_the_last_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let font = FontLibrary::isolated(Some(dir.path().to_path_buf()))
        .resolve(VisualStyle::Minimal)
        .unwrap();
    assert_eq!(font.fallbacks.len(), 1);
    assert!(font.fallbacks[0].is_builtin());
}

#[test]
fn emoji_face_in_font_dir_precedes_builtin_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let emoji = dir.path().join("NotoEmoji-Regular.ttf");
    std::fs::write(&emoji, b"emoji face").unwrap();
    std::fs::write(dir.path().join("DejaVuSans.ttf"), b"caption face").unwrap();

    let font = FontLibrary::isolated(Some(dir.path().to_path_buf()))
        .resolve(VisualStyle::Minimal)
        .unwrap();
    assert!(!font.is_builtin());
    assert_eq!(font.bytes.as_slice(), b"caption face");
    let sources: Vec<_> = font.fallbacks.iter().map(|f| f.source.clone()).collect();
    assert_eq!(sources, vec![emoji, PathBuf::from(BUILTIN_FONT_SOURCE)]);
}
