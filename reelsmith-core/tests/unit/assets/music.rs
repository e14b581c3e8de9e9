use super::*;

#[test]
fn none_has_no_track() {
    assert_eq!(MusicLibrary::file_name(MusicChoice::None), None);
    let lib = MusicLibrary::new("/tmp");
    assert_eq!(lib.resolve(MusicChoice::None), None);
}

#[test]
fn present_track_resolves() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cinematic.mp3"), b"id3").unwrap();

    let lib = MusicLibrary::new(dir.path());
    assert_eq!(
        lib.resolve(MusicChoice::Cinematic),
        Some(dir.path().join("cinematic.mp3"))
    );
}

#[test]
fn missing_track_degrades_to_none() {
    let dir = tempfile::tempdir().unwrap();
    let lib = MusicLibrary::new(dir.path());
    assert_eq!(lib.resolve(MusicChoice::Happy), None);
    assert_eq!(lib.dir(), dir.path());
}
