use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::REELS,
    }
}

#[test]
fn encoder_args_describe_raw_rgba_input_and_silent_h264_output() {
    let args = encoder_args(&cfg(720, 1280), Path::new("/tmp/out.mp4"), true);
    let joined = args.join(" ");
    assert!(joined.starts_with("-y -loglevel error -f rawvideo -pix_fmt rgba -s 720x1280"));
    assert!(joined.contains("-r 24/1 -i pipe:0"));
    assert!(joined.contains("-an -c:v libx264"));
    assert!(joined.contains("-pix_fmt yuv420p"));
    assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
}

#[test]
fn no_overwrite_uses_dash_n() {
    let args = encoder_args(&cfg(2, 2), Path::new("o.mp4"), false);
    assert_eq!(args[0], "-n");
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkConfig::new("/tmp/never-written.mp4"));
    let err = sink.begin(cfg(721, 1280)).unwrap_err();
    assert_eq!(err.kind(), "render");
}

#[test]
fn push_and_end_before_begin_fail() {
    let mut sink = FfmpegSink::new(FfmpegSinkConfig::new("/tmp/never-written.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
    assert_eq!(sink.frames_written(), 0);
}

#[test]
fn flatten_sets_alpha_and_keeps_premultiplied_color() {
    let src = vec![10u8, 20, 30, 40, 1, 2, 3, 255];
    let mut dst = vec![0u8; 8];
    flatten_premul_to_opaque_rgba8(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 1, 2, 3, 255]);
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a").join("b").is_dir());
}

fn frame(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![255; (width * height * 4) as usize],
        premultiplied: true,
    }
}

#[test]
fn zero_frames_fail_without_starting_the_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkConfig {
        binary: dir.path().join("no-such-encoder"),
        out_path: out.clone(),
        overwrite: true,
    });
    sink.begin(cfg(2, 2)).unwrap();
    let err = sink.end().unwrap_err();
    assert_eq!(err.kind(), "render");
    assert!(err.to_string().contains("zero frames"));
    assert!(!out.exists());
}

#[test]
fn missing_encoder_surfaces_on_first_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkConfig {
        binary: dir.path().join("no-such-encoder"),
        out_path: dir.path().join("out.mp4"),
        overwrite: true,
    });
    sink.begin(cfg(2, 2)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap_err();
    assert_eq!(err.kind(), "configuration");
    assert_eq!(sink.frames_written(), 0);
}

/// Encoder stand-in that creates its output file, then stalls without reading stdin.
#[cfg(unix)]
fn stalling_encoder(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;
    let script = dir.join("stalling-ffmpeg");
    std::fs::write(
        &script,
        "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\nexec sleep 30\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn dropping_an_unfinished_sink_kills_the_encoder_and_removes_output() {
    use std::time::{Duration, Instant};

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("partial.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkConfig {
        binary: stalling_encoder(dir.path()),
        out_path: out.clone(),
        overwrite: true,
    });
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !out.exists() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(out.exists(), "encoder never started");

    let started = Instant::now();
    drop(sink);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!out.exists());
}

#[cfg(unix)]
#[test]
fn abort_before_any_frame_leaves_existing_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("keep.mp4");
    std::fs::write(&out, b"previous").unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkConfig {
        binary: stalling_encoder(dir.path()),
        out_path: out.clone(),
        overwrite: true,
    });
    sink.begin(cfg(2, 2)).unwrap();
    sink.abort();
    drop(sink);
    assert_eq!(std::fs::read(&out).unwrap(), b"previous");
}
