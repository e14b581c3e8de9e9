use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;

#[derive(Default)]
struct RecordingEngine {
    jobs: Mutex<Vec<MediaJob>>,
}

#[async_trait]
impl MediaEngine for RecordingEngine {
    async fn run(&self, job: &MediaJob, _timeout: Duration) -> ReelResult<()> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn probe_duration(&self, _path: &Path) -> ReelResult<f64> {
        Ok(0.0)
    }
}

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn ducking_graph_attenuates_and_compresses_music_under_voice() {
    let g = ducking_graph(Ducking::default());
    assert!(g.contains("[2:a]volume=0.25[bed]"));
    assert!(g.contains("sidechaincompress=threshold=0.03:ratio=10:attack=20:release=250"));
    assert!(g.contains("[bed][voice_key]sidechaincompress"));
    assert!(g.ends_with("amix=inputs=2:duration=longest:normalize=0:dropout_transition=0[aout]"));
    assert!(!g.contains(' '));
}

#[test]
fn voice_and_music_loops_music_and_maps_mixed_audio() {
    let job = plan_mux(
        &p("v.mp4"),
        Some(p("voice.wav").as_path()),
        Some(p("soft.mp3").as_path()),
        &p("out.mp4"),
        Ducking::default(),
    )
    .unwrap();
    assert_eq!(job.inputs.len(), 3);
    assert!(!job.inputs[1].loop_forever);
    assert!(job.inputs[2].loop_forever);
    assert_eq!(job.maps, vec!["0:v", "[aout]"]);
    assert!(job.output_args.contains(&"-shortest".to_string()));
    assert!(job.output_args.windows(2).any(|w| w == ["-c:v", "copy"]));
    assert!(job.output_args.windows(2).any(|w| w == ["-c:a", "aac"]));
}

#[test]
fn voice_only_maps_voice_directly() {
    let job = plan_mux(
        &p("v.mp4"),
        Some(p("voice.wav").as_path()),
        None,
        &p("out.mp4"),
        Ducking::default(),
    )
    .unwrap();
    assert_eq!(job.filter_complex, None);
    assert_eq!(job.maps, vec!["0:v", "1:a"]);
    assert!(job.inputs.iter().all(|i| !i.loop_forever));
}

#[test]
fn music_only_loops_music() {
    let job = plan_mux(
        &p("v.mp4"),
        None,
        Some(p("happy.mp3").as_path()),
        &p("out.mp4"),
        Ducking::default(),
    )
    .unwrap();
    assert_eq!(job.label, "mux_music");
    assert!(job.inputs[1].loop_forever);
    assert_eq!(job.maps, vec!["0:v", "1:a"]);
}

#[test]
fn neither_track_needs_no_job() {
    assert!(plan_mux(&p("v.mp4"), None, None, &p("o.mp4"), Ducking::default()).is_none());
    assert!(!AudioPlan::for_tracks(false, false).has_audio());
    assert!(AudioPlan::for_tracks(false, true).has_audio());
}

#[tokio::test]
async fn silent_mux_copies_bytes_without_engine() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("silent.mp4");
    let out = dir.path().join("final.mp4");
    std::fs::write(&video, b"fake mp4 bytes").unwrap();

    let engine = RecordingEngine::default();
    let plan = mux(&engine, &video, None, None, &out, Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(plan, AudioPlan::Silent);
    assert_eq!(std::fs::read(&out).unwrap(), b"fake mp4 bytes");
    assert!(engine.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn audio_mux_runs_one_engine_job() {
    let engine = RecordingEngine::default();
    let plan = mux(
        &engine,
        &p("v.mp4"),
        Some(p("voice.wav").as_path()),
        Some(p("soft.mp3").as_path()),
        &p("o.mp4"),
        Duration::from_secs(1),
    )
    .await
    .unwrap();
    assert_eq!(plan, AudioPlan::VoiceAndMusic);
    let jobs = engine.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].output, p("o.mp4"));
}
