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

#[test]
fn concat_keeps_narrator_first() {
    let job = plan_concat(
        Path::new("narrator.mp3"),
        Path::new("character.mp3"),
        Path::new("voice.wav"),
    );
    assert_eq!(job.inputs[0].path, Path::new("narrator.mp3"));
    assert_eq!(job.inputs[1].path, Path::new("character.mp3"));
    assert_eq!(
        job.filter_complex.as_deref(),
        Some("[0:a][1:a]concat=n=2:v=0:a=1[voice]")
    );
    assert_eq!(job.maps, vec!["[voice]"]);
}

#[tokio::test]
async fn narrator_only_is_passed_through() {
    let engine = RecordingEngine::default();
    let out = assemble_voice_track(
        &engine,
        Path::new("narrator.mp3"),
        None,
        Path::new("voice.wav"),
        Duration::from_secs(1),
    )
    .await
    .unwrap();
    assert_eq!(out, PathBuf::from("narrator.mp3"));
    assert!(engine.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn two_clips_are_concatenated_once() {
    let engine = RecordingEngine::default();
    let out = assemble_voice_track(
        &engine,
        Path::new("narrator.mp3"),
        Some(Path::new("character.mp3")),
        Path::new("voice.wav"),
        Duration::from_secs(1),
    )
    .await
    .unwrap();
    assert_eq!(out, PathBuf::from("voice.wav"));
    assert_eq!(engine.jobs.lock().unwrap().len(), 1);
}
