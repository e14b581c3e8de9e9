use std::path::PathBuf;

use axum::body::to_bytes;
use reelsmith::AudioPlan;
use uuid::Uuid;

use super::*;

fn asset(path: PathBuf) -> FinalAsset {
    FinalAsset {
        id: Uuid::new_v4(),
        path,
        audio: AudioPlan::VoiceOnly,
        duration_secs: Some(6.0),
        stages: Vec::new(),
        degraded: vec!["music: soft.mp3 missing".to_string()],
    }
}

#[tokio::test]
async fn url_delivery_links_into_files() {
    let config = ServerConfig {
        public_base_url: Some("https://reels.example".into()),
        ..ServerConfig::default()
    };
    let asset = asset(PathBuf::from("unused.mp4"));
    let resp = deliver(&config, &asset, Delivery::Url).await.unwrap();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["ok"], true);
    assert_eq!(json["has_audio"], true);
    assert_eq!(json["duration_secs"], 6.0);
    assert_eq!(
        json["url"],
        format!("https://reels.example/files/{}.mp4", asset.id)
    );
    assert_eq!(json["degraded"][0], "music: soft.mp3 missing");
}

#[tokio::test]
async fn download_delivery_streams_bytes_as_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final.mp4");
    std::fs::write(&path, b"mp4 bytes").unwrap();
    let asset = asset(path);

    let resp = deliver(&ServerConfig::default(), &asset, Delivery::Download)
        .await
        .unwrap();
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "video/mp4");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains(&asset.id.to_string()));
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"mp4 bytes");
    assert!(!asset.path.exists(), "downloaded reel left on disk");
}

#[tokio::test]
async fn url_delivery_keeps_the_file_for_its_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final.mp4");
    std::fs::write(&path, b"mp4 bytes").unwrap();
    let asset = asset(path);

    deliver(&ServerConfig::default(), &asset, Delivery::Url)
        .await
        .unwrap();
    assert!(asset.path.exists());
}

#[tokio::test]
async fn download_of_missing_file_is_an_error() {
    let asset = asset(PathBuf::from("/nonexistent/reel.mp4"));
    let err = deliver(&ServerConfig::default(), &asset, Delivery::Download)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "internal");
}

#[test]
fn delivery_defaults_to_url() {
    let q: DeliveryQuery = serde_json::from_str("{}").unwrap();
    assert_eq!(q.delivery, Delivery::Url);
}
