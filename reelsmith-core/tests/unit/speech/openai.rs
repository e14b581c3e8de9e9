use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn client(server: &MockServer, key: Option<&str>) -> OpenAiSpeech {
    let mut cfg = SpeechConfig {
        base_url: server.uri(),
        ..SpeechConfig::default()
    };
    if let Some(k) = key {
        cfg = cfg.with_api_key(k);
    }
    OpenAiSpeech::new(cfg).unwrap()
}

#[tokio::test]
async fn posts_model_voice_and_format_and_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini-tts",
            "voice": "nova",
            "input": "Hola",
            "response_format": "mp3",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fake".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let speech = client(&server, Some("sk-test"));
    assert!(speech.is_configured());
    let bytes = speech
        .synthesize(&SpeechRequest::new("Hola", "nova"))
        .await
        .unwrap();
    assert_eq!(bytes, b"ID3fake");
}

#[tokio::test]
async fn missing_key_fails_without_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let speech = client(&server, None);
    assert!(!speech.is_configured());
    let err = speech
        .synthesize(&SpeechRequest::new("Hola", "nova"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "configuration");
}

#[tokio::test]
async fn provider_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .mount(&server)
        .await;

    let err = client(&server, Some("sk-test"))
        .synthesize(&SpeechRequest::new("Hola", "nova"))
        .await
        .unwrap_err();
    match err {
        ReelError::ExternalService { status, detail } => {
            assert_eq!(status, Some(429));
            assert_eq!(detail, "Rate limit reached");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_audio_is_an_external_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client(&server, Some("sk-test"))
        .synthesize(&SpeechRequest::new("Hola", "nova"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "external_service");
}

#[test]
fn provider_detail_falls_back_to_raw_body() {
    assert_eq!(provider_detail("upstream exploded"), "upstream exploded");
    assert_eq!(
        provider_detail(r#"{"error":{"message":"bad voice"}}"#),
        "bad voice"
    );
}
