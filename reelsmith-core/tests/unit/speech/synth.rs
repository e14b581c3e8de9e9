use super::*;

#[test]
fn truncation_respects_char_boundaries() {
    let long: String = "ñ".repeat(MAX_INPUT_CHARS + 10);
    let cut = truncate_input(&long);
    assert_eq!(cut.chars().count(), MAX_INPUT_CHARS);
    assert_eq!(truncate_input("hola"), "hola");
}

#[test]
fn speed_bounds_are_inclusive() {
    let mut req = SpeechRequest::new("hola", "nova");
    req.speed = 0.25;
    assert!(req.validate().is_ok());
    req.speed = 4.0;
    assert!(req.validate().is_ok());
    req.speed = 4.01;
    assert_eq!(req.validate().unwrap_err().kind(), "validation");
}

#[test]
fn blank_text_or_voice_is_rejected() {
    assert!(SpeechRequest::new("  ", "nova").validate().is_err());
    assert!(SpeechRequest::new("hola", "").validate().is_err());
}

#[test]
fn request_json_defaults() {
    let req: SpeechRequest = serde_json::from_str(r#"{"text":"hi","voice":"ash"}"#).unwrap();
    assert_eq!(req.speed, 1.0);
    assert_eq!(req.format, AudioFormat::Mp3);
    assert_eq!(req.instructions, None);

    let req: SpeechRequest =
        serde_json::from_str(r#"{"text":"hi","voice":"ash","format":"flac"}"#).unwrap();
    assert_eq!(req.format.content_type(), "audio/flac");
}
