use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::render("x").to_string().contains("render error:"));
    assert_eq!(
        ReelError::external(Some(401), "bad key").to_string(),
        "external service error (status 401): bad key"
    );
    assert_eq!(
        ReelError::external(None, "dns").to_string(),
        "external service error: dns"
    );
}

#[test]
fn kinds_are_stable() {
    assert_eq!(ReelError::configuration("x").kind(), "configuration");
    assert_eq!(ReelError::composition("mux", "").kind(), "composition");
    assert_eq!(
        ReelError::Timeout {
            stage: "speech",
            secs: 3
        }
        .kind(),
        "timeout"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "internal");
}

#[test]
fn composition_tail_is_bounded() {
    let stderr: String = (0..500).map(|i| format!("line {i}\n")).collect();
    let ReelError::Composition { stderr_tail, .. } = ReelError::composition("mux", &stderr) else {
        panic!("expected composition error");
    };
    assert!(stderr_tail.len() <= DIAGNOSTIC_TAIL_BYTES);
    assert_eq!(stderr_tail.lines().count(), DIAGNOSTIC_TAIL_LINES);
    assert!(stderr_tail.ends_with("line 499"));
}

#[test]
fn bounded_tail_cuts_on_char_boundary() {
    let text = "ñ".repeat(50);
    let tail = bounded_tail(&text, 7, 20);
    assert!(tail.len() <= 7);
    assert!(tail.chars().all(|c| c == 'ñ'));
}

#[test]
fn bounded_tail_keeps_short_text() {
    assert_eq!(bounded_tail("  one\ntwo  ", 100, 5), "one\ntwo");
}
