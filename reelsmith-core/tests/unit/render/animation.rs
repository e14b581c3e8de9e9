use super::*;

#[test]
fn progress_spans_first_to_last_frame() {
    assert_eq!(progress(FrameIndex(0), 144), 0.0);
    assert_eq!(progress(FrameIndex(143), 144), 1.0);
    assert!((progress(FrameIndex(72), 145) - 0.5).abs() < 1e-6);
}

#[test]
fn single_frame_clip_is_at_rest() {
    assert_eq!(progress(FrameIndex(0), 1), 1.0);
    assert_eq!(
        animation_state(TextAnimation::Fade, progress(FrameIndex(0), 1)),
        AnimationState::REST
    );
}

#[test]
fn fade_reaches_full_opacity_before_the_end() {
    assert_eq!(animation_state(TextAnimation::Fade, 0.0).alpha, 0);
    assert_eq!(animation_state(TextAnimation::Fade, FADE_COMPLETE_AT).alpha, 255);
    assert_eq!(animation_state(TextAnimation::Fade, 0.95).alpha, 255);
    let mid = animation_state(TextAnimation::Fade, 0.4).alpha;
    assert!(mid > 100 && mid < 140, "got {mid}");
}

#[test]
fn slide_settles_at_rest_position() {
    let s0 = animation_state(TextAnimation::Slide, 0.0);
    let s1 = animation_state(TextAnimation::Slide, 1.0);
    assert_eq!(s0.offset_y, SLIDE_DISTANCE_PX);
    assert_eq!(s1.offset_y, 0.0);
    assert_eq!(s0.alpha, 255);
}

#[test]
fn zoom_grows_monotonically() {
    let a = animation_state(TextAnimation::Zoom, 0.0).scale;
    let b = animation_state(TextAnimation::Zoom, 0.5).scale;
    let c = animation_state(TextAnimation::Zoom, 1.0).scale;
    assert!((a - 0.92).abs() < 1e-6);
    assert!(a < b && b < c);
    assert!((c - 1.02).abs() < 1e-6);
}

#[test]
fn equal_states_share_keys() {
    let a = animation_state(TextAnimation::Fade, 0.9);
    let b = animation_state(TextAnimation::Fade, 1.0);
    assert_eq!(a.key(), b.key());
    let c = animation_state(TextAnimation::Zoom, 0.1);
    let d = animation_state(TextAnimation::Zoom, 0.2);
    assert_ne!(c.key(), d.key());
}
