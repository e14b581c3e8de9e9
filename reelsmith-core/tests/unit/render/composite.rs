use super::*;

#[test]
fn opaque_source_replaces_destination() {
    let mut dst = vec![10u8, 20, 30, 255];
    over_in_place(&mut dst, &[200, 100, 50, 255], 1.0).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn transparent_source_is_noop() {
    let mut dst = vec![10u8, 20, 30, 255];
    over_in_place(&mut dst, &[0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn half_alpha_blends() {
    let mut dst = vec![0u8, 0, 0, 255];
    over_in_place(&mut dst, &[128, 128, 128, 128], 1.0).unwrap();
    assert_eq!(dst, vec![128, 128, 128, 255]);
}

#[test]
fn zero_opacity_skips() {
    let mut dst = vec![1u8, 2, 3, 255];
    over_in_place(&mut dst, &[255, 255, 255, 255], 0.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    let err = over_in_place(&mut dst, &[0u8; 4], 1.0).unwrap_err();
    assert_eq!(err.kind(), "render");
}
