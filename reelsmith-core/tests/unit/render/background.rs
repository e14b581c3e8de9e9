use super::*;

const SMALL: Canvas = Canvas {
    width: 40,
    height: 80,
};

fn px(buf: &[u8], canvas: Canvas, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * canvas.width + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn solid_backgrounds_fill_every_pixel() {
    let buf = paint_background(BackgroundKind::Dark, SMALL);
    assert_eq!(buf.len(), SMALL.rgba_len());
    assert!(buf.chunks_exact(4).all(|p| p == [0x11, 0x13, 0x18, 255]));

    let buf = paint_background(BackgroundKind::Light, SMALL);
    assert!(buf.chunks_exact(4).all(|p| p == [0xf4, 0xf1, 0xea, 255]));
}

#[test]
fn gradient_is_opaque_and_runs_top_to_bottom() {
    let buf = paint_background(BackgroundKind::Gradient, SMALL);
    assert!(buf.chunks_exact(4).all(|p| p[3] == 255));

    // Bottom corners are outside the highlight and land on the bottom stop.
    assert_eq!(px(&buf, SMALL, 0, 79), [0xd1, 0x6b, 0xa5, 255]);
    // The top edge is brighter than the raw top stop only near the highlight.
    let corner = px(&buf, SMALL, 0, 0);
    let center = px(&buf, SMALL, 20, 14);
    assert!(center[0] > corner[0]);
}

#[test]
fn gradient_is_deterministic() {
    let a = paint_background(BackgroundKind::Gradient, SMALL);
    let b = paint_background(BackgroundKind::Gradient, SMALL);
    assert_eq!(a, b);
}
