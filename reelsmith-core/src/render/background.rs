use crate::composition::model::BackgroundKind;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::math::lerp_u8;
use crate::render::style::{DARK, GRADIENT_BOTTOM, GRADIENT_TOP, Highlight, LIGHT};

/// Paint the opaque background for `kind` as tightly packed RGBA8.
///
/// Output is opaque, so premultiplied and straight alpha coincide.
pub fn paint_background(kind: BackgroundKind, canvas: Canvas) -> Vec<u8> {
    match kind {
        BackgroundKind::Dark => solid(canvas, DARK),
        BackgroundKind::Light => solid(canvas, LIGHT),
        BackgroundKind::Gradient => gradient(canvas),
    }
}

fn solid(canvas: Canvas, c: Rgba8) -> Vec<u8> {
    let mut out = vec![0u8; canvas.rgba_len()];
    for px in out.chunks_exact_mut(4) {
        px.copy_from_slice(&[c.r, c.g, c.b, 255]);
    }
    out
}

fn gradient(canvas: Canvas) -> Vec<u8> {
    let w = canvas.width as usize;
    let h = canvas.height as usize;
    let mut out = vec![0u8; canvas.rgba_len()];
    let hl = Highlight::for_canvas(canvas);
    let denom = (h.saturating_sub(1)).max(1) as f32;

    for (y, row) in out.chunks_exact_mut(w * 4).enumerate() {
        let t = y as f32 / denom;
        let base = [
            lerp_u8(GRADIENT_TOP.r, GRADIENT_BOTTOM.r, t),
            lerp_u8(GRADIENT_TOP.g, GRADIENT_BOTTOM.g, t),
            lerp_u8(GRADIENT_TOP.b, GRADIENT_BOTTOM.b, t),
        ];
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let s = hl.strength_at(x as f32 + 0.5, y as f32 + 0.5);
            for c in 0..3 {
                px[c] = lerp_u8(base[c], 255, s);
            }
            px[3] = 255;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
