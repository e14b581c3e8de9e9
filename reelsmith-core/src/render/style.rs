//! Typography and palette for each visual style and background.

use crate::composition::model::{AspectMode, BackgroundKind, VisualStyle};
use crate::foundation::core::{Canvas, Rgba8};

/// Fraction of the canvas width available to a caption line.
pub const TEXT_WIDTH_RATIO: f32 = 0.84;
/// Landscape canvases are shorter, so text shrinks by this factor.
pub const LANDSCAPE_SCALE: f32 = 0.8;
/// Line pitch as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.25;

/// Drop shadow offset in pixels, applied on both axes.
pub const SHADOW_OFFSET_PX: f64 = 3.0;
/// Drop shadow opacity relative to the text opacity.
pub const SHADOW_OPACITY: f32 = 0.65;

/// Resolved typography for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Distance between consecutive baselines.
    pub line_pitch_px: f32,
    /// Widest allowed line.
    pub max_width_px: f32,
    /// Foreground glyph color.
    pub color: Rgba8,
}

impl TextStyle {
    /// Typography for `style` on `background` at `aspect`.
    pub fn resolve(style: VisualStyle, background: BackgroundKind, aspect: AspectMode) -> Self {
        let base = match style {
            VisualStyle::Inspirational => 64.0,
            VisualStyle::Impactful => 76.0,
            VisualStyle::Minimal => 54.0,
        };
        let size_px = match aspect {
            AspectMode::Portrait => base,
            AspectMode::Landscape => base * LANDSCAPE_SCALE,
        };
        let canvas = aspect.canvas();
        Self {
            size_px,
            line_pitch_px: size_px * LINE_SPACING,
            max_width_px: canvas.width as f32 * TEXT_WIDTH_RATIO,
            color: text_color(background),
        }
    }
}

/// Glyph color readable on `background`.
pub fn text_color(background: BackgroundKind) -> Rgba8 {
    match background {
        BackgroundKind::Gradient | BackgroundKind::Dark => Rgba8::hex(0xffffff),
        BackgroundKind::Light => Rgba8::hex(0x1b1b1f),
    }
}

/// Gradient endpoints, top then bottom.
pub const GRADIENT_TOP: Rgba8 = Rgba8::hex(0x2b1055);
/// Bottom gradient color.
pub const GRADIENT_BOTTOM: Rgba8 = Rgba8::hex(0xd16ba5);
/// Flat dark background.
pub const DARK: Rgba8 = Rgba8::hex(0x111318);
/// Flat light background.
pub const LIGHT: Rgba8 = Rgba8::hex(0xf4f1ea);

/// Radial highlight placed near the top of gradient backgrounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    /// Center x in pixels.
    pub cx: f32,
    /// Center y in pixels.
    pub cy: f32,
    /// Falloff radius in pixels.
    pub radius: f32,
    /// White blend factor at the center.
    pub peak: f32,
}

impl Highlight {
    /// Highlight geometry for `canvas`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        let w = canvas.width as f32;
        let h = canvas.height as f32;
        Self {
            cx: w / 2.0,
            cy: h * 0.18,
            radius: w * 0.55,
            peak: 0.22,
        }
    }

    /// Blend factor toward white at `(x, y)`; quadratic falloff to zero at the radius.
    pub fn strength_at(&self, x: f32, y: f32) -> f32 {
        let d = ((x - self.cx).powi(2) + (y - self.cy).powi(2)).sqrt();
        if d >= self.radius {
            return 0.0;
        }
        let k = 1.0 - d / self.radius;
        self.peak * k * k
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
