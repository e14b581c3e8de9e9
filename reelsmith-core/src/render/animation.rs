//! Per-frame text animation state.

use crate::composition::model::TextAnimation;
use crate::foundation::core::FrameIndex;

/// Fade completes at this fraction of the clip.
pub const FADE_COMPLETE_AT: f32 = 1.0 / 1.2;
/// Slide starts this many pixels below the resting position.
pub const SLIDE_DISTANCE_PX: f32 = 80.0;
/// Zoom starting scale.
pub const ZOOM_FROM: f32 = 0.92;
/// Zoom scale increase over the clip.
pub const ZOOM_SPAN: f32 = 0.10;

/// Text transform and opacity for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Text opacity, 255 is fully opaque.
    pub alpha: u8,
    /// Vertical offset in pixels, positive moves down.
    pub offset_y: f32,
    /// Uniform scale about the text block center.
    pub scale: f32,
}

impl AnimationState {
    /// Fully visible text at rest.
    pub const REST: AnimationState = AnimationState {
        alpha: 255,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Hashable key for detecting frames that render identically.
    pub fn key(&self) -> (u8, i32, i32) {
        (
            self.alpha,
            (self.offset_y * 64.0).round() as i32,
            (self.scale * 4096.0).round() as i32,
        )
    }
}

/// Normalized position of `idx` in a clip of `total` frames, in `[0, 1]`.
///
/// A single-frame clip sits at the end of its animation.
pub fn progress(idx: FrameIndex, total: u64) -> f32 {
    if total <= 1 {
        return 1.0;
    }
    (idx.0.min(total - 1) as f64 / (total - 1) as f64) as f32
}

/// Animation state for `kind` at progress `p`.
pub fn animation_state(kind: TextAnimation, p: f32) -> AnimationState {
    let p = p.clamp(0.0, 1.0);
    match kind {
        TextAnimation::Fade => AnimationState {
            alpha: (255.0 * (p / FADE_COMPLETE_AT).min(1.0)).round().clamp(0.0, 255.0) as u8,
            ..AnimationState::REST
        },
        TextAnimation::Slide => AnimationState {
            offset_y: (1.0 - p) * SLIDE_DISTANCE_PX,
            ..AnimationState::REST
        },
        TextAnimation::Zoom => AnimationState {
            scale: ZOOM_FROM + ZOOM_SPAN * p,
            ..AnimationState::REST
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/animation.rs"]
mod tests;
