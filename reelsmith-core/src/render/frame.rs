use std::sync::Arc;

use vello_cpu::kurbo::Affine;

use crate::assets::fonts::FontAsset;
use crate::assets::text::{ShapedLine, TextLayoutEngine};
use crate::composition::model::{ReelSpec, TextAnimation};
use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::wrap::wrap_lines;
use crate::render::animation::{AnimationState, animation_state, progress};
use crate::render::background::paint_background;
use crate::render::composite::over_in_place;
use crate::render::style::{SHADOW_OFFSET_PX, SHADOW_OPACITY, TextStyle};

#[derive(Clone, Debug)]
/// Rendered frame pixels in RGBA8 format.
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Caption wrapped, shaped and ready to draw on every frame.
pub struct PreparedCaption {
    lines: Vec<ShapedLine>,
    style: TextStyle,
}

impl PreparedCaption {
    /// Wrap and shape `spec.caption` with `font`, falling back per character to its fallbacks.
    pub fn prepare(spec: &ReelSpec, font: &FontAsset) -> ReelResult<Self> {
        let style = TextStyle::resolve(spec.style, spec.background, spec.aspect);
        let mut engine = TextLayoutEngine::new(&font.bytes, style.size_px, style.color.into())?;
        for face in &font.fallbacks {
            if let Err(e) = engine.add_fallback(&face.bytes) {
                tracing::warn!(source = %face.source.display(), error = %e, "fallback face rejected");
            }
        }
        let wrapped = wrap_lines(&spec.caption, style.max_width_px, &mut engine);
        if wrapped.is_empty() {
            return Err(ReelError::render("caption produced no drawable lines"));
        }
        let lines = engine.shape_lines(&wrapped);
        let missing = lines.iter().map(ShapedLine::missing_glyphs).sum::<usize>();
        if missing > 0 {
            tracing::warn!(missing, "caption has characters no registered face covers; leaving them blank");
        }
        tracing::debug!(
            family = engine.family_name(),
            fallbacks = engine.families().len() - 1,
            lines = lines.len(),
            size_px = style.size_px,
            "caption shaped"
        );
        Ok(Self { lines, style })
    }

    /// Wrapped line texts, top to bottom.
    pub fn line_texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Resolved typography.
    pub fn style(&self) -> TextStyle {
        self.style
    }

    fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.style.line_pitch_px
    }
}

/// Draws one reel frame: background, then the animated caption with its drop shadow.
///
/// Shared across rayon workers; every call builds its own raster context.
pub struct FrameRenderer {
    canvas: Canvas,
    background: Arc<Vec<u8>>,
    caption: Arc<PreparedCaption>,
    animation: TextAnimation,
    total_frames: u64,
}

impl FrameRenderer {
    /// Prepare background and caption for `spec`.
    pub fn new(spec: &ReelSpec, font: &FontAsset) -> ReelResult<Self> {
        let canvas = spec.canvas();
        let caption = PreparedCaption::prepare(spec, font)?;
        Ok(Self {
            canvas,
            background: Arc::new(paint_background(spec.background, canvas)),
            caption: Arc::new(caption),
            animation: spec.animation,
            total_frames: spec.total_frames(),
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of frames in the clip.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Prepared caption.
    pub fn caption(&self) -> &PreparedCaption {
        &self.caption
    }

    /// Animation state at `idx`.
    pub fn state_at(&self, idx: FrameIndex) -> AnimationState {
        animation_state(self.animation, progress(idx, self.total_frames))
    }

    /// Render frame `idx`.
    pub fn render(&self, idx: FrameIndex) -> ReelResult<FrameRGBA> {
        self.render_state(self.state_at(idx))
    }

    /// Render the frame for an explicit animation state.
    pub fn render_state(&self, state: AnimationState) -> ReelResult<FrameRGBA> {
        let mut data = self.background.as_ref().clone();
        if state.alpha > 0 {
            let text = self.rasterize_text(state)?;
            over_in_place(&mut data, &text, 1.0)?;
        }
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn rasterize_text(&self, state: AnimationState) -> ReelResult<Vec<u8>> {
        let w: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| ReelError::render("canvas width exceeds u16"))?;
        let h: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| ReelError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let opacity = f32::from(state.alpha) / 255.0;
        if state.alpha < 255 {
            ctx.push_opacity_layer(opacity);
        }

        let placements = self.line_placements(state);
        let shadow = Rgba8::hex(0x000000).with_alpha((SHADOW_OPACITY * 255.0).round() as u8);
        let shadow_shift = Affine::translate((SHADOW_OFFSET_PX, SHADOW_OFFSET_PX));
        for (line, tr) in self.caption.lines.iter().zip(&placements) {
            self.draw_line(&mut ctx, line, shadow_shift * *tr, Some(shadow));
        }
        for (line, tr) in self.caption.lines.iter().zip(&placements) {
            self.draw_line(&mut ctx, line, *tr, None);
        }

        if state.alpha < 255 {
            ctx.pop_layer();
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    /// Screen transform per line: centered horizontally, block centered vertically, then the
    /// animation's offset and scale about the block center.
    fn line_placements(&self, state: AnimationState) -> Vec<Affine> {
        let cw = f64::from(self.canvas.width);
        let ch = f64::from(self.canvas.height);
        let pitch = f64::from(self.caption.style.line_pitch_px);
        let top = (ch - f64::from(self.caption.block_height())) / 2.0;
        let center = (cw / 2.0, ch / 2.0 + f64::from(state.offset_y));

        let zoom = Affine::translate(center)
            * Affine::scale(f64::from(state.scale))
            * Affine::translate((-center.0, -center.1));

        self.caption
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let x = (cw - f64::from(line.width)) / 2.0;
                let y = top + i as f64 * pitch + (pitch - f64::from(line.height)) / 2.0;
                zoom * Affine::translate((x, y + f64::from(state.offset_y)))
            })
            .collect()
    }

    fn draw_line(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        line: &ShapedLine,
        transform: Affine,
        paint_override: Option<Rgba8>,
    ) {
        ctx.set_transform(transform);
        for l in line.layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let c = paint_override.unwrap_or_else(|| {
                    let b = run.style().brush;
                    Rgba8 {
                        r: b.r,
                        g: b.g,
                        b: b.b,
                        a: b.a,
                    }
                });
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                // `.notdef` would draw as an empty box; leave uncovered characters blank.
                let glyphs = run
                    .glyphs()
                    .filter(|g| g.id != 0)
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                // Each run carries the face parley selected for it, fallback faces included.
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
