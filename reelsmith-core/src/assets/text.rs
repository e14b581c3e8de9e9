use std::borrow::Cow;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::wrap::TextMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// One shaped caption line.
#[derive(Clone)]
pub struct ShapedLine {
    /// Line text after wrapping.
    pub text: String,
    /// Shaped single-line layout.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Advance width in pixels.
    pub width: f32,
    /// Line box height in pixels.
    pub height: f32,
}

impl ShapedLine {
    /// Number of glyphs shaped to `.notdef`, i.e. characters no registered face covers.
    pub fn missing_glyphs(&self) -> usize {
        self.layout
            .lines()
            .flat_map(|line| line.items())
            .map(|item| match item {
                parley::layout::PositionedLayoutItem::GlyphRun(run) => {
                    run.glyphs().filter(|g| g.id == 0).count()
                }
                parley::layout::PositionedLayoutItem::InlineBox(_) => 0,
            })
            .sum()
    }
}

impl std::fmt::Debug for ShapedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLine")
            .field("text", &self.text)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Stateful helper for shaping caption text with a caption face and optional fallbacks.
///
/// Parley picks a face per character cluster, walking the family list in registration order.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    families: Vec<String>,
    size_px: f32,
    brush: TextBrushRgba8,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and shape subsequent text at `size_px` in `brush`.
    pub fn new(font_bytes: &[u8], size_px: f32, brush: TextBrushRgba8) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::render("text size_px must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let family_name = register(&mut font_ctx, font_bytes)?;

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            families: vec![family_name.clone()],
            family_name,
            size_px,
            brush,
        })
    }

    /// Register `font_bytes` as a fallback consulted after every face registered before it.
    pub fn add_fallback(&mut self, font_bytes: &[u8]) -> ReelResult<()> {
        let name = register(&mut self.font_ctx, font_bytes)?;
        if !self.families.contains(&name) {
            self.families.push(name);
        }
        Ok(())
    }

    /// Family name resolved from the caption face.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Family lookup order, caption face first.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Font size used for every layout.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Shape `text` on a single unbounded line.
    pub fn layout_line(&mut self, text: &str) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        let stack: Vec<parley::style::FontFamily<'_>> = self
            .families
            .iter()
            .map(|name| parley::style::FontFamily::Named(Cow::Borrowed(name.as_str())))
            .collect();
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::List(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(self.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        layout
    }

    /// Shape every wrapped line.
    pub fn shape_lines(&mut self, lines: &[String]) -> Vec<ShapedLine> {
        lines
            .iter()
            .map(|text| {
                let layout = self.layout_line(text);
                ShapedLine {
                    text: text.clone(),
                    width: layout.width(),
                    height: layout.height().max(self.size_px),
                    layout: Arc::new(layout),
                }
            })
            .collect()
    }
}

fn register(font_ctx: &mut parley::FontContext, font_bytes: &[u8]) -> ReelResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| ReelError::render("no font families registered from font bytes"))?;
    Ok(font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| ReelError::render("registered font family has no name"))?
        .to_string())
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, text: &str) -> f32 {
        self.layout_line(text).width()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
