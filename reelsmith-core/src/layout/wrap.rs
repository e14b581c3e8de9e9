//! Greedy word wrapping against a measured width budget.

/// Hard cap on wrapped lines; text beyond it is dropped.
pub const MAX_LINES: usize = 8;

/// Width measurement seam between the wrapper and a concrete font.
pub trait TextMeasure {
    /// Rendered advance width of `text` on a single line, in pixels.
    fn measure(&mut self, text: &str) -> f32;
}

/// Every character advances by the same amount. Useful for previews and tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvance(pub f32);

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

/// Wrap `text` into at most [`MAX_LINES`] lines no wider than `max_width`.
///
/// Words are appended while `current + " " + word` still fits; otherwise the line closes and
/// the word starts the next one. A word wider than `max_width` sits alone on its line.
/// Explicit newlines in `text` always start a new line.
pub fn wrap_lines(text: &str, max_width: f32, measure: &mut dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();

    'paragraphs: for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure.measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                if lines.len() == MAX_LINES {
                    break 'paragraphs;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
            if lines.len() == MAX_LINES {
                break;
            }
        }
    }

    lines
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
