use crate::text::measure::{FontSpec, TextMeasurer};

/// Lines produced by one [`wrap`] call plus the metrics that produced them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub font: FontSpec,
    pub line_height: f64,
    pub max_width: f64,
}

impl WrappedText {
    pub fn new(
        text: &str,
        max_width: f64,
        font: FontSpec,
        line_height: f64,
        measurer: &mut dyn TextMeasurer,
    ) -> Self {
        Self {
            lines: wrap(text, max_width, font, measurer),
            font,
            line_height,
            max_width,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Keep only the first `max_lines` lines. Overflow is dropped without an ellipsis.
    pub fn truncated(mut self, max_lines: usize) -> Self {
        self.lines.truncate(max_lines);
        self
    }
}

/// Greedy word wrap.
///
/// Words are whitespace-separated. A word is appended to the current line unless the result is
/// wider than `max_width` and the line already holds something, in which case the line is
/// committed and the word starts the next one. Single words wider than `max_width` get a line of
/// their own and are never split.
pub fn wrap(
    text: &str,
    max_width: f64,
    font: FontSpec,
    measurer: &mut dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if !current.is_empty() && measurer.measure(&candidate, font) > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
