/// Weight and size of a text run. The family is fixed per measurer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// CSS-style weight (100..=900).
    pub weight: u16,
    pub size_px: f32,
}

impl FontSpec {
    pub const LIGHT: u16 = 300;
    pub const REGULAR: u16 = 400;
    pub const MEDIUM: u16 = 500;
    pub const BOLD: u16 = 700;

    pub fn new(weight: u16, size_px: f32) -> Self {
        Self { weight, size_px }
    }
}

/// Rendered width of a single-line string.
///
/// Implementations must be stable (same input, same width) and monotonic in text length for a
/// fixed font. Measuring never fails.
pub trait TextMeasurer {
    /// The single family this measurer shapes with.
    fn family(&self) -> &str;

    fn measure(&mut self, text: &str, font: FontSpec) -> f64;
}

/// Environment-independent metrics: a fixed average advance per character.
#[derive(Clone, Debug)]
pub struct DeterministicMeasurer {
    family: String,
    /// Advance in em for weights below 600.
    pub advance_em: f64,
    /// Advance in em for weights of 600 and above.
    pub bold_advance_em: f64,
}

impl Default for DeterministicMeasurer {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl DeterministicMeasurer {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            advance_em: 0.55,
            bold_advance_em: 0.6,
        }
    }
}

impl TextMeasurer for DeterministicMeasurer {
    fn family(&self) -> &str {
        &self.family
    }

    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        let em = if font.weight >= 600 {
            self.bold_advance_em
        } else {
            self.advance_em
        };
        let size = f64::from(font.size_px).max(0.0);
        text.chars().count() as f64 * size * em
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
