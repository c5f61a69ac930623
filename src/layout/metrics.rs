use crate::{foundation::core::Canvas, text::measure::FontSpec};

/// Layout constants for one canvas size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayoutMetrics {
    pub margin_x: f64,
    pub content_top: f64,
    pub content_height: f64,
    pub title_leading: f64,
    pub title_font: FontSpec,
    pub title_line_height: f64,
    pub block_gap: f64,
    pub description_font: FontSpec,
    pub description_line_height: f64,
    pub description_max_lines: usize,
    pub max_text_width: f64,
    pub avatar_diameter: f64,
    pub footer_top: f64,
    pub site_name_font: FontSpec,
    pub social_font: FontSpec,
    pub footer_line_height: f64,
}

impl LayoutMetrics {
    /// Constants of the 1200x600 reference card.
    pub const REFERENCE: LayoutMetrics = LayoutMetrics {
        margin_x: 96.0,
        content_top: 48.0,
        content_height: 420.0,
        title_leading: 64.0,
        title_font: FontSpec {
            weight: FontSpec::BOLD,
            size_px: 60.0,
        },
        title_line_height: 72.0,
        block_gap: 32.0,
        description_font: FontSpec {
            weight: FontSpec::LIGHT,
            size_px: 36.0,
        },
        description_line_height: 50.0,
        description_max_lines: 2,
        max_text_width: 768.0,
        avatar_diameter: 256.0,
        footer_top: 520.0,
        site_name_font: FontSpec {
            weight: FontSpec::BOLD,
            size_px: 24.0,
        },
        social_font: FontSpec {
            weight: FontSpec::MEDIUM,
            size_px: 24.0,
        },
        footer_line_height: 30.0,
    };

    pub const REFERENCE_CANVAS: Canvas = Canvas::OG_DEFAULT;

    /// Scale [`Self::REFERENCE`] to `canvas`.
    ///
    /// Horizontal lengths scale with the width ratio, vertical ones with the height ratio. Font
    /// sizes, line heights and the avatar diameter use the smaller of the two.
    pub fn scaled(canvas: Canvas) -> Self {
        let r = Self::REFERENCE;
        let sx = canvas.width_f64() / Self::REFERENCE_CANVAS.width_f64();
        let sy = canvas.height_f64() / Self::REFERENCE_CANVAS.height_f64();
        let s = sx.min(sy);
        let font = |f: FontSpec| FontSpec {
            weight: f.weight,
            size_px: (f64::from(f.size_px) * s) as f32,
        };

        LayoutMetrics {
            margin_x: r.margin_x * sx,
            content_top: r.content_top * sy,
            content_height: r.content_height * sy,
            title_leading: r.title_leading * sy,
            title_font: font(r.title_font),
            title_line_height: r.title_line_height * s,
            block_gap: r.block_gap * sy,
            description_font: font(r.description_font),
            description_line_height: r.description_line_height * s,
            description_max_lines: r.description_max_lines,
            max_text_width: r.max_text_width * sx,
            avatar_diameter: r.avatar_diameter * s,
            footer_top: r.footer_top * sy,
            site_name_font: font(r.site_name_font),
            social_font: font(r.social_font),
            footer_line_height: r.footer_line_height * s,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/metrics.rs"]
mod tests;
