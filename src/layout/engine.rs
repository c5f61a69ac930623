use crate::{
    foundation::core::{Canvas, LayoutBox},
    layout::metrics::LayoutMetrics,
    request::ImageRequest,
    text::{
        measure::{FontSpec, TextMeasurer},
        wrap::WrappedText,
    },
};

/// One line of text with its measured box. The box top is the top of the line.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLabel {
    pub text: String,
    pub font: FontSpec,
    pub bounds: LayoutBox,
}

/// A wrapped paragraph: the lines that get painted and the box around them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextBlock {
    pub lines: Vec<TextLabel>,
    pub bounds: LayoutBox,
    pub line_height: f64,
    /// Wrapped lines cut by the line cap.
    pub dropped_lines: usize,
}

impl TextBlock {
    fn from_wrapped(
        wrapped: WrappedText,
        max_lines: Option<usize>,
        x: f64,
        y: f64,
        measurer: &mut dyn TextMeasurer,
    ) -> Self {
        let total = wrapped.len();
        let wrapped = match max_lines {
            Some(n) => wrapped.truncated(n),
            None => wrapped,
        };
        let dropped_lines = total - wrapped.len();

        let lh = wrapped.line_height;
        let font = wrapped.font;
        let lines: Vec<TextLabel> = wrapped
            .lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let width = measurer.measure(&text, font);
                TextLabel {
                    bounds: LayoutBox::new(x, y + i as f64 * lh, width, lh),
                    text,
                    font,
                }
            })
            .collect();

        let bounds = lines
            .iter()
            .map(|l| l.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| LayoutBox::new(x, y, 0.0, 0.0));

        Self {
            lines,
            bounds,
            line_height: lh,
            dropped_lines,
        }
    }
}

/// Absolute placement of every element of the card.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OgLayout {
    pub canvas: Canvas,
    pub title: TextBlock,
    pub description: TextBlock,
    /// Bounding square of the avatar circle.
    pub avatar: LayoutBox,
    pub site_name: TextLabel,
    pub social: TextLabel,
}

impl OgLayout {
    /// Every box in paint order, labelled.
    pub fn named_boxes(&self) -> Vec<(String, LayoutBox)> {
        let mut out = Vec::new();
        out.push(("avatar".to_string(), self.avatar));
        out.push(("title".to_string(), self.title.bounds));
        for (i, l) in self.title.lines.iter().enumerate() {
            out.push((format!("title[{i}]"), l.bounds));
        }
        out.push(("description".to_string(), self.description.bounds));
        for (i, l) in self.description.lines.iter().enumerate() {
            out.push((format!("description[{i}]"), l.bounds));
        }
        out.push(("site_name".to_string(), self.site_name.bounds));
        out.push(("social".to_string(), self.social.bounds));
        out
    }
}

/// Place every element of the card for `request` on `canvas`.
///
/// Pure given the measurer: no IO, and the result does not depend on whether the avatar later
/// loads.
#[tracing::instrument(skip_all, fields(w = canvas.width, h = canvas.height))]
pub fn compute_layout(
    request: &ImageRequest,
    canvas: Canvas,
    measurer: &mut dyn TextMeasurer,
) -> OgLayout {
    let m = LayoutMetrics::scaled(canvas);

    let title_wrapped = WrappedText::new(
        request.title(),
        m.max_text_width,
        m.title_font,
        m.title_line_height,
        measurer,
    );
    let title_y = m.content_top + m.title_leading;
    let title_lines = title_wrapped.len();
    let title = TextBlock::from_wrapped(title_wrapped, None, m.margin_x, title_y, measurer);

    let title_end = title_y + title_lines as f64 * m.title_line_height;
    let desc_wrapped = WrappedText::new(
        request.description(),
        m.max_text_width,
        m.description_font,
        m.description_line_height,
        measurer,
    );
    let description = TextBlock::from_wrapped(
        desc_wrapped,
        Some(m.description_max_lines),
        m.margin_x,
        title_end + m.block_gap,
        measurer,
    );
    if description.dropped_lines > 0 {
        tracing::debug!(dropped = description.dropped_lines, "description truncated");
    }

    let d = m.avatar_diameter;
    let avatar = LayoutBox::new(
        canvas.width_f64() - m.margin_x - d,
        m.content_top + (m.content_height - d) / 2.0,
        d,
        d,
    );

    let site_w = measurer.measure(request.site_name(), m.site_name_font);
    let site_name = TextLabel {
        text: request.site_name().to_string(),
        font: m.site_name_font,
        bounds: LayoutBox::new(m.margin_x, m.footer_top, site_w, m.footer_line_height),
    };

    let social_w = measurer.measure(request.social(), m.social_font);
    let social = TextLabel {
        text: request.social().to_string(),
        font: m.social_font,
        bounds: LayoutBox::new(
            canvas.width_f64() - m.margin_x - social_w,
            m.footer_top,
            social_w,
            m.footer_line_height,
        ),
    };

    OgLayout {
        canvas,
        title,
        description,
        avatar,
        site_name,
        social,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
