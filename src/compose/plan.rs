use kurbo::Shape;

use crate::{
    assets::avatar::{AvatarBitmap, AvatarImage},
    config::Theme,
    foundation::core::{Affine, BezPath, Canvas, LayoutBox, Point, Rect, Rgba8},
    layout::engine::{OgLayout, TextLabel},
    text::measure::FontSpec,
};

/// Backend-agnostic paint commands for one card.
///
/// Ops are stored in paint order; later ops paint over earlier ones. Colors are straight
/// alpha, backends premultiply as needed.
#[derive(Clone, Debug)]
pub struct DrawPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill `rect` with a two-stop gradient along `start -> end`.
    LinearGradient {
        rect: Rect,
        start: Point,
        end: Point,
        from: Rgba8,
        to: Rgba8,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    /// Draw `image` scaled to cover `bounds`, clipped to the circle inscribed in `bounds`.
    ClippedImage {
        image: AvatarBitmap,
        bounds: LayoutBox,
    },
    FillPath {
        path: BezPath,
        color: Rgba8,
    },
    /// A single line of text; `origin` is the top-left corner of the line box.
    TextRun {
        text: String,
        font: FontSpec,
        origin: Point,
        color: Rgba8,
    },
}

impl DrawPlan {
    pub fn text_runs(&self) -> impl Iterator<Item = (&str, FontSpec)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::TextRun { text, font, .. } => Some((text.as_str(), *font)),
            _ => None,
        })
    }
}

/// Lower a layout and a resolved avatar to paint commands.
pub fn build_draw_plan(layout: &OgLayout, avatar: &AvatarImage, theme: &Theme) -> DrawPlan {
    let canvas = layout.canvas;
    let mut ops = Vec::new();

    let full = Rect::new(0.0, 0.0, canvas.width_f64(), canvas.height_f64());
    ops.push(DrawOp::LinearGradient {
        rect: full,
        start: Point::ORIGIN,
        end: Point::new(full.x1, full.y1),
        from: theme.background_start,
        to: theme.background_end,
    });

    let center = layout.avatar.center();
    let radius = layout.avatar.width.min(layout.avatar.height) / 2.0;
    match avatar {
        AvatarImage::Bitmap(image) => {
            ops.push(DrawOp::FillCircle {
                center,
                radius,
                color: theme.avatar_fill,
            });
            ops.push(DrawOp::ClippedImage {
                image: image.clone(),
                bounds: layout.avatar,
            });
        }
        AvatarImage::Placeholder(p) => {
            ops.push(DrawOp::FillCircle {
                center,
                radius,
                color: p.fill,
            });
            ops.push(DrawOp::FillPath {
                path: placeholder_silhouette(center, radius * 2.0),
                color: p.glyph,
            });
        }
    }

    let text = |label: &TextLabel| DrawOp::TextRun {
        text: label.text.clone(),
        font: label.font,
        origin: Point::new(label.bounds.x, label.bounds.y),
        color: theme.text,
    };
    ops.extend(layout.title.lines.iter().map(text));
    ops.extend(layout.description.lines.iter().map(text));
    ops.push(text(&layout.site_name));
    ops.push(text(&layout.social));

    DrawPlan { canvas, ops }
}

/// Head-and-shoulders glyph, authored on a 256px avatar around its centre.
pub fn placeholder_silhouette(center: Point, diameter: f64) -> BezPath {
    let mut path = BezPath::new();
    path.extend(kurbo::Circle::new((0.0, -16.0), 32.0).path_elements(0.1));

    path.move_to((0.0, 28.0));
    path.curve_to((-26.0, 28.0), (-48.0, 44.0), (-48.0, 64.0));
    path.line_to((-48.0, 84.0));
    path.curve_to((-48.0, 94.0), (-38.0, 100.0), (0.0, 100.0));
    path.curve_to((38.0, 100.0), (48.0, 94.0), (48.0, 84.0));
    path.line_to((48.0, 64.0));
    path.curve_to((48.0, 44.0), (26.0, 28.0), (0.0, 28.0));
    path.close_path();

    path.apply_affine(Affine::translate(center.to_vec2()) * Affine::scale(diameter / 256.0));
    path
}

/// Maps image pixel space onto `bounds` so the image covers it, centred, aspect preserved.
pub fn cover_transform(image_w: u32, image_h: u32, bounds: &LayoutBox) -> Affine {
    let (iw, ih) = (f64::from(image_w.max(1)), f64::from(image_h.max(1)));
    let scale = (bounds.width / iw).max(bounds.height / ih);
    let dx = bounds.x + (bounds.width - iw * scale) / 2.0;
    let dy = bounds.y + (bounds.height - ih * scale) / 2.0;
    Affine::translate((dx, dy)) * Affine::scale(scale)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
