use std::sync::Arc;

use crate::{
    compose::plan::{DrawOp, cover_transform},
    foundation::{
        core::{Affine, BezPath, Canvas, Point, Rect, Rgba8},
        error::{OgError, OgResult},
    },
    render::{
        backend::DrawBackend,
        surface::{RasterSurface, canvas_u16},
    },
    text::{fonts::FontBook, measure::FontSpec},
};

/// `vello_cpu` interpreter for draw plans.
///
/// Text is shaped through the same [`FontBook`] the layout measured with. Without one, text runs
/// are skipped.
pub struct CpuBackend<'a> {
    fonts: Option<&'a mut FontBook>,
    font_data: Vec<Option<vello_cpu::peniko::FontData>>,
    ctx: Option<vello_cpu::RenderContext>,
    canvas: Canvas,
    skipped_text: usize,
}

impl<'a> CpuBackend<'a> {
    pub fn new(fonts: Option<&'a mut FontBook>) -> Self {
        Self {
            fonts,
            font_data: Vec::new(),
            ctx: None,
            canvas: Canvas::OG_DEFAULT,
            skipped_text: 0,
        }
    }

    fn ctx_mut(&mut self) -> OgResult<&mut vello_cpu::RenderContext> {
        self.ctx
            .as_mut()
            .ok_or_else(|| OgError::render("draw called before begin"))
    }

    fn font_data_for(&mut self, face: usize) -> OgResult<vello_cpu::peniko::FontData> {
        if let Some(Some(data)) = self.font_data.get(face) {
            return Ok(data.clone());
        }
        let fonts = self
            .fonts
            .as_ref()
            .ok_or_else(|| OgError::render("no font book"))?;
        let f = fonts
            .library()
            .faces()
            .get(face)
            .ok_or_else(|| OgError::render(format!("font face {face} out of range")))?;
        let data = vello_cpu::peniko::FontData::new(f.data.clone(), f.index);
        if self.font_data.len() <= face {
            self.font_data.resize_with(face + 1, || None);
        }
        self.font_data[face] = Some(data.clone());
        Ok(data)
    }

    fn draw_text(
        &mut self,
        text: &str,
        font: FontSpec,
        origin: Point,
        color: Rgba8,
    ) -> OgResult<()> {
        let Some(fonts) = self.fonts.as_deref_mut() else {
            self.skipped_text += 1;
            return Ok(());
        };
        let Some(line) = fonts.shape_line(text, font) else {
            self.skipped_text += 1;
            return Ok(());
        };
        let data = self.font_data_for(line.face)?;

        let ctx = self.ctx_mut()?;
        ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));
        let glyphs = line.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        ctx.glyph_run(&data)
            .font_size(line.size_px)
            .fill_glyphs(glyphs);
        Ok(())
    }
}

impl DrawBackend for CpuBackend<'_> {
    type Output = RasterSurface;

    fn begin(&mut self, canvas: Canvas) -> OgResult<()> {
        let (w, h) = canvas_u16(canvas)?;
        self.canvas = canvas;
        self.skipped_text = 0;
        self.ctx = Some(vello_cpu::RenderContext::new(w, h));
        Ok(())
    }

    fn draw(&mut self, op: &DrawOp) -> OgResult<()> {
        match op {
            DrawOp::LinearGradient {
                rect,
                start,
                end,
                from,
                to,
            } => {
                let img = gradient_paint(*rect, *start, *end, *from, *to)?;
                let ctx = self.ctx_mut()?;
                ctx.set_transform(affine_to_cpu(Affine::translate((rect.x0, rect.y0))));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    rect.width().ceil(),
                    rect.height().ceil(),
                ));
                Ok(())
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => {
                let path = circle_path(*center, *radius);
                let ctx = self.ctx_mut()?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
                Ok(())
            }
            DrawOp::ClippedImage { image, bounds } => {
                let paint =
                    rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
                let cover = cover_transform(image.width, image.height, bounds);
                let radius = bounds.width.min(bounds.height) / 2.0;
                let clip = circle_path(bounds.center(), radius);

                let ctx = self.ctx_mut()?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint_transform(affine_to_cpu(cover));
                ctx.set_paint(paint);
                ctx.fill_path(&bezpath_to_cpu(&clip));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                Ok(())
            }
            DrawOp::FillPath { path, color } => {
                let ctx = self.ctx_mut()?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
                Ok(())
            }
            DrawOp::TextRun {
                text,
                font,
                origin,
                color,
            } => self.draw_text(text, *font, *origin, *color),
        }
    }

    fn finish(&mut self) -> OgResult<RasterSurface> {
        let mut ctx = self
            .ctx
            .take()
            .ok_or_else(|| OgError::render("finish called before begin"))?;
        if self.skipped_text > 0 {
            tracing::warn!(
                runs = self.skipped_text,
                "no font available; text runs were not painted"
            );
        }
        let (w, h) = canvas_u16(self.canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(RasterSurface::from_pixmap(pixmap))
    }
}

/// Rasterized two-stop gradient over `rect`, in rect-local pixels.
fn gradient_paint(
    rect: Rect,
    start: Point,
    end: Point,
    from: Rgba8,
    to: Rgba8,
) -> OgResult<vello_cpu::Image> {
    let w = rect.width().ceil().max(1.0) as u32;
    let h = rect.height().ceil().max(1.0) as u32;
    let axis = end - start;
    let len2 = axis.hypot2();

    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(rect.x0 + f64::from(x) + 0.5, rect.y0 + f64::from(y) + 0.5);
            let t = if len2 <= f64::EPSILON {
                0.0
            } else {
                (p - start).dot(axis) / len2
            };
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&from.lerp(to, t).premultiplied());
        }
    }
    rgba_premul_to_image(&bytes, w, h)
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    use kurbo::Shape;

    kurbo::Circle::new(center, radius.max(0.0)).to_path(0.1)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> OgResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| OgError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OgError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(OgError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> OgResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
