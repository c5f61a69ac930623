use std::fmt::Write as _;

use base64::Engine as _;

use crate::{
    assets::avatar::AvatarBitmap,
    compose::plan::{DrawOp, cover_transform},
    encode::raster::{OutputFormat, encode_rgba8},
    foundation::{
        core::{Canvas, Rgba8},
        error::{OgError, OgResult},
    },
    render::{backend::DrawBackend, surface::unpremultiply_rgba8_in_place},
};

/// Writes a draw plan as standalone SVG markup.
///
/// Text stays text (the configured family is referenced by name) and bitmaps are embedded as
/// PNG data URIs, so the output is a vector counterpart of the raster card.
pub struct SvgBackend {
    family: String,
    out: String,
    next_id: u32,
}

impl SvgBackend {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            out: String::new(),
            next_id: 0,
        }
    }

    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

impl DrawBackend for SvgBackend {
    type Output = String;

    fn begin(&mut self, canvas: Canvas) -> OgResult<()> {
        canvas.validate()?;
        self.out.clear();
        self.next_id = 0;
        let (w, h) = (canvas.width, canvas.height);
        let _ = write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
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
                let id = self.id("bg");
                let _ = write!(
                    self.out,
                    r#"<defs><linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}"><stop offset="0" {}/><stop offset="1" {}/></linearGradient></defs>"#,
                    num(start.x),
                    num(start.y),
                    num(end.x),
                    num(end.y),
                    color_attrs("stop-color", "stop-opacity", *from),
                    color_attrs("stop-color", "stop-opacity", *to),
                );
                let _ = write!(
                    self.out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#{id})"/>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                );
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => {
                let _ = write!(
                    self.out,
                    r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    color_attrs("fill", "fill-opacity", *color),
                );
            }
            DrawOp::ClippedImage { image, bounds } => {
                let href = png_data_uri(image)?;
                let id = self.id("clip");
                let c = bounds.center();
                let r = bounds.width.min(bounds.height) / 2.0;
                let [a, b, cc, d, e, f] = cover_transform(image.width, image.height, bounds)
                    .as_coeffs()
                    .map(num);
                let _ = write!(
                    self.out,
                    r#"<defs><clipPath id="{id}"><circle cx="{}" cy="{}" r="{}"/></clipPath></defs><g clip-path="url(#{id})"><image width="{}" height="{}" transform="matrix({a} {b} {cc} {d} {e} {f})" href="{href}"/></g>"#,
                    num(c.x),
                    num(c.y),
                    num(r),
                    image.width,
                    image.height,
                );
            }
            DrawOp::FillPath { path, color } => {
                let _ = write!(
                    self.out,
                    r#"<path d="{}" {}/>"#,
                    path.to_svg(),
                    color_attrs("fill", "fill-opacity", *color),
                );
            }
            DrawOp::TextRun {
                text,
                font,
                origin,
                color,
            } => {
                let _ = write!(
                    self.out,
                    r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" dominant-baseline="text-before-edge" {}>{}</text>"#,
                    num(origin.x),
                    num(origin.y),
                    escape_xml(&self.family),
                    num(f64::from(font.size_px)),
                    font.weight,
                    color_attrs("fill", "fill-opacity", *color),
                    escape_xml(text),
                );
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OgResult<String> {
        if self.out.is_empty() {
            return Err(OgError::render("finish called before begin"));
        }
        self.out.push_str("</svg>");
        Ok(std::mem::take(&mut self.out))
    }
}

fn png_data_uri(image: &AvatarBitmap) -> OgResult<String> {
    let mut rgba = image.rgba8_premul.to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);
    let png = encode_rgba8(&rgba, image.width, image.height, OutputFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

fn color_attrs(color_attr: &str, opacity_attr: &str, c: Rgba8) -> String {
    let hex = Rgba8 { a: 255, ..c }.to_hex();
    if c.a == 255 {
        format!(r#"{color_attr}="{hex}""#)
    } else {
        format!(
            r#"{color_attr}="{hex}" {opacity_attr}="{}""#,
            num(f64::from(c.a) / 255.0)
        )
    }
}

/// Shortest stable decimal: integers print without a fraction, others with up to 3 places.
fn num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
