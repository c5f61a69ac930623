use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::avatar::AvatarBitmap,
    foundation::error::{OgError, OgResult},
};

/// Largest side we are willing to rasterize an SVG to.
const MAX_SVG_RASTER: u32 = 4096;
/// Raster avatars become `vello_cpu` pixmaps, which are addressed with `u16`.
const MAX_IMAGE_SIDE: u32 = 16_384;

/// Decode any avatar payload: SVG is rasterized so its shorter side is `raster_px`, everything
/// else goes through the `image` crate.
pub fn decode_avatar(bytes: &[u8], raster_px: u32) -> OgResult<AvatarBitmap> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let (w, h) = svg_raster_size(&tree, raster_px)?;
        rasterize_svg(&tree, w, h)
    } else {
        decode_image(bytes)
    }
}

pub fn decode_image(bytes: &[u8]) -> OgResult<AvatarBitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(OgError::asset("decoded image is empty"));
    }
    if width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
        return Err(OgError::asset(format!(
            "image {width}x{height} exceeds max side {MAX_IMAGE_SIDE}"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(AvatarBitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub fn parse_svg(bytes: &[u8]) -> OgResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Pixel size that covers a `raster_px` square while keeping the SVG's aspect ratio.
pub fn svg_raster_size(tree: &usvg::Tree, raster_px: u32) -> OgResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(OgError::asset("svg has invalid width/height"));
    }
    let short = f64::from(w.min(h));
    let target = f64::from(raster_px.max(1));
    let px = |v: f32| ((f64::from(v) * target / short).ceil() as u32).clamp(1, MAX_SVG_RASTER);
    Ok((px(w), px(h)))
}

pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> OgResult<AvatarBitmap> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| OgError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    // tiny-skia pixels are already premultiplied RGBA8.
    Ok(AvatarBitmap {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

/// Content sniffing: an XML prolog or an `<svg` root near the start of the payload.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = &head[start..];
    if head.starts_with(b"<svg") {
        return true;
    }
    (head.starts_with(b"<?xml") || head.starts_with(b"<!--") || head.starts_with(b"<!DOCTYPE"))
        && head.windows(4).any(|w| w == b"<svg")
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
