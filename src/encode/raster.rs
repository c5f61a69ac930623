use image::ImageEncoder;

use crate::{
    foundation::error::{OgError, OgResult},
    render::surface::RasterSurface,
};

/// Response header value for rendered cards; identical input always renders identical bytes.
pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Lossless output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    WebP,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

/// Encoded card plus its response metadata.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn cache_control(&self) -> &'static str {
        CACHE_CONTROL
    }
}

pub fn encode(surface: &RasterSurface, format: OutputFormat) -> OgResult<Vec<u8>> {
    let rgba = surface.to_rgba8_straight();
    encode_rgba8(&rgba, surface.width(), surface.height(), format)
}

/// Encode straight-alpha RGBA8 pixels.
pub fn encode_rgba8(
    rgba: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> OgResult<Vec<u8>> {
    if rgba.len() != (width as usize) * (height as usize) * 4 {
        return Err(OgError::encode("pixel buffer size does not match dimensions"));
    }
    let mut buf = Vec::new();
    let color = image::ExtendedColorType::Rgba8;
    match format {
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(rgba, width, height, color)
            .map_err(|e| OgError::encode(format!("png: {e}")))?,
        OutputFormat::WebP => image::codecs::webp::WebPEncoder::new_lossless(&mut buf)
            .write_image(rgba, width, height, color)
            .map_err(|e| OgError::encode(format!("webp: {e}")))?,
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
