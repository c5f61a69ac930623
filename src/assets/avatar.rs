use std::sync::Arc;

use crate::{
    assets::{decode::decode_avatar, fetch::FetchPolicy, fetch::load_source},
    config::OgConfig,
    foundation::core::Rgba8,
    foundation::error::OgResult,
    request::AvatarSource,
};

/// Decoded avatar pixels, premultiplied RGBA8, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for AvatarBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Drawn in place of an avatar that could not be loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub fill: Rgba8,
    pub glyph: Rgba8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarImage {
    Bitmap(AvatarBitmap),
    Placeholder(Placeholder),
}

impl AvatarImage {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Turns an optional avatar source into something drawable. Never fails.
#[derive(Clone, Debug)]
pub struct AvatarResolver {
    policy: FetchPolicy,
    default_source: Option<String>,
    placeholder: Placeholder,
    raster_px: u32,
}

impl AvatarResolver {
    /// `diameter` is the on-canvas avatar size; vector sources are rasterized to cover it.
    pub fn new(cfg: &OgConfig, diameter: f64) -> Self {
        Self {
            policy: FetchPolicy::from_config(cfg),
            default_source: cfg
                .avatar
                .default_source
                .clone()
                .filter(|s| !s.trim().is_empty()),
            placeholder: Placeholder {
                fill: cfg.theme.avatar_fill,
                glyph: cfg.theme.placeholder_glyph,
            },
            raster_px: diameter.ceil().max(1.0) as u32,
        }
    }

    pub fn raster_px(&self) -> u32 {
        self.raster_px
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// A request source that fails goes straight to the placeholder; only an absent source tries
    /// the configured default icon first.
    #[tracing::instrument(skip_all, fields(has_source = source.is_some()))]
    pub fn resolve(&self, source: Option<&AvatarSource>) -> AvatarImage {
        match source {
            Some(src) => match self.load(src) {
                Ok(bitmap) => AvatarImage::Bitmap(bitmap),
                Err(err) => {
                    tracing::warn!(source = ?src, error = %err, "avatar unavailable; using placeholder");
                    AvatarImage::Placeholder(self.placeholder)
                }
            },
            None => {
                let Some(default) = &self.default_source else {
                    return AvatarImage::Placeholder(self.placeholder);
                };
                match self.load(&AvatarSource::Url(default.clone())) {
                    Ok(bitmap) => AvatarImage::Bitmap(bitmap),
                    Err(err) => {
                        tracing::warn!(source = %default, error = %err, "default avatar unavailable; using placeholder");
                        AvatarImage::Placeholder(self.placeholder)
                    }
                }
            }
        }
    }

    fn load(&self, source: &AvatarSource) -> OgResult<AvatarBitmap> {
        let bytes = load_source(source, &self.policy)?;
        decode_avatar(&bytes, self.raster_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/avatar.rs"]
mod tests;
