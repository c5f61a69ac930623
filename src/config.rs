use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{OgError, OgResult};

/// Default icon drawn when a request carries no avatar source.
pub const DEFAULT_AVATAR_PATH: &str = "assets/default-avatar.svg";

/// Family name of the faces shipped in `assets/fonts`.
pub const BUNDLED_FONT_FAMILY: &str = "DejaVu Sans";

/// Overrides [`AvatarConfig::fetch_timeout_ms`].
pub const ENV_FETCH_TIMEOUT_MS: &str = "OGMAKER_FETCH_TIMEOUT_MS";
/// Overrides [`FontConfig::family`].
pub const ENV_FONT_FAMILY: &str = "OGMAKER_FONT_FAMILY";

/// Renderer configuration.
///
/// Everything here is fixed for the lifetime of a [`crate::Renderer`]; nothing in it is part of a
/// request. JSON files may omit any field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OgConfig {
    pub canvas: Canvas,
    pub fonts: FontConfig,
    pub avatar: AvatarConfig,
    pub theme: Theme,
    /// Base directory for relative avatar and font paths.
    pub assets_root: PathBuf,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::OG_DEFAULT,
            fonts: FontConfig::default(),
            avatar: AvatarConfig::default(),
            theme: Theme::default(),
            assets_root: PathBuf::from("."),
        }
    }
}

/// Font sources, tried in order: `files`, then the bundled faces, then system fonts. The first
/// source that yields any face wins.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// The single family used for every text run.
    pub family: String,
    /// Font files (ttf/otf/ttc) to load. Relative paths resolve against `assets_root`.
    pub files: Vec<PathBuf>,
    /// Use the regular and bold faces compiled into the crate (`assets/fonts`).
    pub bundled: bool,
    /// Query installed system fonts when nothing else yields a face.
    pub system: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: BUNDLED_FONT_FAMILY.to_string(),
            files: Vec::new(),
            bundled: true,
            system: true,
        }
    }
}

impl FontConfig {
    /// No font faces at all; layout falls back to deterministic metrics.
    pub fn disabled() -> Self {
        Self {
            family: BUNDLED_FONT_FAMILY.to_string(),
            files: Vec::new(),
            bundled: false,
            system: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Icon used when the request has no avatar. `None` goes straight to the placeholder.
    pub default_source: Option<String>,
    /// Upper bound for a remote fetch, connect through last body byte.
    pub fetch_timeout_ms: u64,
    /// Largest accepted avatar payload.
    pub max_bytes: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_source: Some(DEFAULT_AVATAR_PATH.to_string()),
            fetch_timeout_ms: 3_000,
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Fixed color palette of the card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background_start: Rgba8,
    pub background_end: Rgba8,
    pub avatar_fill: Rgba8,
    pub text: Rgba8,
    pub placeholder_glyph: Rgba8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // slate-800 -> slate-600
            background_start: Rgba8::opaque(0x1e, 0x29, 0x3b),
            background_end: Rgba8::opaque(0x47, 0x55, 0x69),
            avatar_fill: Rgba8::opaque(0x64, 0x74, 0x8b),
            text: Rgba8::WHITE,
            placeholder_glyph: Rgba8::WHITE.with_alpha(204),
        }
    }
}

impl OgConfig {
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| OgError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON config file. A relative `assets_root` is resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> OgResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if cfg.assets_root.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.assets_root = dir.join(&cfg.assets_root);
        }
        Ok(cfg)
    }

    /// Apply `OGMAKER_*` environment overrides. Unparseable values are ignored.
    pub fn apply_env(mut self) -> Self {
        if let Some(ms) = std::env::var(ENV_FETCH_TIMEOUT_MS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.avatar.fetch_timeout_ms = ms;
        }
        if let Some(family) = std::env::var(ENV_FONT_FAMILY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            self.fonts.family = family;
        }
        self
    }

    pub fn validate(&self) -> OgResult<()> {
        self.canvas
            .validate()
            .map_err(|e| OgError::config(e.to_string()))?;
        if self.avatar.fetch_timeout_ms == 0 {
            return Err(OgError::config("avatar.fetch_timeout_ms must be > 0"));
        }
        if self.avatar.max_bytes == 0 {
            return Err(OgError::config("avatar.max_bytes must be > 0"));
        }
        if self.fonts.family.trim().is_empty() {
            return Err(OgError::config("fonts.family must be non-empty"));
        }
        Ok(())
    }

    /// Resolve `p` against `assets_root` unless it is already absolute.
    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.assets_root.join(p)
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
