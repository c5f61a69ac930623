//! ogmaker renders Open Graph preview cards.
//!
//! A card is built from a title, a description, a site name, a social handle and an optional
//! avatar. Rendering is deterministic: the same request and configuration always produce the
//! same bytes.
//!
//! # Pipeline overview
//!
//! 1. **Request**: [`ImageRequest`] with defaults substituted for empty fields
//! 2. **Layout**: [`compute_layout`] wraps text with a [`TextMeasurer`] and places every element
//! 3. **Avatar**: [`AvatarResolver`] loads the avatar or falls back to a placeholder
//! 4. **Plan**: [`build_draw_plan`] lowers the layout to backend-agnostic [`DrawOp`]s
//! 5. **Paint**: [`CpuBackend`] (raster) or [`SvgBackend`] (markup) interprets the plan
//! 6. **Encode**: [`encode`] writes lossless PNG or WebP
//!
//! [`Renderer`] ties these together and is safe to share between threads.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod config;
mod encode;
mod foundation;
mod layout;
mod pipeline;
mod render;
mod request;
mod text;

pub use assets::avatar::{AvatarBitmap, AvatarImage, AvatarResolver, Placeholder};
pub use assets::decode::{decode_avatar, decode_image, looks_like_svg, parse_svg};
pub use assets::fetch::{FetchPolicy, SourceKind, classify, decode_data_uri, load_source};
pub use compose::plan::{DrawOp, DrawPlan, build_draw_plan, cover_transform, placeholder_silhouette};
pub use config::{
    AvatarConfig, BUNDLED_FONT_FAMILY, DEFAULT_AVATAR_PATH, ENV_FETCH_TIMEOUT_MS, ENV_FONT_FAMILY,
    FontConfig, OgConfig, Theme,
};
pub use encode::raster::{CACHE_CONTROL, EncodedImage, OutputFormat, encode, encode_rgba8};
pub use foundation::core::{
    Affine, BezPath, Canvas, LayoutBox, MAX_CANVAS_SIDE, Point, Rect, Rgba8, Vec2,
};
pub use foundation::error::{OgError, OgResult};
pub use layout::engine::{OgLayout, TextBlock, TextLabel, compute_layout};
pub use layout::metrics::LayoutMetrics;
pub use pipeline::Renderer;
pub use render::backend::{DrawBackend, execute_plan};
pub use render::cpu::CpuBackend;
pub use render::surface::RasterSurface;
pub use render::svg::SvgBackend;
pub use request::{
    AvatarSource, DEFAULT_DESCRIPTION, DEFAULT_SITE_NAME, DEFAULT_SOCIAL, DEFAULT_TITLE,
    ImageRequest, ImageRequestInput, slugify,
};
pub use text::fonts::{FontBook, FontFace, FontLibrary, ShapedGlyph, ShapedLine, TextEngine};
pub use text::measure::{DeterministicMeasurer, FontSpec, TextMeasurer};
pub use text::wrap::{WrappedText, wrap};
