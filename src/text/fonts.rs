use std::path::Path;

use anyhow::Context;
use parley::fontique::Blob;

use crate::{
    config::{BUNDLED_FONT_FAMILY, FontConfig},
    foundation::error::{OgError, OgResult},
    text::measure::{DeterministicMeasurer, FontSpec, TextMeasurer},
};

/// Weights the card actually uses (description, social, site/title).
const WANTED_WEIGHTS: [u16; 4] = [300, 400, 500, 700];

const BUNDLED_FACES: [&[u8]; 2] = [
    include_bytes!("../../assets/fonts/DejaVuSans.ttf"),
    include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf"),
];

/// One loaded font face.
#[derive(Clone)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
    /// Face index inside a collection file (0 for plain ttf/otf).
    pub index: u32,
    /// Shared font file bytes; cloning a face never copies them.
    pub data: Blob<u8>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Immutable set of faces backing the configured family.
///
/// Loaded once per [`crate::Renderer`] and shared read-only between renders. Each render builds
/// its own [`FontBook`] from it.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    family: String,
    faces: Vec<FontFace>,
}

impl FontLibrary {
    pub fn empty(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            faces: Vec::new(),
        }
    }

    pub fn from_faces(family: impl Into<String>, faces: Vec<FontFace>) -> Self {
        Self {
            family: family.into(),
            faces,
        }
    }

    /// Load configured font files, falling back to the bundled faces and then to installed
    /// system fonts when allowed.
    ///
    /// An unreadable configured file is a config error. Finding no face at all is not: the
    /// library is simply empty and text falls back to deterministic metrics.
    pub fn load(cfg: &FontConfig, assets_root: &Path) -> OgResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        for file in &cfg.files {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                assets_root.join(file)
            };
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read font file '{}'", path.display()))
                .map_err(|e| OgError::config(format!("{e:#}")))?;
            db.load_font_data(bytes);
        }
        if db.faces().next().is_none() && cfg.bundled {
            for face in BUNDLED_FACES {
                db.load_font_data(face.to_vec());
            }
        }
        if db.faces().next().is_none() && cfg.system {
            db.load_system_fonts();
        }

        let faces = select_faces(&db, &cfg.family);
        if faces.is_empty() {
            tracing::warn!(family = %cfg.family, "no usable font faces; using deterministic text metrics");
        } else {
            tracing::debug!(
                family = %cfg.family,
                faces = ?faces.iter().map(|f| (f.family.as_str(), f.weight)).collect::<Vec<_>>(),
                "font library loaded"
            );
        }
        Ok(Self {
            family: cfg.family.clone(),
            faces,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Index of the face whose weight is nearest `weight`; ties go to the heavier face.
    pub fn face_for_weight(&self, weight: u16) -> Option<usize> {
        self.faces
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| (f.weight.abs_diff(weight), std::cmp::Reverse(f.weight)))
            .map(|(i, _)| i)
    }
}

fn select_faces(db: &usvg::fontdb::Database, family: &str) -> Vec<FontFace> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    let families = [
        Family::Name(family),
        Family::Name(BUNDLED_FONT_FAMILY),
        Family::SansSerif,
    ];
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for weight in WANTED_WEIGHTS {
        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let Some(id) = db.query(&query).or_else(|| db.faces().next().map(|f| f.id)) else {
            continue;
        };
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);

        let Some(info) = db.face(id) else {
            continue;
        };
        let Some((data, index)) = db.with_face_data(id, |data, index| (data.to_vec(), index))
        else {
            continue;
        };
        out.push(FontFace {
            family: info
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| family.to_string()),
            weight: info.weight.0,
            index,
            data: Blob::from(data),
        });
    }
    out.sort_by_key(|f| f.weight);
    out
}

struct FaceContext {
    font_ctx: parley::FontContext,
    family_name: String,
}

/// Glyph positioned relative to the top-left corner of its line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A single shaped line ready to be painted with face `face` of the library.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    pub face: usize,
    pub size_px: f32,
    pub width: f32,
    pub glyphs: Vec<ShapedGlyph>,
}

/// Per-render parley state over a [`FontLibrary`].
///
/// Every face is registered in its own font context so the face picked for a weight is exactly
/// the face whose bytes get painted.
pub struct FontBook {
    family: String,
    library: FontLibrary,
    faces: Vec<FaceContext>,
    layout_ctx: parley::LayoutContext<()>,
}

impl FontBook {
    pub fn new(library: &FontLibrary) -> OgResult<Self> {
        let mut faces = Vec::with_capacity(library.faces.len());
        for face in &library.faces {
            let mut font_ctx = parley::FontContext::default();
            let families = font_ctx
                .collection
                .register_fonts(face.data.clone(), None);
            let family_id = families
                .iter()
                .find(|(_, infos)| infos.iter().any(|i| i.index() == face.index))
                .or_else(|| families.first())
                .map(|(id, _)| *id)
                .ok_or_else(|| {
                    OgError::asset(format!("no font families registered for '{}'", face.family))
                })?;
            let family_name = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| OgError::asset("registered font family has no name"))?
                .to_string();
            faces.push(FaceContext {
                font_ctx,
                family_name,
            });
        }
        Ok(Self {
            family: library.family.clone(),
            library: library.clone(),
            faces,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    fn layout(&mut self, text: &str, font: FontSpec) -> Option<(usize, parley::Layout<()>)> {
        let face_idx = self.library.face_for_weight(font.weight)?;
        let face = self.faces.get_mut(face_idx)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut face.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(font.weight)),
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some((face_idx, layout))
    }

    /// Shape `text` as one unbroken line. Glyph `y` is the baseline, measured from the top of the
    /// line.
    pub fn shape_line(&mut self, text: &str, font: FontSpec) -> Option<ShapedLine> {
        let (face, layout) = self.layout(text, font)?;
        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| ShapedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        Some(ShapedLine {
            face,
            size_px: font.size_px,
            width: layout.width(),
            glyphs,
        })
    }
}

impl TextMeasurer for FontBook {
    fn family(&self) -> &str {
        &self.family
    }

    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout(text, font)
            .map(|(_, layout)| f64::from(layout.width()))
            .unwrap_or(0.0)
    }
}

/// The measurer a render uses: shaped when faces exist, deterministic otherwise.
pub enum TextEngine {
    Shaped(Box<FontBook>),
    Fallback(DeterministicMeasurer),
}

impl TextEngine {
    pub fn for_library(library: &FontLibrary) -> Self {
        if library.is_empty() {
            return Self::Fallback(DeterministicMeasurer::new(library.family()));
        }
        match FontBook::new(library) {
            Ok(book) => Self::Shaped(Box::new(book)),
            Err(err) => {
                tracing::warn!(error = %err, "font registration failed; using deterministic text metrics");
                Self::Fallback(DeterministicMeasurer::new(library.family()))
            }
        }
    }

    pub fn font_book_mut(&mut self) -> Option<&mut FontBook> {
        match self {
            Self::Shaped(book) => Some(book.as_mut()),
            Self::Fallback(_) => None,
        }
    }

    pub fn is_shaped(&self) -> bool {
        matches!(self, Self::Shaped(_))
    }
}

impl TextMeasurer for TextEngine {
    fn family(&self) -> &str {
        match self {
            Self::Shaped(b) => b.family(),
            Self::Fallback(m) => m.family(),
        }
    }

    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        match self {
            Self::Shaped(b) => b.measure(text, font),
            Self::Fallback(m) => m.measure(text, font),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
