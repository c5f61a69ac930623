use rayon::prelude::*;

use crate::{
    assets::avatar::{AvatarImage, AvatarResolver},
    compose::plan::{DrawPlan, build_draw_plan},
    config::OgConfig,
    encode::raster::{EncodedImage, OutputFormat, encode},
    foundation::error::{OgError, OgResult},
    layout::engine::{OgLayout, compute_layout},
    render::{backend::execute_plan, cpu::CpuBackend, surface::RasterSurface, svg::SvgBackend},
    request::ImageRequest,
    text::fonts::{FontLibrary, TextEngine},
};

/// Renders Open Graph cards.
///
/// Holds only immutable state (configuration and font bytes); every call builds its own font
/// book, layout, avatar and surface, so one `Renderer` can serve many threads at once.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: OgConfig,
    fonts: FontLibrary,
}

/// Everything one render computes before painting.
struct Prepared {
    engine: TextEngine,
    plan: DrawPlan,
}

impl Renderer {
    /// Validate `config` and load its fonts.
    pub fn new(config: OgConfig) -> OgResult<Self> {
        config.validate()?;
        let fonts = FontLibrary::load(&config.fonts, &config.assets_root)?;
        Ok(Self { config, fonts })
    }

    /// Use an already loaded font library instead of reading `config.fonts`.
    pub fn with_font_library(config: OgConfig, fonts: FontLibrary) -> OgResult<Self> {
        config.validate()?;
        Ok(Self { config, fonts })
    }

    pub fn config(&self) -> &OgConfig {
        &self.config
    }

    pub fn font_library(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Layout only; no avatar IO.
    pub fn layout(&self, request: &ImageRequest) -> OgLayout {
        let mut engine = TextEngine::for_library(&self.fonts);
        compute_layout(request, self.config.canvas, &mut engine)
    }

    /// Layout, resolved avatar and the resulting draw plan.
    pub fn plan(&self, request: &ImageRequest) -> DrawPlan {
        self.prepare(request).plan
    }

    fn prepare(&self, request: &ImageRequest) -> Prepared {
        let mut engine = TextEngine::for_library(&self.fonts);
        let layout = compute_layout(request, self.config.canvas, &mut engine);
        let avatar = self.resolve_avatar(request, &layout);
        let plan = build_draw_plan(&layout, &avatar, &self.config.theme);
        Prepared { engine, plan }
    }

    fn resolve_avatar(&self, request: &ImageRequest, layout: &OgLayout) -> AvatarImage {
        AvatarResolver::new(&self.config, layout.avatar.width).resolve(request.avatar())
    }

    #[tracing::instrument(skip_all, fields(title = %request.title()))]
    pub fn render_surface(&self, request: &ImageRequest) -> OgResult<RasterSurface> {
        let Prepared { mut engine, plan } = self.prepare(request);
        let mut backend = CpuBackend::new(engine.font_book_mut());
        let surface = execute_plan(&mut backend, &plan)?;
        tracing::debug!(ops = plan.ops.len(), "card rendered");
        Ok(surface)
    }

    /// Render and encode one card.
    pub fn render(&self, request: &ImageRequest, format: OutputFormat) -> OgResult<EncodedImage> {
        let surface = self.render_surface(request)?;
        let bytes = encode(&surface, format)?;
        Ok(EncodedImage { bytes, format })
    }

    /// The same card as SVG markup.
    #[tracing::instrument(skip_all, fields(title = %request.title()))]
    pub fn render_svg(&self, request: &ImageRequest) -> OgResult<String> {
        let Prepared { plan, .. } = self.prepare(request);
        let mut backend = SvgBackend::new(self.config.fonts.family.clone());
        execute_plan(&mut backend, &plan)
    }

    /// Render `requests` in parallel; results keep the input order and fail independently.
    ///
    /// `threads` bounds the worker count; `None` uses rayon's global pool.
    #[tracing::instrument(skip_all, fields(n = requests.len()))]
    pub fn render_batch(
        &self,
        requests: &[ImageRequest],
        format: OutputFormat,
        threads: Option<usize>,
    ) -> OgResult<Vec<OgResult<EncodedImage>>> {
        let run = || {
            requests
                .par_iter()
                .map(|req| self.render(req, format))
                .collect::<Vec<_>>()
        };
        match threads {
            None => Ok(run()),
            Some(n) => Ok(build_thread_pool(n)?.install(run)),
        }
    }
}

fn build_thread_pool(threads: usize) -> OgResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(OgError::validation("batch threads must be >= 1 when set"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| OgError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
