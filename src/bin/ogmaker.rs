use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ogmaker::{FontConfig, ImageRequest, ImageRequestInput, OgConfig, OutputFormat, Renderer};

#[derive(Parser, Debug)]
#[command(name = "ogmaker", version)]
struct Cli {
    /// Renderer config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore configured and system fonts; measure with fixed per-character advances.
    #[arg(long, global = true, default_value_t = false)]
    no_fonts: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single card.
    Render(RenderArgs),
    /// Print the computed layout boxes as JSON.
    Layout(LayoutArgs),
    /// Render every request of a JSON array in parallel.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Form-urlencoded request (`title=..&siteName=..`). Explicit flags win over its fields.
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    social: Option<String>,

    #[arg(long)]
    site_name: Option<String>,

    /// Avatar: http(s) URL, data: URI, file:// URL or a path.
    #[arg(long)]
    image_url: Option<String>,
}

impl RequestArgs {
    fn into_request(self) -> ImageRequest {
        let mut input = self
            .query
            .as_deref()
            .map(ImageRequestInput::from_query)
            .unwrap_or_default();
        if self.title.is_some() {
            input.title = self.title;
        }
        if self.description.is_some() {
            input.description = self.description;
        }
        if self.social.is_some() {
            input.social = self.social;
        }
        if self.site_name.is_some() {
            input.site_name = self.site_name;
        }
        if self.image_url.is_some() {
            input.image_url = self.image_url;
        }
        input.into_request()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Png,
    Webp,
    Svg,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }

    fn raster(self) -> Option<OutputFormat> {
        match self {
            Self::Png => Some(OutputFormat::Png),
            Self::Webp => Some(OutputFormat::WebP),
            Self::Svg => None,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Output path. Defaults to `og-image-{slug}.{ext}` in the working directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    request: RequestArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON array of requests (`title`, `description`, `social`, `siteName`, `imageUrl`).
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.no_fonts)?;
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Layout(args) => cmd_layout(config, args),
        Command::Batch(args) => cmd_batch(config, args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, no_fonts: bool) -> anyhow::Result<OgConfig> {
    let mut config = match path {
        Some(p) => {
            OgConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))?
        }
        None => OgConfig::default(),
    }
    .apply_env();
    if no_fonts {
        config.fonts = FontConfig::disabled();
    }
    Ok(config)
}

fn default_file_name(request: &ImageRequest, format: Format) -> String {
    let slug = request.slug();
    let slug = if slug.is_empty() { "card" } else { slug.as_str() };
    format!("og-image-{slug}.{}", format.extension())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn render_one(
    renderer: &Renderer,
    request: &ImageRequest,
    format: Format,
) -> anyhow::Result<Vec<u8>> {
    Ok(match format.raster() {
        Some(f) => renderer.render(request, f)?.bytes,
        None => renderer.render_svg(request)?.into_bytes(),
    })
}

fn cmd_render(config: OgConfig, args: RenderArgs) -> anyhow::Result<()> {
    let renderer = Renderer::new(config)?;
    let request = args.request.into_request();
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(default_file_name(&request, args.format)));
    let bytes = render_one(&renderer, &request, args.format)?;
    write_output(&out, &bytes)
}

fn cmd_layout(config: OgConfig, args: LayoutArgs) -> anyhow::Result<()> {
    let renderer = Renderer::new(config)?;
    let layout = renderer.layout(&args.request.into_request());
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}

fn cmd_batch(config: OgConfig, args: BatchArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read requests '{}'", args.in_path.display()))?;
    let inputs: Vec<ImageRequestInput> = serde_json::from_str(&text)
        .with_context(|| format!("parse requests '{}'", args.in_path.display()))?;
    let requests: Vec<ImageRequest> = inputs.into_iter().map(ImageRequest::from).collect();
    let renderer = Renderer::new(config)?;

    let results: Vec<anyhow::Result<Vec<u8>>> = match args.format.raster() {
        Some(f) => renderer
            .render_batch(&requests, f, args.threads)?
            .into_iter()
            .map(|r| r.map(|img| img.bytes).map_err(anyhow::Error::from))
            .collect(),
        None => requests
            .iter()
            .map(|req| render_one(&renderer, req, Format::Svg))
            .collect(),
    };

    let mut failed = 0usize;
    for (i, (request, result)) in requests.iter().zip(results).enumerate() {
        // Index prefix keeps identical titles from overwriting each other.
        let name = format!("{i:03}-{}", default_file_name(request, args.format));
        match result {
            Ok(bytes) => write_output(&args.out_dir.join(name), &bytes)?,
            Err(e) => {
                failed += 1;
                tracing::error!(index = i, error = %e, "render failed");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} requests failed", requests.len());
    }
    Ok(())
}
