use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use shotframe::{
    BackgroundSpec, Category, CompositionExporter, EditorParameters, EditorSession, ExportOpts,
    HeightMode, LayoutConfig, NumericField, ParamChange, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "shotframe", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Frame a screenshot and write `edited_screenshot.png`.
    Frame(FrameArgs),
    /// Print the computed layout geometry as JSON.
    Geometry(GeometryArgs),
    /// List the built-in gradient presets.
    Presets,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Screenshot to frame.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory to write into. Defaults to the download directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Device pixels per logical pixel.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    #[command(flatten)]
    look: LookArgs,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Optional screenshot; without it no image rect is computed.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    #[command(flatten)]
    look: LookArgs,
}

#[derive(Args, Debug)]
struct LookArgs {
    /// Start from parameters in a JSON file.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Gradient preset by name (see `presets`).
    #[arg(long, conflicts_with_all = ["background", "wallpaper"])]
    gradient: Option<String>,

    /// CSS background value: `linear-gradient(...)` or `url(...)`.
    #[arg(long, conflicts_with = "wallpaper")]
    background: Option<String>,

    /// Wallpaper image path.
    #[arg(long)]
    wallpaper: Option<PathBuf>,

    #[arg(long, value_enum)]
    category: Option<CategoryChoice>,

    /// Padding, percent of container width.
    #[arg(long)]
    padding: Option<f64>,

    /// Corner radius in px.
    #[arg(long)]
    radius: Option<f64>,

    /// Shadow size in px.
    #[arg(long)]
    shadow: Option<f64>,

    /// Shadow opacity in [0, 1].
    #[arg(long)]
    shadow_intensity: Option<f64>,

    /// Background blur in px.
    #[arg(long)]
    blur: Option<f64>,

    #[arg(long)]
    width_percent: Option<f64>,

    #[arg(long)]
    height_percent: Option<f64>,

    #[arg(long, value_enum, default_value_t = HeightModeChoice::Fixed)]
    height_mode: HeightModeChoice,

    /// Viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x800")]
    viewport: String,

    /// Draw a window title bar over the screenshot.
    #[arg(long)]
    window_chrome: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeightModeChoice {
    Fixed,
    Percent,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryChoice {
    Gradient,
    Macos,
    Stock,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args).await,
        Command::Geometry(args) => cmd_geometry(args).await,
        Command::Presets => {
            for (name, css) in shotframe::GRADIENT_PRESETS {
                println!("{name}\t{css}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let bytes = read_bytes(&args.in_path)?;
    let mut session = session_for(&args.look)?;
    apply_backdrop(&mut session, &args.look)?;
    session
        .load_image(bytes)
        .await
        .with_context(|| format!("load screenshot '{}'", args.in_path.display()))?;
    apply_controls(&mut session, &args.look)?;

    let exporter =
        CompositionExporter::with_opts(ExportOpts::default().with_scale_factor(args.scale))?;
    let image = session.export(&exporter).await.context("export composition")?;

    let out_dir = args
        .out_dir
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = image.save_png(&out_dir)?;
    println!("{}", path.display());
    Ok(())
}

async fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let mut session = session_for(&args.look)?;
    apply_backdrop(&mut session, &args.look)?;
    if let Some(p) = &args.in_path {
        session
            .load_image(read_bytes(p)?)
            .await
            .with_context(|| format!("load screenshot '{}'", p.display()))?;
    }
    apply_controls(&mut session, &args.look)?;
    println!("{}", serde_json::to_string_pretty(session.geometry())?);
    Ok(())
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn session_for(look: &LookArgs) -> anyhow::Result<EditorSession> {
    let mode = match look.height_mode {
        HeightModeChoice::Fixed => HeightMode::Fixed,
        HeightModeChoice::Percent => HeightMode::Percent,
    };
    let viewport = Viewport::parse(&look.viewport)?;
    let session =
        EditorSession::with_viewport(LayoutConfig::default().with_height_mode(mode), viewport);

    match &look.params {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("open params '{}'", path.display()))?;
            let params: EditorParameters = serde_json::from_reader(std::io::BufReader::new(f))
                .with_context(|| "parse params JSON")?;
            Ok(session.with_params(params)?)
        }
        None => Ok(session),
    }
}

/// Category and background go in before the screenshot, so auto-adjust sees the
/// padding range of the category actually in use.
fn apply_backdrop(session: &mut EditorSession, look: &LookArgs) -> anyhow::Result<()> {
    if let Some(c) = look.category {
        session.apply(ParamChange::Category(match c {
            CategoryChoice::Gradient => Category::Gradient,
            CategoryChoice::Macos => Category::MacOsWallpaper,
            CategoryChoice::Stock => Category::StockWallpaper,
        }))?;
    }

    let background = if let Some(name) = &look.gradient {
        let css = shotframe::gradient_preset(name)
            .with_context(|| format!("unknown gradient preset '{name}'"))?;
        Some(BackgroundSpec::Gradient(css.to_string()))
    } else if let Some(css) = &look.background {
        Some(BackgroundSpec::from_css(css))
    } else {
        look.wallpaper
            .as_ref()
            .map(|p| BackgroundSpec::ImageUrl(p.display().to_string()))
    };
    if let Some(spec) = background {
        if look.category.is_none() && matches!(spec, BackgroundSpec::ImageUrl(_)) {
            session.apply(ParamChange::Category(Category::StockWallpaper))?;
        }
        session.apply(ParamChange::Background(spec))?;
    }
    Ok(())
}

/// Explicit numeric flags win over both the params file and auto-adjust.
fn apply_controls(session: &mut EditorSession, look: &LookArgs) -> anyhow::Result<()> {
    let numeric = [
        (NumericField::Padding, look.padding),
        (NumericField::CornerRadius, look.radius),
        (NumericField::ShadowSize, look.shadow),
        (NumericField::ShadowIntensity, look.shadow_intensity),
        (NumericField::BackgroundBlur, look.blur),
        (NumericField::ContainerWidth, look.width_percent),
        (NumericField::ContainerHeight, look.height_percent),
    ];
    for (field, value) in numeric {
        if let Some(value) = value {
            session.apply(ParamChange::Numeric { field, value })?;
        }
    }

    if look.window_chrome {
        session.apply(ParamChange::WindowChrome(true))?;
    }
    Ok(())
}
