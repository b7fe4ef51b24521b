use std::path::PathBuf;

use anyhow::Context as _;
use bannerforge::{BannerPipeline, DirFontProvider, PipelineConfig, Preset};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bannerforge", version)]
struct Cli {
    /// Log every pipeline stage.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a photo into a 2000x133 PNG banner.
    Render(RenderArgs),
    /// Print the effective pipeline configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Pipeline configuration JSON; missing fields fall back to the classic banner.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named preset: classic, overlay, underlay, auto-fit, tiled, keyed.
    #[arg(long)]
    preset: Option<Preset>,

    /// Replace the ad text.
    #[arg(long)]
    text: Option<String>,

    /// Replace the font file name.
    #[arg(long)]
    font: Option<String>,

    /// Extra directory searched for fonts before the system ones. Repeatable.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Named preset to print.
    #[arg(long, default_value = "classic")]
    preset: Preset,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(args: &RenderArgs) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => args.preset.unwrap_or(Preset::Classic).config(),
    };
    if let Some(text) = &args.text {
        cfg.text.text = text.clone();
    }
    if let Some(font) = &args.font {
        cfg.text.font = font.clone();
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let fonts = DirFontProvider::with_system_dirs(args.font_dirs.iter().cloned());
    let pipeline = BannerPipeline::new(cfg, Box::new(fonts)).context("invalid configuration")?;

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    let (png, out) = pipeline
        .render_bytes(&bytes)
        .with_context(|| format!("render banner from '{}'", args.in_path.display()))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    for warning in &out.warnings {
        eprintln!("warning: {warning}");
    }
    match &out.font_used {
        Some(font) => eprintln!("wrote {} (font: {font})", args.out.display()),
        None => eprintln!("wrote {}", args.out.display()),
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let json = args.preset.config().to_json_pretty()?;
    println!("{json}");
    Ok(())
}
