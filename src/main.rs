use anyhow::Context;
use blockview::app::{App, ViewSettings};
use blockview::config::{load_config, Config};
use blockview::render::{Filter, HAlign, Padding, Rgb, Scale, SizeRequest, VAlign};
use blockview::terminal::{self, TerminalSupport};
use blockview::BlockviewError;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// Blockview - view images in the terminal with truecolor half blocks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image file, directory of images, or http(s) URL
    source: String,

    /// Config file path (default: ~/.config/blockview/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Width in columns; height follows the aspect ratio
    #[arg(short, long, value_name = "COLS")]
    width: Option<u32>,

    /// Height in lines; width follows the aspect ratio
    #[arg(short = 'H', long, value_name = "LINES")]
    height: Option<u32>,

    /// Scale factors in (0, 1]: one value for both axes, or "SX,SY"
    #[arg(long, value_name = "SX[,SY]")]
    scale: Option<String>,

    /// Frame of an animated image to show (0-based)
    #[arg(long, value_name = "N")]
    frame: Option<usize>,

    /// Draw transparent pixels as black instead of the terminal background
    #[arg(long)]
    no_alpha: bool,

    /// Blend transparent pixels over this color (#rrggbb)
    #[arg(long, value_name = "COLOR", conflicts_with = "no_alpha")]
    background: Option<String>,

    /// Alpha values below this (0-255) count as transparent
    #[arg(long, value_name = "N")]
    alpha_threshold: Option<u8>,

    /// Pad the image with blank cells up to this many columns
    #[arg(long, value_name = "COLS", default_value_t = 0)]
    pad_width: u32,

    /// Pad the image with blank lines up to this many lines
    #[arg(long, value_name = "LINES", default_value_t = 0)]
    pad_height: u32,

    /// Horizontal placement inside the padding: left, center, right
    #[arg(long, value_name = "ALIGN", default_value = "center")]
    h_align: HAlign,

    /// Vertical placement inside the padding: top, middle, bottom
    #[arg(long, value_name = "ALIGN", default_value = "middle")]
    v_align: VAlign,

    /// Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3
    #[arg(long, value_name = "NAME")]
    filter: Option<String>,

    /// Render images larger than the configured pixel limit
    #[arg(short, long)]
    force: bool,

    /// Include sub-directories when showing a directory
    #[arg(short, long)]
    recursive: bool,

    /// Include hidden files and directories
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Fit the terminal width only and let tall images scroll
    #[arg(long)]
    scroll: bool,

    /// Fail instead of warning when the terminal does not report truecolor
    #[arg(long)]
    require_truecolor: bool,

    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit code for bad arguments or configuration
const USAGE_ERROR: i32 = 2;

/// Parse "SX" or "SX,SY"
fn parse_scale(value: &str) -> blockview::Result<Scale> {
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| BlockviewError::invalid_scale(format!("'{}' is not a number", s)))
    };

    match value.split_once(',') {
        Some((x, y)) => Scale::new(parse(x)?, parse(y)?),
        None => Scale::uniform(parse(value)?),
    }
}

/// Fold command-line overrides into the loaded config
fn apply_overrides(config: &mut Config, args: &Args) -> blockview::Result<()> {
    if let Some(scale) = &args.scale {
        let scale = parse_scale(scale)?;
        config.render.scale = [scale.x, scale.y];
    }
    if let Some(filter) = &args.filter {
        let filter: Filter = filter.parse().map_err(BlockviewError::config)?;
        config.render.filter = filter.name().to_string();
    }
    if args.no_alpha {
        config.render.alpha = false;
    }
    if let Some(background) = &args.background {
        let color: Rgb = background.parse().map_err(BlockviewError::config)?;
        config.render.background = Some(color.to_string());
    }
    if let Some(threshold) = args.alpha_threshold {
        config.render.alpha_threshold = threshold;
    }
    if args.recursive {
        config.viewer.recursive = true;
    }
    if args.all {
        config.viewer.show_hidden = true;
    }
    config.validate()
}

/// Exit status for a failed run: usage errors anywhere in the chain win
fn exit_code(err: &anyhow::Error) -> i32 {
    let usage = err
        .chain()
        .any(|cause| cause.downcast_ref::<BlockviewError>().is_some_and(BlockviewError::is_usage_error));
    if usage { USAGE_ERROR } else { 1 }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.clone())?;
    apply_overrides(&mut config, &args)?;

    let support = TerminalSupport::from_env();
    let settings = ViewSettings {
        request: SizeRequest {
            width: args.width,
            height: args.height,
        },
        frame: args.frame,
        force: args.force,
        scroll: args.scroll,
        padding: Padding {
            width: args.pad_width,
            height: args.pad_height,
            h_align: args.h_align,
            v_align: args.v_align,
        },
        require_truecolor: args.require_truecolor,
    };
    let app = App::new(config, support, settings, terminal::size_or_default())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.show(&args.source, &mut out)
        .await
        .with_context(|| format!("Failed to show {}", args.source))?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::info!("Starting blockview");
    if let Some(ref config_path) = args.config {
        log::info!("Using config file: {}", config_path.display());
    }

    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        std::process::exit(exit_code(&e));
    }
}
