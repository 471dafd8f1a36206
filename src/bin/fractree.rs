use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fractree::{
    CaptureController, CaptureOutcome, CaptureSettings, FfmpegSinkFactory, FixedRateScheduler,
    LayerView, Orchestrator, ParamStore, RetainedSurface, Rgb8, Studio, Style, VideoCapture,
    params::registry::default_parameters,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fractree", version, about = "Radial fractree logo generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the parameters with their bounds and defaults.
    Params(ParamsArgs),
    /// Render all four views once as SVG (optionally PNG and JSON).
    Frame(FrameArgs),
    /// Animate by velocities and record one view to MP4 (requires `ffmpeg` on PATH).
    Record(RecordArgs),
}

#[derive(Parser, Debug)]
struct ParamsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct LookArgs {
    /// Parameter value, `id=value`. Repeatable.
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Front ring color, `#rrggbb`.
    #[arg(long)]
    front_color: Option<Rgb8>,

    /// Back ring color, `#rrggbb`.
    #[arg(long)]
    back_color: Option<Rgb8>,

    /// Swap which side each ring is revealed on.
    #[arg(long)]
    inverted: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Output directory.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    #[command(flatten)]
    look: LookArgs,

    /// Also write a PNG per view.
    #[arg(long)]
    png: bool,

    /// PNG scale relative to the 400x400 view.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Also write each drawing tree as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Output directory for the MP4.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// View to record: `merged` or `aux`.
    #[arg(long, default_value = "merged")]
    view: LayerView,

    /// Length of the recording.
    #[arg(long, default_value_t = 4.0)]
    seconds: f64,

    /// Animation frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Capture frame rate (defaults to FRACTREE_CAPTURE_FPS or 30).
    #[arg(long)]
    capture_fps: Option<u32>,

    #[command(flatten)]
    look: LookArgs,

    /// Parameter velocity in units per second, `id=value`. Repeatable.
    #[arg(long = "vel", value_name = "ID=VALUE")]
    vel: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Params(args) => cmd_params(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Record(args) => cmd_record(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn split_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(id, value)| (id.trim(), value.trim()))
        .with_context(|| format!("expected ID=VALUE, got '{raw}'"))
}

fn build_store(look: &LookArgs) -> anyhow::Result<ParamStore> {
    let mut store = ParamStore::with_defaults();
    for raw in &look.set {
        let (id, value) = split_assignment(raw)?;
        store
            .set_str(id, value)
            .with_context(|| format!("--set {raw}"))?;
    }
    Ok(store)
}

fn build_style(look: &LookArgs) -> Style {
    let defaults = Style::default();
    Style {
        front_color: look.front_color.unwrap_or(defaults.front_color),
        back_color: look.back_color.unwrap_or(defaults.back_color),
        inverted: look.inverted,
    }
}

fn cmd_params(args: ParamsArgs) -> anyhow::Result<()> {
    let params = default_parameters();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }
    println!("{:<10} {:>6} {:>6} {:>8}", "id", "min", "max", "default");
    for p in &params {
        println!("{:<10} {:>6} {:>6} {:>8}", p.id, p.min, p.max, p.default);
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let store = build_store(&args.look)?;
    let mut orchestrator = Orchestrator::new(store, build_style(&args.look), RetainedSurface::new());
    orchestrator.render();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let raster = CaptureSettings {
        scale: args.scale,
        ..CaptureSettings::default()
    };
    if args.png {
        raster.validate()?;
    }

    for tree in orchestrator.surface().views() {
        tree.validate()?;
        let stem = format!("fractree_{}", tree.view.element_id());

        let svg_path = args.out_dir.join(format!("{stem}.svg"));
        write_file(&svg_path, tree.to_svg().as_bytes())?;

        if args.json {
            let json_path = args.out_dir.join(format!("{stem}.json"));
            write_file(&json_path, tree.to_json_pretty()?.as_bytes())?;
        }

        if args.png {
            let frame = fractree::capture::raster::rasterize_tree(tree, &raster)?;
            let png_path = args.out_dir.join(format!("{stem}.png"));
            // Opaque background, so premultiplied and straight alpha agree.
            image::save_buffer_with_format(
                &png_path,
                &frame.data,
                frame.width,
                frame.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .with_context(|| format!("write png '{}'", png_path.display()))?;
            eprintln!("wrote {}", png_path.display());
        }
    }

    for (id, label) in orchestrator.labels() {
        tracing::debug!(id = %id, value = %label, "parameter");
    }
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        anyhow::bail!("--seconds must be > 0");
    }

    let mut settings = CaptureSettings::from_env()?;
    if let Some(fps) = args.capture_fps {
        settings.fps = fps;
    }
    settings.validate()?;

    let mut store = build_store(&args.look)?;
    for raw in &args.vel {
        let (id, value) = split_assignment(raw)?;
        store
            .set_velocity_str(id, value)
            .with_context(|| format!("--vel {raw}"))?;
    }

    let backend = VideoCapture::new(settings, &args.out_dir, FfmpegSinkFactory::default())?;
    let orchestrator = Orchestrator::new(store, build_style(&args.look), RetainedSurface::new())
        .with_capture(CaptureController::new(Box::new(backend)));
    let mut studio = Studio::new(orchestrator, FixedRateScheduler::new(args.fps));

    match studio.start_capture(args.view) {
        CaptureOutcome::Started(_) => {}
        CaptureOutcome::Rejected(notice) => anyhow::bail!("{notice}"),
        other => anyhow::bail!("unexpected capture outcome: {other:?}"),
    }

    let total = (args.seconds * f64::from(args.fps)).ceil() as u64;
    studio.play();
    let mut interrupted = None;
    while studio.scheduler().frame() < total {
        if !studio.advance_frame() {
            break;
        }
        interrupted = studio.take_interrupted_capture();
        if interrupted.is_some() {
            break;
        }
    }

    let outcome = studio.shutdown();
    match interrupted.unwrap_or(outcome) {
        CaptureOutcome::Stopped {
            download: Some(download),
            ..
        } => {
            eprintln!(
                "wrote {} ({} frames)",
                download.path.display(),
                download.frames
            );
            Ok(())
        }
        CaptureOutcome::Stopped {
            notice: Some(notice),
            download,
            ..
        } => {
            if let Some(download) = download {
                eprintln!(
                    "partial recording {} ({} frames)",
                    download.path.display(),
                    download.frames
                );
            }
            anyhow::bail!("{notice}")
        }
        _ => anyhow::bail!("no recorded data available"),
    }
}
