use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use reelstitch::subtitle::{AsrTranscript, CueGranularity};

#[derive(Parser, Debug)]
#[command(name = "reelstitch", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render and mux a reel (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the cue/image pairing and frame budget as JSON.
    Plan(PlanArgs),
    /// Render a single frame of one scene as a PNG.
    Frame(FrameArgs),
    /// Convert a transcript JSON into an SRT file.
    Srt(SrtArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Directory holding `<prefix>_<n>` scene images.
    #[arg(long)]
    images: PathBuf,

    /// Subtitle file (`.srt`, or transcript `.json`).
    #[arg(long)]
    subtitles: PathBuf,

    /// Optional JSON configuration; omitted fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Caption font file; overrides `caption.font_path` from the configuration.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Narration audio.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per parallel batch.
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,

    /// Keep the silent intermediate next to the output.
    #[arg(long)]
    keep_intermediate: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Scene (cue) position, 0-based.
    #[arg(long)]
    scene: usize,

    /// Frame within the scene, 0-based.
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SrtArgs {
    /// Input transcript JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SRT path.
    #[arg(long)]
    out: PathBuf,

    /// One cue per sentence or per word.
    #[arg(long, value_enum, default_value_t = GranularityChoice::Sentence)]
    granularity: GranularityChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GranularityChoice {
    Sentence,
    Word,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Srt(args) => cmd_srt(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(input: &InputArgs) -> anyhow::Result<reelstitch::ReelConfig> {
    let mut cfg = match input.config.as_deref() {
        Some(p) => reelstitch::ReelConfig::from_path(p)?,
        None => reelstitch::ReelConfig::default(),
    };
    if let Some(font) = &input.font {
        cfg.caption.font_path = font.clone();
    }
    Ok(cfg)
}

fn asset_set(input: &InputArgs, audio: PathBuf) -> anyhow::Result<reelstitch::AssetSet> {
    let assets = reelstitch::AssetSet::discover(&input.images, audio, &input.subtitles)
        .with_context(|| format!("collect scene images from '{}'", input.images.display()))?;
    Ok(assets)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.input)?;
    cfg.keep_intermediate |= args.keep_intermediate;

    let assets = asset_set(&args.input, args.audio)?;
    let pipeline = reelstitch::ReelPipeline::new(cfg)?.with_threading(reelstitch::RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    });

    let out = pipeline.run(&assets, &args.out)?;
    eprintln!(
        "wrote {} ({} cues, {} frames)",
        out.path.display(),
        out.stats.cues,
        out.stats.frames
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let assets = asset_set(&args.input, PathBuf::new())?;
    let plan = reelstitch::ReelPipeline::new(cfg)?.plan(&assets)?;
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let assets = asset_set(&args.input, PathBuf::new())?;
    let plan = reelstitch::ReelPipeline::new(cfg.clone())?.plan(&assets)?;
    let scene = plan.scenes.get(args.scene).with_context(|| {
        format!(
            "scene {} out of range (plan has {})",
            args.scene,
            plan.scenes.len()
        )
    })?;

    let mut renderer = reelstitch::render::FrameRenderer::new(&cfg)?;
    let frame = renderer.prepare(scene)?.render_frame(args.frame)?;

    reelstitch::encode::ensure_parent_dir(&args.out)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_srt(args: SrtArgs) -> anyhow::Result<()> {
    let granularity = match args.granularity {
        GranularityChoice::Sentence => CueGranularity::Sentence,
        GranularityChoice::Word => CueGranularity::Word,
    };
    let cues = AsrTranscript::from_path(&args.in_path)?.to_cues(granularity)?;
    reelstitch::subtitle::write_srt(&cues, &args.out)?;

    eprintln!("wrote {} ({} cues)", args.out.display(), cues.len());
    Ok(())
}
