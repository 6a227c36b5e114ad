use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tilesort::{Algorithm, EncoderKind, PipelineOpts};

#[derive(Parser, Debug)]
#[command(
    name = "tilesort",
    version,
    about = "Visualize sorting algorithms by shuffling an image's tiles into a video"
)]
struct Cli {
    /// Source image path.
    image: PathBuf,

    /// Tile edge length in pixels.
    #[arg(short, long, default_value_t = 50)]
    split: u32,

    /// Algorithm index: 0 bubble, 1 selection, 2 insertion, 3 merge, 4 quick,
    /// 5 heap.
    #[arg(short, long, default_value_t = 0)]
    algorithm: usize,

    /// Encoder backend consuming the frame sequence.
    #[arg(long = "video-formatter", value_enum, default_value_t = FormatterChoice::Ffmpeg)]
    video_formatter: FormatterChoice,

    /// Output video path (defaults to "<algorithm>_sort.mp4").
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Frames per second of the encoded video.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed for the initial shuffle (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Scratch directory for intermediate frames (wiped each run).
    #[arg(long, default_value = "sv")]
    work_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatterChoice {
    /// One-shot ffmpeg glob encode over the frame directory.
    Ffmpeg,
    /// Frame-by-frame writer streaming raw video into ffmpeg.
    Stream,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Validated before any tile is split or frame written.
    let algorithm = Algorithm::from_index(cli.algorithm)?;
    let encoder = match cli.video_formatter {
        FormatterChoice::Ffmpeg => EncoderKind::Glob,
        FormatterChoice::Stream => EncoderKind::Stream,
    };

    let opts = PipelineOpts {
        split: cli.split,
        algorithm,
        encoder,
        fps: cli.fps,
        work_dir: cli.work_dir,
        out_path: cli.out,
        seed: cli.seed,
    };

    let stats = tilesort::run(&cli.image, &opts)?;

    let out = opts
        .out_path
        .unwrap_or_else(|| PathBuf::from(format!("{algorithm}_sort.mp4")));
    eprintln!(
        "wrote {} ({} tiles, {} frames)",
        out.display(),
        stats.tiles,
        stats.frames
    );
    Ok(())
}
