//! End-to-end driver.
//!
//! [`run`] is the single synchronous loop behind the CLI: load the image,
//! split it into tiles, shuffle the tile indices, pull snapshots from the
//! sort engine one at a time, compose and persist each frame before the next
//! pull, then hand the finished frame sequence to the encoder. Memory stays
//! bounded to one tile set, one permutation array, and one in-flight frame;
//! the engine cannot race ahead of the renderer.

use std::path::{Path, PathBuf};

use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;

use crate::encode::{EncodeOpts, EncoderKind, create_encoder};
use crate::foundation::error::{TilesortError, TilesortResult};
use crate::sink::{FrameSink, JpegDirSink, ScratchDir};
use crate::sort::{Algorithm, SortEngine, StepSequence};
use crate::tile::TileGrid;

/// Configuration for one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Tile edge length in pixels.
    pub split: u32,
    /// Sorting variant to visualize.
    pub algorithm: Algorithm,
    /// Encoder backend consuming the frame sequence.
    pub encoder: EncoderKind,
    /// Frames per second of the encoded video.
    pub fps: u32,
    /// Scratch directory for intermediate frames; wiped at run start and
    /// removed on every exit path.
    pub work_dir: PathBuf,
    /// Output video path; defaults to `<algorithm>_sort.mp4`.
    pub out_path: Option<PathBuf>,
    /// Seed for the initial shuffle; random when unset.
    pub seed: Option<u64>,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            split: 50,
            algorithm: Algorithm::Bubble,
            encoder: EncoderKind::Glob,
            fps: 30,
            work_dir: PathBuf::from("sv"),
            out_path: None,
            seed: None,
        }
    }
}

/// Counters reported by a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Tiles cut from the source image (N).
    pub tiles: usize,
    /// Frames composed and persisted (one per snapshot).
    pub frames: u64,
}

/// A shuffled permutation of `0..len`.
///
/// Shuffling happens exactly once, before the sort engine is constructed; the
/// engine itself introduces no randomness. A seed makes the run reproducible.
pub fn shuffled_permutation(len: usize, seed: Option<u64>) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..len).collect();
    match seed {
        Some(seed) => perm.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => perm.shuffle(&mut rand::thread_rng()),
    }
    perm
}

/// The synchronous pull loop: one snapshot, one composed frame, one persisted
/// file, in lockstep until the sequence is exhausted.
///
/// Exposed separately from [`run`] so tests can drive it against an
/// [`InMemorySink`](crate::sink::InMemorySink).
pub fn drive(
    grid: &TileGrid,
    mut steps: Box<dyn StepSequence>,
    sink: &mut dyn FrameSink,
) -> TilesortResult<u64> {
    sink.begin()?;
    let mut idx = 0u64;
    while let Some(snapshot) = steps.next_step() {
        let frame = grid.compose(snapshot)?;
        sink.push_frame(idx, &frame)?;
        idx += 1;
    }
    sink.end()?;
    Ok(idx)
}

/// Run the whole pipeline: image in, video out.
///
/// Input and configuration errors surface before any frame is produced. Once
/// frames are being written, any failure (storage, encoder) aborts the run;
/// the scratch directory is removed on every exit path.
#[tracing::instrument(skip(opts), fields(algorithm = %opts.algorithm))]
pub fn run(image_path: &Path, opts: &PipelineOpts) -> TilesortResult<PipelineStats> {
    let image = image::open(image_path)
        .map_err(|e| {
            TilesortError::invalid_image(format!(
                "failed to open '{}': {e}",
                image_path.display()
            ))
        })?
        .to_rgb8();

    let grid = TileGrid::split(&image, opts.split)?;
    tracing::debug!(
        tiles = grid.len(),
        cols = grid.cols(),
        rows = grid.rows(),
        "split image into tiles"
    );

    let engine = SortEngine::new(shuffled_permutation(grid.len(), opts.seed))?;

    let scratch = ScratchDir::create(&opts.work_dir)?;
    let mut sink = JpegDirSink::new(scratch.path());
    let frames = drive(&grid, engine.run(opts.algorithm), &mut sink)?;
    tracing::debug!(frames, "persisted frame sequence");

    let out_path = opts
        .out_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_sort.mp4", opts.algorithm.name())));
    let encode_opts = EncodeOpts {
        out_path,
        fps: opts.fps,
        overwrite: true,
    };
    let mut encoder = create_encoder(opts.encoder, encode_opts);
    encoder.encode(scratch.path())?;

    Ok(PipelineStats {
        tiles: grid.len(),
        frames,
    })
    // `scratch` drops here; the directory is also removed when any `?` above
    // propagates an error.
}
