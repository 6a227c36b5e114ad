//! Tilesort turns comparison sorts into video.
//!
//! A source image is cut into a raster-ordered grid of square tiles, the tile
//! indices are shuffled into a random permutation, and a chosen sorting
//! algorithm puts them back in order. Every algorithmic checkpoint yields a
//! snapshot of the permutation; each snapshot is composed into one full frame
//! and persisted to a scratch directory, and the ordered frame sequence is
//! handed to the system `ffmpeg` for encoding.
//!
//! The pipeline is strictly pull-based and single-threaded:
//!
//! - [`TileGrid`] splits the image and composes frames
//! - [`SortEngine`] produces a lazy [`StepSequence`] of permutation snapshots
//! - a [`FrameSink`] persists frames in strictly increasing order
//! - a [`VideoEncoder`] consumes the on-disk frame sequence
//!
//! [`pipeline::run`] wires these together for the CLI.
#![forbid(unsafe_code)]

mod foundation;

/// Video encoder backends (system `ffmpeg`).
pub mod encode;
/// End-to-end driver: shuffle, sort, compose, persist, encode.
pub mod pipeline;
/// Frame persistence and the scratch-directory lifecycle.
pub mod sink;
/// The six sorting step generators.
pub mod sort;
/// Tile extraction and frame composition.
pub mod tile;

pub use crate::foundation::error::{TilesortError, TilesortResult};

pub use crate::encode::{EncodeOpts, EncoderKind, VideoEncoder, create_encoder};
pub use crate::pipeline::{PipelineOpts, PipelineStats, drive, run, shuffled_permutation};
pub use crate::sink::{FrameSink, InMemorySink, JpegDirSink, ScratchDir};
pub use crate::sort::{Algorithm, SortEngine, StepSequence};
pub use crate::tile::{TileGrid, compose_frame};
