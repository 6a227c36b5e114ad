//! Video encoder backends.
//!
//! Encoding is an external collaborator: the pipeline's obligation ends at an
//! ordered, complete, gap-free frame sequence on disk, and an encoder turns
//! that sequence into a video via the system `ffmpeg` binary.

/// `ffmpeg`-based encoders (glob and frame-streaming).
pub mod ffmpeg;

use std::path::{Path, PathBuf};

use crate::foundation::error::TilesortResult;

/// Encoder contract: consume the on-disk frame sequence, produce the video.
pub trait VideoEncoder {
    /// Encode every frame under `frames_dir` (zero-padded `*.jpg`, already in
    /// order) into the configured output file.
    fn encode(&mut self, frames_dir: &Path) -> TilesortResult<()>;
}

/// Available encoder kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderKind {
    /// One-shot `ffmpeg` glob encode over the frame directory (the default).
    Glob,
    /// Frame-by-frame writer: decodes each frame and streams raw video into
    /// `ffmpeg` stdin.
    Stream,
}

/// Options shared by every encoder backend.
#[derive(Clone, Debug)]
pub struct EncodeOpts {
    /// Output video file path.
    pub out_path: PathBuf,
    /// Frames per second of the encoded video.
    pub fps: u32,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl EncodeOpts {
    /// Options for encoding to `out_path` at the default 30 fps.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            fps: 30,
            overwrite: true,
        }
    }
}

/// Create an encoder backend implementation.
pub fn create_encoder(kind: EncoderKind, opts: EncodeOpts) -> Box<dyn VideoEncoder> {
    match kind {
        EncoderKind::Glob => Box::new(ffmpeg::FfmpegGlobEncoder::new(opts)),
        EncoderKind::Stream => Box::new(ffmpeg::FfmpegStreamEncoder::new(opts)),
    }
}
