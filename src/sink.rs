//! Frame persistence.
//!
//! Frames are written under zero-padded names so that lexicographic order
//! equals step order, inside a scratch directory owned by exactly one
//! pipeline run. [`ScratchDir`] is the guaranteed-release scope around that
//! directory: contents are wiped when the run starts and the directory is
//! removed again when the guard drops, on success and failure alike.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::foundation::error::{TilesortError, TilesortResult};

/// Zero-padding width of frame file names (`0000000042.jpg`).
pub const FRAME_NAME_WIDTH: usize = 10;

/// Sink contract for consuming composed frames in step order.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices
/// and sinks must reject anything else; a dropped or reordered frame would
/// silently corrupt the encoded video.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self) -> TilesortResult<()>;
    /// Persist one frame at the given zero-based step index.
    fn push_frame(&mut self, idx: u64, frame: &RgbImage) -> TilesortResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TilesortResult<()>;
}

/// Writes frames as zero-padded JPEGs into a directory.
pub struct JpegDirSink {
    dir: PathBuf,
    last_idx: Option<u64>,
}

impl JpegDirSink {
    /// Create a sink writing into `dir` (typically a [`ScratchDir`] path).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_idx: None,
        }
    }

    /// File name for a step index.
    pub fn frame_name(idx: u64) -> String {
        format!("{idx:0width$}.jpg", width = FRAME_NAME_WIDTH)
    }
}

impl FrameSink for JpegDirSink {
    fn begin(&mut self) -> TilesortResult<()> {
        if !self.dir.is_dir() {
            return Err(TilesortError::storage(format!(
                "frame directory '{}' does not exist",
                self.dir.display()
            )));
        }
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbImage) -> TilesortResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(TilesortError::validation(
                "frame sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        let path = self.dir.join(Self::frame_name(idx));
        frame
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|e| {
                TilesortError::storage(format!("failed to write frame '{}': {e}", path.display()))
            })?;
        Ok(())
    }

    fn end(&mut self) -> TilesortResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Frames in step order.
    frames: Vec<(u64, RgbImage)>,
    last_idx: Option<u64>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u64, RgbImage)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self) -> TilesortResult<()> {
        self.frames.clear();
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbImage) -> TilesortResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(TilesortError::validation(
                "frame sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TilesortResult<()> {
        Ok(())
    }
}

/// Owns the per-run frame directory.
///
/// Creation wipes any stale contents from a previous run; dropping the guard
/// removes the directory in its entirety. Cleanup therefore runs on every
/// exit path, including error propagation and panic unwind.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create (or re-create, empty) the scratch directory at `path`.
    pub fn create(path: impl Into<PathBuf>) -> TilesortResult<Self> {
        let path = path.into();
        if path.exists() {
            fs::remove_dir_all(&path).map_err(|e| {
                TilesortError::storage(format!(
                    "failed to clear scratch directory '{}': {e}",
                    path.display()
                ))
            })?;
        }
        fs::create_dir_all(&path).map_err(|e| {
            TilesortError::storage(format!(
                "failed to create scratch directory '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self { path })
    }

    /// Location of the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_tmp(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "tilesort_{tag}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ))
    }

    #[test]
    fn frame_names_sort_lexicographically() {
        let a = JpegDirSink::frame_name(9);
        let b = JpegDirSink::frame_name(10);
        let c = JpegDirSink::frame_name(100);
        assert_eq!(a, "0000000009.jpg");
        assert!(a < b && b < c);
    }

    #[test]
    fn in_memory_sink_rejects_out_of_order_pushes() {
        let frame = RgbImage::new(2, 2);
        let mut sink = InMemorySink::new();
        sink.begin().unwrap();
        sink.push_frame(0, &frame).unwrap();
        sink.push_frame(1, &frame).unwrap();
        assert!(sink.push_frame(1, &frame).is_err());
        assert!(sink.push_frame(0, &frame).is_err());
        assert_eq!(sink.frames().len(), 2);
    }

    #[test]
    fn scratch_dir_wipes_stale_contents_and_cleans_up_on_drop() {
        let path = unique_tmp("scratch");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("stale.jpg"), b"old").unwrap();

        let scratch = ScratchDir::create(&path).unwrap();
        assert!(scratch.path().is_dir());
        assert!(!scratch.path().join("stale.jpg").exists());
        fs::write(scratch.path().join("0000000000.jpg"), b"frame").unwrap();

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn jpeg_sink_writes_zero_padded_frames() {
        let scratch = ScratchDir::create(unique_tmp("jpegsink")).unwrap();
        let mut sink = JpegDirSink::new(scratch.path());
        sink.begin().unwrap();
        let frame = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        sink.push_frame(0, &frame).unwrap();
        sink.push_frame(1, &frame).unwrap();
        sink.end().unwrap();
        assert!(scratch.path().join("0000000000.jpg").is_file());
        assert!(scratch.path().join("0000000001.jpg").is_file());
    }
}
