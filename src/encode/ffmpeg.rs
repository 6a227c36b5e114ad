//! System-`ffmpeg` encoder backends.
//!
//! Both backends require `ffmpeg` on `PATH` and check for it up front.
//! [`FfmpegGlobEncoder`] hands the whole frame directory to one `ffmpeg`
//! invocation via a glob pattern. [`FfmpegStreamEncoder`] decodes the frames
//! itself and streams raw rgb24 into `ffmpeg` stdin, the moral equivalent of
//! a frame-by-frame video writer.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbImage;

use crate::encode::{EncodeOpts, VideoEncoder};
use crate::foundation::error::{TilesortError, TilesortResult};

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn preflight(opts: &EncodeOpts) -> TilesortResult<()> {
    if opts.fps == 0 {
        return Err(TilesortError::config("encoder fps must be non-zero"));
    }
    if !opts.overwrite && opts.out_path.exists() {
        return Err(TilesortError::config(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(TilesortError::encode(
            "ffmpeg is required for video encoding, but was not found on PATH",
        ));
    }
    Ok(())
}

/// Encodes the frame directory in one `ffmpeg` invocation using a glob input.
pub struct FfmpegGlobEncoder {
    opts: EncodeOpts,
}

impl FfmpegGlobEncoder {
    /// Create a glob encoder with the given options.
    pub fn new(opts: EncodeOpts) -> Self {
        Self { opts }
    }
}

impl VideoEncoder for FfmpegGlobEncoder {
    fn encode(&mut self, frames_dir: &Path) -> TilesortResult<()> {
        preflight(&self.opts)?;

        let glob = frames_dir.join("*.jpg");
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args(["-loglevel", "error"]);
        cmd.args(["-framerate", &self.opts.fps.to_string()]);
        cmd.args(["-pattern_type", "glob", "-i"]).arg(&glob);
        // h264 + yuv420p for broad player compatibility.
        cmd.args([
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let output = cmd.output().map_err(|e| {
            TilesortError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TilesortError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Decodes frames one at a time and streams raw rgb24 into `ffmpeg` stdin.
pub struct FfmpegStreamEncoder {
    opts: EncodeOpts,
}

impl FfmpegStreamEncoder {
    /// Create a streaming encoder with the given options.
    pub fn new(opts: EncodeOpts) -> Self {
        Self { opts }
    }
}

impl VideoEncoder for FfmpegStreamEncoder {
    fn encode(&mut self, frames_dir: &Path) -> TilesortResult<()> {
        preflight(&self.opts)?;

        let paths = sorted_frame_paths(frames_dir)?;
        let Some(first) = paths.first() else {
            return Err(TilesortError::encode(format!(
                "no frames found under '{}'",
                frames_dir.display()
            )));
        };
        let first_frame = decode_frame(first)?;
        let (width, height) = (first_frame.width(), first_frame.height());
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(TilesortError::config(format!(
                "frame size {width}x{height} must be even for yuv420p output \
                 (pick an even split size or tile count)"
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &self.opts.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            TilesortError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TilesortError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TilesortError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let mut pending = Some(first_frame);
        let write_result: TilesortResult<()> = (|| {
            use std::io::Write as _;
            for path in &paths {
                let frame = match pending.take() {
                    Some(f) => f,
                    None => decode_frame(path)?,
                };
                if frame.width() != width || frame.height() != height {
                    return Err(TilesortError::encode(format!(
                        "frame '{}' is {}x{}, expected {width}x{height}",
                        path.display(),
                        frame.width(),
                        frame.height()
                    )));
                }
                stdin.write_all(frame.as_raw()).map_err(|e| {
                    TilesortError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
                })?;
            }
            Ok(())
        })();

        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| TilesortError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| TilesortError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| TilesortError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        write_result?;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TilesortError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Frame files under `dir`, sorted by name.
///
/// Zero-padded names make lexicographic order equal numeric step order.
fn sorted_frame_paths(dir: &Path) -> TilesortResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        TilesortError::storage(format!(
            "failed to read frame directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            TilesortError::storage(format!(
                "failed to read frame directory '{}': {e}",
                dir.display()
            ))
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("jpg") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode_frame(path: &Path) -> TilesortResult<RgbImage> {
    let img = image::open(path).map_err(|e| {
        TilesortError::storage(format!("failed to decode frame '{}': {e}", path.display()))
    })?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_rejects_zero_fps() {
        let opts = EncodeOpts {
            out_path: PathBuf::from("out.mp4"),
            fps: 0,
            overwrite: true,
        };
        assert!(preflight(&opts).is_err());
    }

    #[test]
    fn sorted_frame_paths_orders_by_name() {
        let dir = std::env::temp_dir().join(format!(
            "tilesort_frames_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["0000000002.jpg", "0000000000.jpg", "0000000001.jpg", "note.txt"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        let paths = sorted_frame_paths(&dir).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["0000000000.jpg", "0000000001.jpg", "0000000002.jpg"]
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
