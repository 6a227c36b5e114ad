//! Tile extraction and frame composition.
//!
//! A source image is cut into non-overlapping `split`×`split` crops in raster
//! order (left-to-right within a row, rows top-to-bottom). Pixels beyond the
//! last whole tile in either dimension are silently discarded; composed
//! frames therefore measure `cols*split` × `rows*split`, the source cropped
//! to whole tiles. This truncation is a documented limitation kept for
//! compatibility with existing outputs.

use image::{RgbImage, imageops};

use crate::foundation::error::{TilesortError, TilesortResult};

/// The immutable tile set of one run, in raster order.
///
/// Created once before sorting begins and shared read-only by every frame
/// composition.
#[derive(Debug)]
pub struct TileGrid {
    split: u32,
    cols: u32,
    rows: u32,
    tiles: Vec<RgbImage>,
}

impl TileGrid {
    /// Cut `image` into `split`×`split` tiles.
    ///
    /// Fails with an invalid-configuration error when `split` is zero or the
    /// image is smaller than one tile in either dimension.
    pub fn split(image: &RgbImage, split: u32) -> TilesortResult<Self> {
        if split == 0 {
            return Err(TilesortError::config("split size must be positive"));
        }
        let cols = image.width() / split;
        let rows = image.height() / split;
        if cols == 0 || rows == 0 {
            return Err(TilesortError::config(format!(
                "image {}x{} is smaller than one {split}x{split} tile",
                image.width(),
                image.height()
            )));
        }

        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let tile =
                    imageops::crop_imm(image, col * split, row * split, split, split).to_image();
                tiles.push(tile);
            }
        }
        Ok(Self {
            split,
            cols,
            rows,
            tiles,
        })
    }

    /// Number of tiles (N).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile edge length in pixels.
    pub fn split_size(&self) -> u32 {
        self.split
    }

    /// Tiles per row.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Tile rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a composed frame (`cols * split`).
    pub fn frame_width(&self) -> u32 {
        self.cols * self.split
    }

    /// Height of a composed frame (`rows * split`).
    pub fn frame_height(&self) -> u32 {
        self.rows * self.split
    }

    /// Compose one frame: tile `snapshot[k]` lands at raster slot `k`.
    ///
    /// Neither the snapshot nor the tiles are mutated; a fresh canvas is
    /// allocated per call.
    pub fn compose(&self, snapshot: &[usize]) -> TilesortResult<RgbImage> {
        compose_frame(&self.tiles, self.cols, self.split, snapshot)
    }
}

/// Compose a frame from raster-ordered `tiles` arranged `cols` wide.
///
/// Validates defensively that the snapshot has one entry per tile and that
/// every entry is in range: the sort engine upholds this invariant, but the
/// compositor is the last consumer before persistence.
pub fn compose_frame(
    tiles: &[RgbImage],
    cols: u32,
    split: u32,
    snapshot: &[usize],
) -> TilesortResult<RgbImage> {
    if snapshot.len() != tiles.len() {
        return Err(TilesortError::validation(format!(
            "snapshot length {} does not match tile count {}",
            snapshot.len(),
            tiles.len()
        )));
    }
    if cols == 0 && !tiles.is_empty() {
        return Err(TilesortError::validation(format!(
            "cols must be non-zero for {} tiles",
            tiles.len()
        )));
    }
    let rows = if cols == 0 {
        0
    } else {
        tiles.len() as u32 / cols
    };

    let mut canvas = RgbImage::new(cols * split, rows * split);
    for (k, &tile_idx) in snapshot.iter().enumerate() {
        let tile = tiles.get(tile_idx).ok_or_else(|| {
            TilesortError::validation(format!(
                "snapshot value {tile_idx} out of range for {} tiles",
                tiles.len()
            ))
        })?;
        let x = (k as u32 % cols) * split;
        let y = (k as u32 / cols) * split;
        imageops::replace(&mut canvas, tile, i64::from(x), i64::from(y));
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Gradient image where every pixel encodes its own coordinates.
    fn coord_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, x.wrapping_add(y) as u8]))
    }

    #[test]
    fn split_produces_raster_ordered_tiles() {
        let grid = TileGrid::split(&coord_image(8, 8), 2).unwrap();
        assert_eq!(grid.len(), 16);
        assert_eq!((grid.cols(), grid.rows()), (4, 4));
        assert_eq!((grid.frame_width(), grid.frame_height()), (8, 8));
        // Tile 5 sits at grid (1,1), so its top-left pixel is (2,2).
        assert_eq!(*grid.tiles[5].get_pixel(0, 0), Rgb([2, 2, 4]));
    }

    #[test]
    fn split_truncates_fractional_remainder() {
        let grid = TileGrid::split(&coord_image(9, 7), 2).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (4, 3));
        assert_eq!((grid.frame_width(), grid.frame_height()), (8, 6));
    }

    #[test]
    fn split_rejects_degenerate_configurations() {
        assert!(TileGrid::split(&coord_image(8, 8), 0).is_err());
        assert!(TileGrid::split(&coord_image(8, 8), 9).is_err());
        assert!(TileGrid::split(&coord_image(8, 1), 2).is_err());
    }

    #[test]
    fn identity_composition_reproduces_truncated_source() {
        let src = coord_image(9, 7);
        let grid = TileGrid::split(&src, 2).unwrap();
        let identity: Vec<usize> = (0..grid.len()).collect();
        let frame = grid.compose(&identity).unwrap();
        let truncated = imageops::crop_imm(&src, 0, 0, 8, 6).to_image();
        assert_eq!(frame, truncated);
    }

    #[test]
    fn compose_validates_snapshot() {
        let grid = TileGrid::split(&coord_image(4, 4), 2).unwrap();
        assert!(grid.compose(&[0, 1, 2]).is_err());
        assert!(grid.compose(&[0, 1, 2, 4]).is_err());
        assert!(grid.compose(&[3, 2, 1, 0]).is_ok());
    }

    #[test]
    fn compose_frame_handles_empty_grid() {
        let frame = compose_frame(&[], 0, 2, &[]).unwrap();
        assert_eq!((frame.width(), frame.height()), (0, 0));
    }

    #[test]
    fn compose_frame_rejects_zero_cols_with_tiles() {
        let tiles = vec![RgbImage::new(2, 2)];
        let err = compose_frame(&tiles, 0, 2, &[0]).unwrap_err();
        assert!(err.to_string().contains("cols must be non-zero"));
    }
}
