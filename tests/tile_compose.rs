//! Tiling/compositing round trips and eager validation ordering.

use image::{Rgb, RgbImage, imageops};
use tilesort::{Algorithm, SortEngine, TileGrid};

fn coord_image(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, x.wrapping_add(y) as u8]))
}

#[test]
fn split_then_identity_compose_is_lossless() {
    let src = coord_image(8, 8);
    let grid = TileGrid::split(&src, 2).unwrap();
    assert_eq!(grid.len(), 16);

    let identity: Vec<usize> = (0..16).collect();
    let frame = grid.compose(&identity).unwrap();
    assert_eq!(frame, src);
}

#[test]
fn fractional_pixels_are_truncated_not_stretched() {
    let src = coord_image(11, 9);
    let grid = TileGrid::split(&src, 4).unwrap();
    assert_eq!((grid.cols(), grid.rows()), (2, 2));

    let identity: Vec<usize> = (0..grid.len()).collect();
    let frame = grid.compose(&identity).unwrap();
    assert_eq!((frame.width(), frame.height()), (8, 8));
    assert_eq!(frame, imageops::crop_imm(&src, 0, 0, 8, 8).to_image());
}

#[test]
fn compose_applies_the_permutation() {
    let src = coord_image(4, 2);
    let grid = TileGrid::split(&src, 2).unwrap();
    // Swap the two tiles.
    let frame = grid.compose(&[1, 0]).unwrap();
    // Raster slot 0 now holds tile 1, whose top-left source pixel is (2,0).
    assert_eq!(*frame.get_pixel(0, 0), Rgb([2, 0, 2]));
    assert_eq!(*frame.get_pixel(2, 0), Rgb([0, 0, 0]));
}

#[test]
fn sorting_a_shuffled_grid_restores_the_image() {
    let src = coord_image(8, 8);
    let grid = TileGrid::split(&src, 2).unwrap();

    let initial: Vec<usize> = (0..grid.len()).rev().collect();
    let engine = SortEngine::new(initial).unwrap();
    let mut steps = engine.run(Algorithm::Quick);

    let mut last = None;
    while let Some(snap) = steps.next_step() {
        last = Some(snap.to_vec());
    }
    let frame = grid.compose(&last.unwrap()).unwrap();
    assert_eq!(frame, src);
}

#[test]
fn invalid_algorithm_index_fails_before_any_tiling() {
    // Index 6 is outside the 6-element set (0..=5).
    assert!(Algorithm::from_index(6).is_err());
    assert!(Algorithm::from_index(5).is_ok());
}

#[test]
fn oversize_split_is_an_invalid_configuration() {
    let err = TileGrid::split(&coord_image(8, 8), 50).unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}
