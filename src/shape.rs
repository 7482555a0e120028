//! The hexagon-biased board outline.
//!
//! A board of `width` x `height` is a parallelogram `width` tiles wide with a
//! shrinking triangular cap above and below it, so the silhouette is close to
//! a regular hexagon. `width` must be odd so both caps shrink by two tiles per
//! row down to a single tile.

use std::collections::BTreeMap;

use crate::error::{GameError, Result};
use crate::geometry::Coord;
use crate::tile::Tile;

/// Largest bounding rectangle, in tiles, a board may span.
pub const MAX_TILES: u32 = 1 << 16;

/// Checks that `width` and `height` describe a buildable outline.
pub fn validate(width: u32, height: u32) -> Result<()> {
    if width % 2 == 0 { return Err(GameError::EvenWidth(width)); }
    if height == 0 { return Err(GameError::ZeroHeight); }
    match width.checked_mul(height) {
        Some(area) if area <= MAX_TILES => {}
        _ => return Err(GameError::BoardTooLarge { width, height, max: MAX_TILES }),
    }
    if height < (width - 1) / 2 { return Err(GameError::HeightTooSmall { width, height }); }
    Ok(())
}

/// Number of tiles in a `width` x `height` outline: `width*height - (width-1)/2`.
/// Only meaningful for dimensions that pass [`validate`].
pub fn tile_count(width: u32, height: u32) -> u32 {
    width * height - (width - 1) / 2
}

/// Every coordinate of the outline, cap by cap, row by row.
pub fn coords(width: u32, height: u32) -> Result<Vec<Coord>> {
    validate(width, height)?;
    // validated, so both sides fit in i32 and the core height is at least -1
    let core_width = width as i32 - 1;
    let half = core_width / 2;
    let core_height = height as i32 - half - 1;

    let mut out = Vec::with_capacity(tile_count(width, height) as usize);
    for i in -half..0 {
        out.extend((-2 * i..=core_width).map(|j| Coord::new(i, j)));
    }
    for i in 0..=core_height {
        out.extend((0..=core_width).map(|j| Coord::new(i, j)));
    }
    for i in core_height + 1..=core_height + half {
        let n = i - core_height;
        out.extend((0..=core_width - 2 * n).map(|j| Coord::new(i, j)));
    }
    Ok(out)
}

/// A fresh board: every tile undetermined and closed.
pub fn generate(width: u32, height: u32) -> Result<BTreeMap<Coord, Tile>> {
    Ok(coords(width, height)?.into_iter().map(|c| (c, Tile::default())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_count_matches_generated_outline() {
        for width in (1..=31).step_by(2) {
            for height in ((width - 1) / 2).max(1)..=20 {
                let tiles = generate(width, height).unwrap();
                assert_eq!(tiles.len() as u32, tile_count(width, height), "{width}x{height}");
            }
        }
    }

    #[test]
    fn presets_have_expected_sizes() {
        assert_eq!(tile_count(11, 8), 83);
        assert_eq!(tile_count(21, 13), 263);
        assert_eq!(tile_count(31, 17), 512);
    }

    #[test]
    fn small_board_outline() {
        let coords = coords(5, 4).unwrap();
        let expected: Vec<Coord> = [
            (-2, 4),
            (-1, 2), (-1, 3), (-1, 4),
            (0, 0), (0, 1), (0, 2), (0, 3), (0, 4),
            (1, 0), (1, 1), (1, 2), (1, 3), (1, 4),
            (2, 0), (2, 1), (2, 2),
            (3, 0),
        ]
        .into_iter()
        .map(Coord::from)
        .collect();
        assert_eq!(coords, expected);
    }

    #[test]
    fn no_duplicates() {
        let list = coords(21, 13).unwrap();
        let map = generate(21, 13).unwrap();
        assert_eq!(list.len(), map.len());
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(validate(4, 10), Err(GameError::EvenWidth(4)));
        assert_eq!(validate(0, 10), Err(GameError::EvenWidth(0)));
        assert_eq!(validate(1, 0), Err(GameError::ZeroHeight));
        assert!(validate(1, 1).is_ok());
        assert_eq!(validate(11, 4), Err(GameError::HeightTooSmall { width: 11, height: 4 }));
        assert!(validate(11, 5).is_ok());
    }

    #[test]
    fn rejects_oversized_boards() {
        let too_large = GameError::BoardTooLarge { width: 65537, height: 65537, max: MAX_TILES };
        assert_eq!(validate(65537, 65537), Err(too_large));
        assert!(matches!(validate(u32::MAX, 3), Err(GameError::BoardTooLarge { .. })));
        assert!(matches!(validate(257, 257), Err(GameError::BoardTooLarge { .. })));
        assert!(validate(255, 257).is_ok());
    }
}
