//! Deferred mine placement around the first opened tile.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GameError, Result};
use crate::geometry::Coord;
use crate::tile::{Content, Tile};

/// Tiles kept free of mines around the first click: the tile and its six neighbors.
pub const EXCLUDED_AROUND_SEED: u32 = 7;

/// Most mines a board of `total` tiles accepts whatever tile is opened first.
pub fn max_mines(total: u32) -> u32 {
    total.saturating_sub(EXCLUDED_AROUND_SEED + 1)
}

/// Picks `mine_count` mines uniformly among the tiles that are neither `seed`
/// nor adjacent to it, and marks every other tile safe.
pub fn place_mines<R>(tiles: &mut BTreeMap<Coord, Tile>, seed: Coord, mine_count: u32, rng: &mut R) -> Result<()>
where
    R: Rng + ?Sized,
{
    if !tiles.contains_key(&seed) { return Err(GameError::InvalidCoords(seed)); }
    if tiles.values().any(|tile| tile.content() != Content::Undetermined) {
        return Err(GameError::MinesAlreadyPlaced);
    }

    let mut eligible: Vec<Coord> = tiles
        .keys()
        .copied()
        .filter(|&coord| coord != seed && !coord.is_adjacent(seed))
        .collect();
    let excluded = tiles.len() - eligible.len();
    if mine_count as usize >= eligible.len() {
        return Err(GameError::TooManyMines { requested: mine_count, max: eligible.len().saturating_sub(1) as u32 });
    }

    eligible.shuffle(rng);
    for tile in tiles.values_mut() {
        tile.set_content(Content::Safe);
    }
    for coord in &eligible[..mine_count as usize] {
        if let Some(tile) = tiles.get_mut(coord) {
            tile.set_content(Content::Mine);
        }
    }

    tracing::debug!(%seed, mine_count, excluded, "placed mines");
    Ok(())
}
