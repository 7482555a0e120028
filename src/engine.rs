use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::geometry::Coord;
use crate::mines;
use crate::shape;
use crate::tile::{Content, Overlay, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameState {
    /// Nothing opened yet.
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game session: the tiles of a hexagonal board and the rules that act on them.
#[derive(Clone, Debug)]
pub struct Board {
    config: GameConfig,
    tiles: BTreeMap<Coord, Tile>,
    mines_placed: bool,
    opened: u32,
    state: GameState,
    revealed: bool,
    triggered_mine: Option<Coord>,
    rng: StdRng,
}

impl Board {
    /// Builds a closed board. Mines are placed on the first open; a `seed` of
    /// 0 draws the placement from entropy.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let tiles = shape::generate(config.width, config.height)?;
        let rng = if seed == 0 { StdRng::from_entropy() } else { StdRng::seed_from_u64(seed) };
        Ok(Self::with_tiles(config, tiles, false, rng))
    }

    /// Builds a board whose mines are already placed at `mine_coords`.
    /// `config.mines` is replaced by the number of distinct mines given.
    pub fn from_mine_coords(mut config: GameConfig, mine_coords: &[Coord]) -> Result<Self> {
        let mut tiles = shape::generate(config.width, config.height)?;
        for tile in tiles.values_mut() {
            tile.set_content(Content::Safe);
        }
        for &coord in mine_coords {
            tiles.get_mut(&coord).ok_or(GameError::InvalidCoords(coord))?.set_content(Content::Mine);
        }
        config.mines = tiles.values().filter(|tile| tile.is_mined()).count() as u32;
        Ok(Self::with_tiles(config, tiles, true, StdRng::seed_from_u64(1)))
    }

    fn with_tiles(config: GameConfig, tiles: BTreeMap<Coord, Tile>, mines_placed: bool, rng: StdRng) -> Self {
        Self { config, tiles, mines_placed, opened: 0, state: GameState::Ready, revealed: false, triggered_mine: None, rng }
    }

    /// Opens a tile the player clicked.
    ///
    /// A closed tile is opened, placing mines first if this is the first open,
    /// and a tile without mined neighbors floods into its neighbors. An opened
    /// tile chords: when its flagged neighbors match its mined neighbors,
    /// every unflagged neighbor is opened. Marked tiles never open.
    pub fn open(&mut self, coord: Coord) -> Result<Outcome> {
        let tile = *self.tile(coord)?;
        self.check_not_finished()?;

        match tile.overlay() {
            Overlay::Closed => {
                if !self.mines_placed { self.place_mines(coord)?; }
                self.state = GameState::Playing;
                Ok(self.open_pending(vec![coord]))
            }
            Overlay::Opened => Ok(self.chord(coord)),
            _ => Ok(Outcome::Alive),
        }
    }

    /// Cycles the mark on a closed tile; returns whether anything changed.
    pub fn toggle_flag(&mut self, coord: Coord) -> Result<bool> {
        self.tile(coord)?;
        self.check_not_finished()?;
        let cycle = self.config.flag_cycle;
        Ok(self.tiles.get_mut(&coord).is_some_and(|tile| tile.toggle_flag(cycle)))
    }

    /// Marks the remaining mines once the game is over: flagged after a win,
    /// missed after a loss. Applies once per game.
    pub fn reveal_all(&mut self, won: bool) -> Result<()> {
        if self.revealed { return Err(GameError::AlreadyRevealed); }
        if won && !self.check_victory() { return Err(GameError::NotWon); }
        if !won && self.check_victory() { return Err(GameError::AlreadyWon); }

        for tile in self.tiles.values_mut() {
            tile.reveal(won);
        }
        self.revealed = true;
        self.state = if won { GameState::Won } else { GameState::Lost };
        tracing::info!(won, opened = self.opened, mines = self.config.mines, "game over");
        Ok(())
    }

    pub fn check_victory(&self) -> bool {
        self.opened == self.config.safe_tiles()
    }

    /// Mines left to find by the player's own flags. Negative when over-flagged.
    pub fn estimated_mines_remaining(&self) -> i64 {
        let flagged = self.tiles.values().filter(|tile| tile.overlay() == Overlay::Flagged).count();
        i64::from(self.config.mines) - flagged as i64
    }

    pub fn count_mined_neighbors(&self, coord: Coord) -> Result<u8> {
        self.tile(coord)?;
        Ok(self.count_neighbors(coord, Tile::is_mined))
    }

    pub fn count_flagged_neighbors(&self, coord: Coord) -> Result<u8> {
        self.tile(coord)?;
        Ok(self.count_neighbors(coord, Tile::is_flagged))
    }

    pub fn tile(&self, coord: Coord) -> Result<&Tile> {
        self.tiles.get(&coord).ok_or(GameError::InvalidCoords(coord))
    }

    /// All tiles, ordered by row then column.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, &Tile)> + '_ {
        self.tiles.iter().map(|(&coord, tile)| (coord, tile))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles.keys().copied()
    }

    /// Neighbors of `coord` that lie on the board.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord.neighbors().filter(move |c| self.tiles.contains_key(c))
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.tiles.contains_key(&coord)
    }

    fn place_mines(&mut self, seed: Coord) -> Result<()> {
        if self.mines_placed { return Err(GameError::MinesAlreadyPlaced); }
        mines::place_mines(&mut self.tiles, seed, self.config.mines, &mut self.rng)?;
        self.mines_placed = true;
        Ok(())
    }

    fn chord(&mut self, coord: Coord) -> Outcome {
        if self.count_neighbors(coord, Tile::is_mined) != self.count_neighbors(coord, Tile::is_flagged) {
            return Outcome::Alive;
        }
        if self.config.flag_cycle.has_question()
            && self.neighbors(coord).any(|c| self.tiles[&c].overlay() == Overlay::Questioned)
        {
            return Outcome::Alive;
        }
        let pending: Vec<Coord> = self.neighbors(coord).filter(|c| !self.tiles[c].is_flagged()).collect();
        self.open_pending(pending)
    }

    /// Drains a worklist of tiles to open, pushing the neighbors of every
    /// opened tile that has no mined neighbor. Stops at the first mine.
    fn open_pending(&mut self, mut pending: Vec<Coord>) -> Outcome {
        let mut opened = 0u32;
        while let Some(coord) = pending.pop() {
            let Some(tile) = self.tiles.get_mut(&coord) else { continue };
            match tile.open() {
                Some(Overlay::Detonated) => {
                    self.triggered_mine = Some(coord);
                    self.state = GameState::Lost;
                    tracing::info!(%coord, opened = self.opened, "hit a mine");
                    return Outcome::Dead;
                }
                Some(_) => {
                    self.opened += 1;
                    opened += 1;
                    if self.count_neighbors(coord, Tile::is_mined) == 0 {
                        pending.extend(self.neighbors(coord).filter(|c| self.tiles[c].overlay() == Overlay::Closed));
                    }
                }
                None => {}
            }
        }
        if opened > 1 { tracing::debug!(opened, "flood opened tiles"); }
        Outcome::Alive
    }

    fn count_neighbors(&self, coord: Coord, pred: fn(&Tile) -> bool) -> u8 {
        self.neighbors(coord).filter(|c| pred(&self.tiles[c])).count() as u8
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() || self.revealed { Err(GameError::AlreadyEnded) } else { Ok(()) }
    }
}

// Public getters for encapsulation
impl Board {
    pub fn config(&self) -> &GameConfig { &self.config }
    pub fn width(&self) -> u32 { self.config.width }
    pub fn height(&self) -> u32 { self.config.height }
    pub fn mine_count(&self) -> u32 { self.config.mines }
    pub fn mines_placed(&self) -> bool { self.mines_placed }
    pub fn opened_count(&self) -> u32 { self.opened }
    pub fn state(&self) -> GameState { self.state }
    pub fn is_revealed(&self) -> bool { self.revealed }
    pub fn triggered_mine(&self) -> Option<Coord> { self.triggered_mine }
    pub fn len(&self) -> usize { self.tiles.len() }
    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(i: i32, j: i32) -> Coord {
        Coord::new(i, j)
    }

    // 5x4 board with a single interior mine at (1, 2).
    fn board() -> Board {
        let config = GameConfig::new(5, 4, 1).unwrap();
        Board::from_mine_coords(config, &[c(1, 2)]).unwrap()
    }

    #[test]
    fn flood_stops_at_numbered_tiles() {
        let mut b = board();

        assert_eq!(b.open(c(3, 0)).unwrap(), Outcome::Alive);

        // everything opens except the mine and (2, 2), whose neighbors are all numbered
        assert_eq!(b.opened_count(), 16);
        assert!(b.tile(c(1, 2)).unwrap().is_closed());
        assert!(b.tile(c(2, 2)).unwrap().is_closed());
        assert_eq!(b.count_mined_neighbors(c(2, 1)).unwrap(), 1);
        assert!(!b.check_victory());

        b.open(c(2, 2)).unwrap();
        assert!(b.check_victory());
    }

    #[test]
    fn numbered_tile_opens_alone() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        assert_eq!(b.opened_count(), 1);
        assert_eq!(b.state(), GameState::Playing);
    }

    #[test]
    fn opening_mine_detonates_only_that_tile() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        b.toggle_flag(c(0, 0)).unwrap();

        assert_eq!(b.open(c(1, 2)).unwrap(), Outcome::Dead);
        assert_eq!(b.tile(c(1, 2)).unwrap().overlay(), Overlay::Detonated);
        assert_eq!(b.triggered_mine(), Some(c(1, 2)));
        assert_eq!(b.tile(c(0, 0)).unwrap().overlay(), Overlay::Flagged);
        assert_eq!(b.tile(c(3, 0)).unwrap().overlay(), Overlay::Closed);
        assert_eq!(b.open(c(3, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn chord_opens_unflagged_neighbors_once() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        b.toggle_flag(c(1, 2)).unwrap();

        assert_eq!(b.open(c(2, 2)).unwrap(), Outcome::Alive);
        assert!(b.tile(c(2, 1)).unwrap().is_open());
        assert!(b.tile(c(1, 3)).unwrap().is_open());
        let after_first: Vec<Tile> = b.tiles().map(|(_, t)| *t).collect();

        b.open(c(2, 2)).unwrap();
        let after_second: Vec<Tile> = b.tiles().map(|(_, t)| *t).collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn chord_with_wrong_flag_detonates() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        b.toggle_flag(c(2, 1)).unwrap();

        assert_eq!(b.open(c(2, 2)).unwrap(), Outcome::Dead);
        assert_eq!(b.triggered_mine(), Some(c(1, 2)));
        assert_eq!(b.tile(c(2, 1)).unwrap().overlay(), Overlay::Flagged);
    }

    #[test]
    fn chord_needs_matching_flags() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        b.open(c(2, 2)).unwrap();
        assert_eq!(b.opened_count(), 1);
    }

    #[test]
    fn question_mark_blocks_chord() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        b.toggle_flag(c(1, 2)).unwrap();
        b.toggle_flag(c(1, 2)).unwrap();
        assert_eq!(b.tile(c(1, 2)).unwrap().overlay(), Overlay::Questioned);

        assert_eq!(b.open(c(2, 2)).unwrap(), Outcome::Alive);
        assert!(b.tile(c(2, 1)).unwrap().is_closed());
    }

    #[test]
    fn flagged_tile_ignores_direct_open() {
        let mut b = board();
        b.toggle_flag(c(1, 2)).unwrap();
        assert_eq!(b.open(c(1, 2)).unwrap(), Outcome::Alive);
        assert_eq!(b.tile(c(1, 2)).unwrap().overlay(), Overlay::Flagged);
        assert_eq!(b.state(), GameState::Ready);
    }

    #[test]
    fn flood_does_not_open_flagged_tiles() {
        let mut b = board();
        b.toggle_flag(c(0, 0)).unwrap();
        b.open(c(3, 0)).unwrap();
        assert_eq!(b.tile(c(0, 0)).unwrap().overlay(), Overlay::Flagged);
        assert_eq!(b.opened_count(), 15);
    }

    #[test]
    fn estimated_mines_can_go_negative() {
        let mut b = board();
        assert_eq!(b.estimated_mines_remaining(), 1);
        b.toggle_flag(c(0, 0)).unwrap();
        b.toggle_flag(c(0, 1)).unwrap();
        assert_eq!(b.estimated_mines_remaining(), -1);
        // question marks do not count
        b.toggle_flag(c(0, 1)).unwrap();
        assert_eq!(b.estimated_mines_remaining(), 0);
    }

    #[test]
    fn toggle_flag_ignores_opened_tiles() {
        let mut b = board();
        b.open(c(2, 2)).unwrap();
        assert!(!b.toggle_flag(c(2, 2)).unwrap());
    }

    #[test]
    fn reveal_all_after_win_flags_mines() {
        let mut b = board();
        b.open(c(3, 0)).unwrap();
        assert_eq!(b.reveal_all(true), Err(GameError::NotWon));
        b.open(c(2, 2)).unwrap();

        b.reveal_all(true).unwrap();
        assert_eq!(b.tile(c(1, 2)).unwrap().overlay(), Overlay::Flagged);
        assert_eq!(b.state(), GameState::Won);
        assert_eq!(b.estimated_mines_remaining(), 0);
        assert_eq!(b.reveal_all(true), Err(GameError::AlreadyRevealed));
        assert_eq!(b.toggle_flag(c(1, 2)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn loss_reveal_refused_on_cleared_board() {
        let mut b = board();
        b.open(c(3, 0)).unwrap();
        b.open(c(2, 2)).unwrap();
        assert!(b.check_victory());

        assert_eq!(b.reveal_all(false), Err(GameError::AlreadyWon));
        assert!(!b.is_revealed());
        assert_eq!(b.state(), GameState::Playing);
        b.reveal_all(true).unwrap();
        assert_eq!(b.state(), GameState::Won);
    }

    #[test]
    fn reveal_all_after_loss_marks_misses() {
        let config = GameConfig::new(5, 4, 2).unwrap();
        let mut b = Board::from_mine_coords(config, &[c(1, 2), c(3, 0)]).unwrap();
        b.toggle_flag(c(3, 0)).unwrap();
        assert_eq!(b.open(c(1, 2)).unwrap(), Outcome::Dead);

        b.reveal_all(false).unwrap();
        assert_eq!(b.tile(c(1, 2)).unwrap().overlay(), Overlay::Detonated);
        assert_eq!(b.tile(c(3, 0)).unwrap().overlay(), Overlay::Flagged);
        assert!(!b.check_victory());
    }

    #[test]
    fn out_of_board_coords_are_rejected() {
        let mut b = board();
        let outside = c(-1, 0);
        assert_eq!(b.open(outside), Err(GameError::InvalidCoords(outside)));
        assert_eq!(b.toggle_flag(outside), Err(GameError::InvalidCoords(outside)));
        assert_eq!(b.count_mined_neighbors(outside), Err(GameError::InvalidCoords(outside)));
        assert!(Board::from_mine_coords(*b.config(), &[outside]).is_err());
    }

    #[test]
    fn edge_tiles_have_fewer_neighbors() {
        let b = board();
        assert_eq!(b.neighbors(c(-2, 4)).count(), 2);
        assert_eq!(b.neighbors(c(3, 0)).count(), 2);
        assert_eq!(b.neighbors(c(1, 2)).count(), 6);
    }
}
