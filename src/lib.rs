//! HexaMine: minesweeper on a hexagonal board.
//!
//! - `geometry`: axial coordinates, neighbors and the grid/plane transform
//! - `shape`: the hexagon-biased board outline
//! - `mines`: mine placement deferred to the first open
//! - `tile`: per-tile content and overlay state machine
//! - `engine`: open, chord, flag and win/loss rules over a whole board
//! - `render` and `tui`: terminal presentation

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mines;
pub mod render;
pub mod shape;
pub mod tile;
pub mod tui;

pub use config::{Difficulty, GameConfig};
pub use engine::{Board, GameState, Outcome};
pub use error::{GameError, Result};
pub use geometry::{Coord, Layout, Point};
pub use tile::{Content, FlagCycle, Overlay, Tile};
