use thiserror::Error;

use crate::geometry::Coord;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board width must be odd, got {0}")]
    EvenWidth(u32),
    #[error("Board height must be positive")]
    ZeroHeight,
    #[error("Board height {height} is too small for width {width}")]
    HeightTooSmall { width: u32, height: u32 },
    #[error("Board {width}x{height} exceeds {max} tiles")]
    BoardTooLarge { width: u32, height: u32, max: u32 },
    #[error("Too many mines: requested {requested}, at most {max} fit")]
    TooManyMines { requested: u32, max: u32 },
    #[error("Coordinates {0} are not on the board")]
    InvalidCoords(Coord),
    #[error("Mines were already placed")]
    MinesAlreadyPlaced,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Board was already revealed")]
    AlreadyRevealed,
    #[error("Victory reveal requested before every safe tile was opened")]
    NotWon,
    #[error("Loss reveal requested on a board whose safe tiles are all open")]
    AlreadyWon,
}

pub type Result<T> = core::result::Result<T, GameError>;
