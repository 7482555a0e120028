use crate::error::{GameError, Result};
use crate::mines;
use crate::shape;
use crate::tile::FlagCycle;

/// Session parameters, checked once when a game starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub mines: u32,
    pub flag_cycle: FlagCycle,
}

impl GameConfig {
    pub fn new(width: u32, height: u32, mines: u32) -> Result<Self> {
        let config = Self { width, height, mines, flag_cycle: FlagCycle::default() };
        config.validate()?;
        Ok(config)
    }

    pub fn with_flag_cycle(mut self, flag_cycle: FlagCycle) -> Self {
        self.flag_cycle = flag_cycle;
        self
    }

    pub fn validate(&self) -> Result<()> {
        shape::validate(self.width, self.height)?;
        let max = mines::max_mines(self.total_tiles());
        if self.mines > max {
            return Err(GameError::TooManyMines { requested: self.mines, max });
        }
        Ok(())
    }

    pub fn total_tiles(&self) -> u32 {
        shape::tile_count(self.width, self.height)
    }

    pub fn safe_tiles(&self) -> u32 {
        self.total_tiles() - self.mines
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn dimensions(self) -> (u32, u32, u32) {
        match self {
            Self::Easy => (11, 8, 14),
            Self::Medium => (21, 13, 48),
            Self::Hard => (31, 17, 110),
        }
    }

    pub fn config(self) -> GameConfig {
        let (width, height, mines) = self.dimensions();
        GameConfig { width, height, mines, flag_cycle: FlagCycle::default() }
    }
}
