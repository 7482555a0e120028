//! Per-tile state: what lies under a tile and what the player has done to it.

/// What lies under a tile. `Undetermined` only until mines are placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Undetermined,
    Safe,
    Mine,
}

/// Player-visible state layered over the content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Flagged,
    Questioned,
    Opened,
    /// A mine the player never found, shown after a loss.
    Missed,
    /// The mine that ended the game.
    Detonated,
}

/// How a flag action cycles the marks on a closed tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FlagCycle {
    /// Closed -> Flagged -> Closed.
    Simple,
    /// Closed -> Flagged -> Questioned -> Closed.
    #[default]
    WithQuestion,
}

impl FlagCycle {
    pub const fn has_question(self) -> bool {
        matches!(self, Self::WithQuestion)
    }
}

impl Overlay {
    /// Overlay after a flag action, `None` when the tile does not take marks.
    pub const fn after_flag(self, cycle: FlagCycle) -> Option<Overlay> {
        use Overlay::*;
        match (self, cycle) {
            (Closed, _) => Some(Flagged),
            (Flagged, FlagCycle::WithQuestion) => Some(Questioned),
            (Flagged, FlagCycle::Simple) => Some(Closed),
            (Questioned, _) => Some(Closed),
            (Opened | Missed | Detonated, _) => None,
        }
    }

    /// Overlay after an open action, `None` when the tile refuses it.
    /// Marked tiles always refuse, and so does a tile whose content is not yet known.
    pub const fn after_open(self, content: Content) -> Option<Overlay> {
        match (self, content) {
            (Overlay::Closed, Content::Safe) => Some(Overlay::Opened),
            (Overlay::Closed, Content::Mine) => Some(Overlay::Detonated),
            _ => None,
        }
    }

    /// Overlay after the end-of-game reveal. Only unmarked or question-marked
    /// mines change.
    pub const fn after_reveal(self, content: Content, won: bool) -> Overlay {
        match (self, content) {
            (Overlay::Closed | Overlay::Questioned, Content::Mine) => {
                if won { Overlay::Flagged } else { Overlay::Missed }
            }
            _ => self,
        }
    }
}

/// One board tile. Only the engine changes tiles, so an opened tile is never a mine:
///
/// ```compile_fail
/// use hexamine::{Content, Overlay, Tile};
/// let _ = Tile::new(Content::Mine, Overlay::Opened);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Tile {
    content: Content,
    overlay: Overlay,
}

impl Tile {
    pub(crate) const fn new(content: Content, overlay: Overlay) -> Self {
        Self { content, overlay }
    }

    pub const fn content(&self) -> Content {
        self.content
    }

    pub const fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.overlay, Overlay::Opened)
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.overlay, Overlay::Closed | Overlay::Flagged | Overlay::Questioned)
    }

    /// Flagged or question-marked.
    pub const fn is_flagged(&self) -> bool {
        matches!(self.overlay, Overlay::Flagged | Overlay::Questioned)
    }

    pub const fn is_mined(&self) -> bool {
        matches!(self.content, Content::Mine)
    }

    pub const fn is_safe(&self) -> bool {
        matches!(self.content, Content::Safe)
    }

    pub(crate) fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    /// Applies a flag action; returns whether the overlay changed.
    pub fn toggle_flag(&mut self, cycle: FlagCycle) -> bool {
        match self.overlay.after_flag(cycle) {
            Some(next) => { self.overlay = next; true }
            None => false,
        }
    }

    /// Applies an open action; returns the new overlay when it took effect.
    pub fn open(&mut self) -> Option<Overlay> {
        let next = self.overlay.after_open(self.content)?;
        self.overlay = next;
        Some(next)
    }

    pub fn reveal(&mut self, won: bool) {
        self.overlay = self.overlay.after_reveal(self.content, won);
    }
}
