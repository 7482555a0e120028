//! Character-cell projection of a board, shared by the line mode and the TUI.

use std::fmt::{self, Write as _};

use crate::engine::Board;
use crate::geometry::{Coord, Layout, Point};
use crate::tile::{Overlay, Tile};

/// Maps board coordinates to terminal cells and back.
///
/// A plane unit is one column wide and half a row tall, so a tile lands on
/// row `2i + j` and tiles sharing a row alternate with the ones above and
/// below, giving a honeycomb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    layout: Layout,
    cols: u16,
    rows: u16,
}

impl Canvas {
    /// Smallest canvas holding every tile of `board`, with its top-left tile at (0, 0).
    pub fn fit(board: &Board) -> Self {
        let probe = Layout::terminal(Point::default());
        let (mut min, mut max) = (Point::new(f64::MAX, f64::MAX), Point::new(f64::MIN, f64::MIN));
        for coord in board.coords() {
            let p = probe.to_plane(coord);
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        if board.is_empty() {
            return Self { layout: probe, cols: 0, rows: 0 };
        }

        let layout = Layout::terminal(Point::new(-min.x, -min.y));
        let cols = (max.x - min.x).round() as u16 + 1;
        let rows = ((max.y - min.y) / 2.0).round() as u16 + 1;
        Self { layout, cols, rows }
    }

    pub fn cols(&self) -> u16 { self.cols }
    pub fn rows(&self) -> u16 { self.rows }

    /// Terminal cell `(col, row)` where the tile's glyph goes.
    pub fn cell_of(&self, coord: Coord) -> (u16, u16) {
        let p = self.layout.to_plane(coord);
        (p.x.round() as u16, (p.y / 2.0).round() as u16)
    }

    /// Tile under the terminal cell `(col, row)`, if any.
    pub fn pick(&self, board: &Board, col: u16, row: u16) -> Option<Coord> {
        let point = Point::new(f64::from(col), f64::from(row) * 2.0);
        self.layout.pick(point, board.coords())
    }

    /// Row-major grid of which tile, if any, sits in each cell.
    pub fn grid(&self, board: &Board) -> Vec<Vec<Option<Coord>>> {
        let mut grid = vec![vec![None; self.cols as usize]; self.rows as usize];
        for coord in board.coords() {
            let (col, row) = self.cell_of(coord);
            grid[row as usize][col as usize] = Some(coord);
        }
        grid
    }

    /// Plain-text picture of the board with a column ruler and row labels.
    pub fn render(&self, board: &Board) -> String {
        let mut s = String::new();
        s.push_str("     ");
        for x in 0..self.cols {
            s.push(if x % 10 == 0 { char::from_digit(u32::from(x / 10 % 10), 10).unwrap_or(' ') } else { ' ' });
        }
        s.push('\n');
        s.push_str("     ");
        for x in 0..self.cols {
            s.push(char::from_digit(u32::from(x % 10), 10).unwrap_or(' '));
        }
        s.push('\n');
        s.push_str("    +");
        s.push_str(&"-".repeat(self.cols as usize));
        s.push('\n');

        for (y, line) in self.grid(board).into_iter().enumerate() {
            let _ = write!(s, "{:>3} |", y);
            for cell in line {
                s.push(cell.map_or(' ', |coord| glyph(board, coord)));
            }
            s.push('\n');
        }
        s
    }
}

/// Character shown for the tile at `coord`.
pub fn glyph(board: &Board, coord: Coord) -> char {
    let Ok(tile) = board.tile(coord) else { return ' ' };
    tile_glyph(tile, board.count_mined_neighbors(coord).unwrap_or(0))
}

pub fn tile_glyph(tile: &Tile, mined_neighbors: u8) -> char {
    match tile.overlay() {
        Overlay::Closed => '.',
        Overlay::Flagged => 'F',
        Overlay::Questioned => '?',
        Overlay::Opened if mined_neighbors == 0 => ' ',
        Overlay::Opened => char::from_digit(u32::from(mined_neighbors), 10).unwrap_or('?'),
        Overlay::Missed => '*',
        Overlay::Detonated => 'X',
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Canvas::fit(self).render(self))
    }
}
