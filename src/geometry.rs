//! Axial hex coordinates and the mapping between grid and plane.
//!
//! The `i` axis points straight down the plane, the `j` axis points down and to
//! the right at 30 degrees below horizontal, so a tile's plane position is
//! `i * (0, 1) + j * (sqrt(3)/2, 1/2)` scaled by the layout spacing.

use std::fmt;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Offsets `(di, dj)` of the six tiles sharing an edge with a tile.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, -1), (-1, 1), (-1, 0), (1, 0), (0, -1), (0, 1)];

/// Axial coordinates of one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub i: i32,
    pub j: i32,
}

impl Coord {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// All six neighbor positions, whether or not they lie on a board.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_OFFSETS.iter().map(move |&(di, dj)| Coord::new(self.i + di, self.j + dj))
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        NEIGHBOR_OFFSETS.contains(&(other.i - self.i, other.j - self.j))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((i, j): (i32, i32)) -> Self {
        Self::new(i, j)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Placement of the grid on a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Plane position of tile `(0, 0)`.
    pub origin: Point,
    /// Distance between the centers of two neighboring tiles.
    pub spacing: f64,
    /// Circumradius of a drawn hexagon.
    pub radius: f64,
    /// Shrinks the clickable disc inside the apothem.
    pub margin: f64,
}

impl Layout {
    /// Pixel geometry: hexagons of radius 27.5 spaced slightly wider than
    /// twice their apothem so they almost touch.
    pub fn reference() -> Self {
        let radius = 27.5;
        Self { origin: Point::new(100.0, 100.0), spacing: SQRT_3 * radius + 3.0, radius, margin: 2.0 }
    }

    /// Character-cell geometry. One plane unit is one terminal column and half
    /// a terminal row, which roughly undoes the aspect ratio of a glyph.
    pub fn terminal(origin: Point) -> Self {
        Self { origin, spacing: 4.0, radius: 2.0, margin: 0.0 }
    }

    pub fn to_plane(&self, coord: Coord) -> Point {
        let (i, j) = (f64::from(coord.i), f64::from(coord.j));
        Point {
            x: self.origin.x + self.spacing * (SQRT_3 / 2.0 * j),
            y: self.origin.y + self.spacing * (i + 0.5 * j),
        }
    }

    /// Real-valued grid position of a plane point; exact inverse of [`Layout::to_plane`].
    pub fn to_grid(&self, point: Point) -> (f64, f64) {
        let x = (point.x - self.origin.x) / self.spacing;
        let y = (point.y - self.origin.y) / self.spacing;
        (-x / SQRT_3 + y, 2.0 * x / SQRT_3)
    }

    /// Apothem of the drawn hexagon less the margin.
    pub fn hit_radius(&self) -> f64 {
        self.radius * SQRT_3 / 2.0 - self.margin
    }

    /// A point hits a tile only inside a disc smaller than the hexagon, so
    /// clicks near edges and corners hit nothing instead of a neighbor.
    pub fn hit_test(&self, point: Point, coord: Coord) -> bool {
        point.distance(self.to_plane(coord)) < self.hit_radius()
    }

    /// First coordinate whose tile contains `point`.
    pub fn pick<I>(&self, point: Point, coords: I) -> Option<Coord>
    where
        I: IntoIterator<Item = Coord>,
    {
        coords.into_iter().find(|&coord| self.hit_test(point, coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn to_grid_inverts_to_plane() {
        let layout = Layout::reference();
        for &(i, j) in &[(0, 0), (-3, 6), (4, 2), (7, -1)] {
            let (gi, gj) = layout.to_grid(layout.to_plane(Coord::new(i, j)));
            assert!(close(gi, f64::from(i)) && close(gj, f64::from(j)), "({i}, {j}) -> ({gi}, {gj})");
        }
    }

    #[test]
    fn origin_maps_to_zero_tile() {
        let layout = Layout::reference();
        assert_eq!(layout.to_plane(Coord::new(0, 0)), Point::new(100.0, 100.0));
        let p = layout.to_plane(Coord::new(1, 0));
        assert!(close(p.x, 100.0) && close(p.y, 100.0 + layout.spacing));
    }

    #[test]
    fn neighbors_are_one_spacing_apart() {
        let layout = Layout::reference();
        let center = Coord::new(2, 3);
        for n in center.neighbors() {
            let d = layout.to_plane(center).distance(layout.to_plane(n));
            assert!(close(d, layout.spacing), "{n}: {d}");
        }
    }

    #[test]
    fn hit_test_rejects_edges() {
        let layout = Layout::reference();
        let center = layout.to_plane(Coord::new(1, 1));
        assert!(layout.hit_test(center, Coord::new(1, 1)));
        assert!(layout.hit_test(Point::new(center.x + 20.0, center.y), Coord::new(1, 1)));
        // apothem is ~23.8, the margin takes 2 off
        assert!(!layout.hit_test(Point::new(center.x + 22.5, center.y), Coord::new(1, 1)));
        assert!(!layout.hit_test(center, Coord::new(1, 2)));
    }

    #[test]
    fn pick_finds_tile_under_point() {
        let layout = Layout::terminal(Point::new(0.0, 0.0));
        let coords = [Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)];
        assert_eq!(layout.pick(layout.to_plane(Coord::new(0, 1)), coords), Some(Coord::new(0, 1)));
        assert_eq!(layout.pick(Point::new(-10.0, -10.0), coords), None);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let c = Coord::new(0, 0);
        for n in c.neighbors() {
            assert!(c.is_adjacent(n) && n.is_adjacent(c));
        }
        assert!(!c.is_adjacent(Coord::new(1, 1)));
        assert!(!c.is_adjacent(c));
    }
}
