use crate::grid::GRID_WIDTH;
use crate::shape::{RotationTable, Shape};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Column of the reference cell for newly spawned pieces.
pub const SPAWN_X: i16 = GRID_WIDTH as i16 / 2;

/// A tetromino instance: its shape, rotation state and four absolute cells.
///
/// Every method returns a candidate copy. Nothing here knows about the grid,
/// so callers validate a candidate before committing it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub shape: Shape,
    pub angle: u8,
    pub cells: [Position; 4],
}

impl Piece {
    /// A fresh piece at angle 0 with its reference cell centered on row 0.
    pub fn spawn(shape: Shape) -> Self {
        Self::spawn_at(shape, SPAWN_X, 0)
    }

    /// A fresh piece at angle 0 with its reference cell at `(x, y)`.
    pub fn spawn_at(shape: Shape, x: i16, y: i16) -> Self {
        Self {
            shape,
            angle: 0,
            cells: shape
                .spawn_offsets()
                .map(|(dx, dy)| Position::new(x + dx, y + dy)),
        }
    }

    pub fn translate(&self, dx: i16, dy: i16) -> Self {
        Self {
            cells: self.cells.map(|p| Position::new(p.x + dx, p.y + dy)),
            ..*self
        }
    }

    pub fn rotate(&self, clockwise: bool) -> Self {
        let deltas = RotationTable::get().deltas(self.shape, self.angle, clockwise);
        let mut cells = self.cells;
        for (cell, (dx, dy)) in cells.iter_mut().zip(deltas) {
            cell.x += dx;
            cell.y += dy;
        }
        Self {
            shape: self.shape,
            angle: self.shape.next_angle(self.angle, clockwise),
            cells,
        }
    }

    /// Smallest y among the cells.
    pub fn top(&self) -> i16 {
        self.cells.iter().map(|p| p.y).min().unwrap_or(0)
    }

    pub fn left(&self) -> i16 {
        self.cells.iter().map(|p| p.x).min().unwrap_or(0)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}
