//! Coordinates: x grows left to right in `0..GRID_WIDTH`, y grows top to
//! bottom in `0..GRID_HEIGHT`. Row 0 is the spawn row.

use crate::piece::Position;
use crate::shape::Shape;

pub const GRID_WIDTH: usize = 20;
pub const GRID_HEIGHT: usize = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Shape),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

pub type Row = [Cell; GRID_WIDTH];

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: [Row; GRID_HEIGHT],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    /// True if `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < GRID_WIDTH && (pos.y as usize) < GRID_HEIGHT
    }

    /// True if the cell holds a locked block.
    ///
    /// Panics when `(x, y)` is out of bounds; use [`Grid::contains`] first.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y][x].is_filled()
    }

    /// True if every cell is inside the grid and unoccupied.
    pub fn fits(&self, cells: &[Position]) -> bool {
        cells
            .iter()
            .all(|&pos| self.contains(pos) && !self.is_occupied(pos.x as usize, pos.y as usize))
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Marks the four cells of a locked piece.
    pub fn place(&mut self, cells: &[Position; 4], shape: Shape) {
        for pos in cells {
            self.rows[pos.y as usize][pos.x as usize] = Cell::Filled(shape);
        }
    }

    pub fn row_is_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_filled())
    }

    /// Empties row `y` and drops every row above it by one.
    ///
    /// Row 0 comes back empty.
    pub fn clear_row(&mut self, y: usize) {
        self.rows.copy_within(0..y, 1);
        self.rows[0] = [Cell::Empty; GRID_WIDTH];
    }

    /// Removes every full row at or below `from_y` and returns how many went.
    ///
    /// Rows above `from_y` only ever slide down, so the scan restarts at
    /// `from_y` after each removal.
    pub fn clear_full_rows(&mut self, from_y: usize) -> u32 {
        let mut cleared = 0;
        while let Some(y) = (from_y..GRID_HEIGHT).find(|&y| self.row_is_full(y)) {
            self.clear_row(y);
            cleared += 1;
        }
        cleared
    }

    /// Loss condition: something locked into the spawn row.
    pub fn is_top_row_blocked(&self) -> bool {
        self.rows[0].iter().any(|cell| cell.is_filled())
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    pub fn clear(&mut self) {
        self.rows = [[Cell::Empty; GRID_WIDTH]; GRID_HEIGHT];
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
