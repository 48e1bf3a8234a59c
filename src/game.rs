use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::grid::{Cell, Grid};
use crate::input::Action;
use crate::piece::Piece;
use crate::shape::Shape;

// ============================================================================
// Configuration
// ============================================================================

pub const LINES_PER_LEVEL: u32 = 10;

// Fall timing (in milliseconds): BASE - PER_LEVEL * level, never below MIN
pub const BASE_FALL_MS: u64 = 140;
pub const FALL_MS_PER_LEVEL: u64 = 20;
pub const MIN_FALL_MS: u64 = 20;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Running,
    Paused,
    Over,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

pub fn level_for_lines(lines: u32) -> u32 {
    1 + lines / LINES_PER_LEVEL
}

pub fn fall_interval_for_level(level: u32) -> Duration {
    let reduction = FALL_MS_PER_LEVEL.saturating_mul(u64::from(level));
    Duration::from_millis(BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS))
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> Shape;
}

/// Uniform shape selection from a generator seeded exactly once.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> Shape {
        Shape::random(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<Shape>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<Shape>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> Shape {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    pub grid: Grid,
    pub falling: Piece,
    pub next: Piece,
    pub lines: u32,
    pub mode: Mode,
    provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    /// The first shape drawn becomes the falling piece, the second the next.
    pub fn with_provider(mut provider: Box<dyn PieceProvider>) -> Self {
        let falling = Piece::spawn(provider.next_piece());
        let next = Piece::spawn(provider.next_piece());

        Self {
            grid: Grid::new(),
            falling,
            next,
            lines: 0,
            mode: Mode::Running,
            provider,
            events: Vec::new(),
        }
    }

    /// A game on a prepared grid. Later pieces come from a fixed seed.
    pub fn with_grid(grid: Grid, falling: Piece) -> Self {
        let mut provider = RandomPieceProvider::seeded(0);
        let next = Piece::spawn(provider.next_piece());

        Self {
            grid,
            falling,
            next,
            lines: 0,
            mode: Mode::Running,
            provider: Box::new(provider),
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        level_for_lines(self.lines)
    }

    pub fn fall_interval(&self) -> Duration {
        fall_interval_for_level(self.level())
    }

    pub fn is_over(&self) -> bool {
        self.mode == Mode::Over
    }

    pub fn is_paused(&self) -> bool {
        self.mode == Mode::Paused
    }

    /// One timed step: drop the falling piece a block, or lock it.
    pub fn tick(&mut self) {
        if self.mode != Mode::Running {
            return;
        }

        if !self.advance_fall() {
            self.lock_and_spawn();
        }
    }

    /// Moves the falling piece down one block if the cells below are free.
    pub fn advance_fall(&mut self) -> bool {
        self.try_commit(self.falling.translate(0, 1))
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i16) -> bool {
        if self.mode != Mode::Running {
            return false;
        }
        let moved = self.try_commit(self.falling.translate(dx, 0));
        if moved {
            self.events.push(GameEvent::PieceMoved);
        }
        moved
    }

    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if self.mode != Mode::Running {
            return false;
        }
        let rotated = self.try_commit(self.falling.rotate(clockwise));
        if rotated {
            self.events.push(GameEvent::PieceRotated);
        }
        rotated
    }

    fn try_commit(&mut self, candidate: Piece) -> bool {
        if self.grid.fits(&candidate.cells) {
            self.falling = candidate;
            true
        } else {
            false
        }
    }

    fn lock_piece(&mut self) {
        self.grid.place(&self.falling.cells, self.falling.shape);
        debug!("locked {:?} at {:?}", self.falling.shape, self.falling.cells);
        self.events.push(GameEvent::PieceLocked);
    }

    /// Clears full rows at or below `from_y` and credits them.
    pub fn clear_lines(&mut self, from_y: usize) -> u32 {
        let cleared = self.grid.clear_full_rows(from_y);
        if cleared > 0 {
            self.add_lines(cleared);
        }
        cleared
    }

    pub fn add_lines(&mut self, lines: u32) {
        let previous_level = self.level();
        self.lines += lines;
        self.events.push(GameEvent::LinesCleared(lines));

        let level = self.level();
        if level > previous_level {
            self.events.push(GameEvent::LevelUp(level));
        }
    }

    /// Promotes the next piece, draws a new one, then checks for a loss.
    pub fn spawn_next_piece(&mut self) {
        self.falling = self.next;
        self.next = Piece::spawn(self.provider.next_piece());
        debug!("spawned {:?}, next {:?}", self.falling.shape, self.next.shape);

        if self.grid.is_top_row_blocked() || !self.grid.fits(&self.falling.cells) {
            self.mode = Mode::Over;
            self.events.push(GameEvent::GameOver);
        }
    }

    fn lock_and_spawn(&mut self) {
        let top = self.falling.top().max(0) as usize;
        self.lock_piece();
        self.clear_lines(top);
        self.spawn_next_piece();
    }

    pub fn toggle_pause(&mut self) {
        match self.mode {
            Mode::Running => {
                self.mode = Mode::Paused;
                self.events.push(GameEvent::Paused);
            }
            Mode::Paused => {
                self.mode = Mode::Running;
                self.events.push(GameEvent::Unpaused);
            }
            Mode::Over => {
                // Cannot pause when game is over
            }
        }
    }

    pub fn restart(&mut self) {
        self.grid.clear();
        self.lines = 0;
        self.mode = Mode::Running;
        self.events.clear();

        self.falling = Piece::spawn(self.provider.next_piece());
        self.next = Piece::spawn(self.provider.next_piece());

        self.events.push(GameEvent::GameRestarted);
    }

    /// Applies one player action. Rejected moves are silently dropped.
    ///
    /// `Quit` belongs to the driver and is ignored here.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_left();
            }
            Action::MoveRight => {
                self.move_right();
            }
            Action::RotateCw => {
                self.rotate(true);
            }
            Action::RotateCcw => {
                self.rotate(false);
            }
            Action::TogglePause => self.toggle_pause(),
            Action::Restart if self.mode == Mode::Over => self.restart(),
            Action::Restart | Action::Quit => {}
        }
    }

    /// Returns the visual grid state with the falling piece overlaid
    pub fn render_grid(&self) -> Grid {
        let mut visual = self.grid.clone();
        for pos in self.falling.cells {
            if visual.contains(pos) {
                visual.set(pos.x as usize, pos.y as usize, Cell::Filled(self.falling.shape));
            }
        }
        visual
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::grid::GRID_WIDTH;

    pub fn empty_grid() -> Grid {
        Grid::new()
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..GRID_WIDTH {
            grid.set(x, y, Cell::Filled(Shape::T));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                grid.set(x, y, Cell::Filled(Shape::T));
            }
        }
    }

    /// A game whose pieces come from `shapes` in order, cycling.
    pub fn sequenced_game(shapes: &[Shape]) -> Game {
        Game::with_provider(Box::new(SequencePieceProvider::new(shapes.to_vec())))
    }
}
