use std::io;
use std::time::{Duration, Instant};

use log::{info, trace};

use crate::game::{Game, GameEvent, Mode};
use crate::input::InputSource;
use crate::ui::Presenter;

// ============================================================================
// Configuration
// ============================================================================

/// Upper bound on the wait for input in one frame.
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

// ============================================================================
// Tick Driver
// ============================================================================

/// Owns the game. Each frame draws, advances the fall timer, then samples
/// input; the input wait is the frame's sleep.
pub struct TickDriver<I: InputSource, P: Presenter> {
    game: Game,
    input: I,
    presenter: P,
    fall_timer: Duration,
    running: bool,
}

impl<I: InputSource, P: Presenter> TickDriver<I, P> {
    pub fn new(game: Game, input: I, presenter: P) -> Self {
        Self {
            game,
            input,
            presenter,
            fall_timer: Duration::ZERO,
            running: true,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs frames until a quit is requested.
    pub fn run(&mut self) -> io::Result<()> {
        let mut last_frame = Instant::now();

        while self.running {
            let now = Instant::now();
            let elapsed = now.duration_since(last_frame);
            last_frame = now;

            self.frame(elapsed)?;
        }

        info!("quit after {} lines", self.game.lines);
        Ok(())
    }

    /// One frame, with `elapsed` the time since the previous one.
    pub fn frame(&mut self, elapsed: Duration) -> io::Result<()> {
        self.presenter.present(&self.game)?;

        if self.game.mode == Mode::Running {
            self.fall_timer += elapsed;
            let interval = self.game.fall_interval();
            if self.fall_timer >= interval {
                // Overshoot carries into the next row; a stalled frame still drops only one.
                self.fall_timer -= interval;
                if self.fall_timer >= interval {
                    self.fall_timer = Duration::ZERO;
                }
                trace!("fall tick at level {}", self.game.level());
                self.game.tick();
            }
        }

        let input = self.input.sample(FRAME_PERIOD)?;

        if input.quit {
            self.running = false;
        }
        if input.toggle_pause && self.game.mode != Mode::Over {
            self.game.toggle_pause();
        }
        if input.restart && self.game.mode == Mode::Over {
            self.game.restart();
            self.fall_timer = Duration::ZERO;
        }
        if self.game.mode == Mode::Running {
            if let Some(action) = input.directional {
                self.game.apply(action);
            }
        }

        self.log_events();
        Ok(())
    }

    fn log_events(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::LinesCleared(count) => {
                    info!("cleared {count} line(s), {} total", self.game.lines)
                }
                GameEvent::LevelUp(level) => info!("level {level}"),
                GameEvent::Paused => info!("paused"),
                GameEvent::Unpaused => info!("resumed"),
                GameEvent::GameRestarted => info!("new game"),
                GameEvent::GameOver => {
                    info!("game over at level {} with {} lines", self.game.level(), self.game.lines)
                }
                GameEvent::PieceLocked | GameEvent::PieceMoved | GameEvent::PieceRotated => {}
            }
        }
    }
}
