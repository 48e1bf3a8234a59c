//! Tests for the frame loop, using scripted input and a recording presenter

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use blockfall::driver::TickDriver;
use blockfall::game::{test_helpers::*, Game, Mode};
use blockfall::input::{Action, FrameInput, InputSource};
use blockfall::piece::Piece;
use blockfall::shape::Shape;
use blockfall::ui::Presenter;

// ============================================================================
// Test Doubles
// ============================================================================

/// Replays one `FrameInput` per frame, then reports nothing.
struct ScriptedInput {
    frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, _timeout: Duration) -> io::Result<FrameInput> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

/// Remembers what it was asked to draw.
#[derive(Default)]
struct RecordingPresenter {
    modes: Vec<Mode>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, game: &Game) -> io::Result<()> {
        self.modes.push(game.mode);
        Ok(())
    }
}

struct FailingInput;

impl InputSource for FailingInput {
    fn sample(&mut self, _timeout: Duration) -> io::Result<FrameInput> {
        Err(io::Error::new(io::ErrorKind::Other, "terminal went away"))
    }
}

const NO_INPUT: [FrameInput; 0] = [];

fn quit() -> FrameInput {
    FrameInput {
        quit: true,
        ..FrameInput::default()
    }
}

fn driver(
    game: Game,
    frames: impl IntoIterator<Item = FrameInput>,
) -> TickDriver<ScriptedInput, RecordingPresenter> {
    TickDriver::new(game, ScriptedInput::new(frames), RecordingPresenter::default())
}

fn open_field_game() -> Game {
    Game::with_grid(empty_grid(), Piece::spawn_at(Shape::T, 5, 5))
}

// ============================================================================
// Lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn quit_stops_the_loop() {
        let mut driver = driver(open_field_game(), [quit()]);

        driver.run().unwrap();

        assert!(!driver.is_running());
        assert_eq!(driver.presenter().modes, vec![Mode::Running]);
    }

    #[test]
    fn every_frame_is_presented_before_input() {
        let frames = [FrameInput::default(), FrameInput::default(), quit()];
        let mut driver = driver(open_field_game(), frames);

        driver.run().unwrap();

        assert_eq!(driver.presenter().modes.len(), 3);
    }

    #[test]
    fn input_errors_end_the_run() {
        let mut driver = TickDriver::new(
            open_field_game(),
            FailingInput,
            RecordingPresenter::default(),
        );

        assert!(driver.run().is_err());
    }

    #[test]
    fn quit_works_while_paused() {
        let pause = FrameInput::action(Action::TogglePause);
        let mut driver = driver(open_field_game(), [pause, quit()]);

        driver.run().unwrap();

        assert!(!driver.is_running());
        assert_eq!(driver.game().mode, Mode::Paused);
    }
}

// ============================================================================
// Fall Timing
// ============================================================================

mod fall_timing {
    use super::*;

    #[test]
    fn piece_falls_once_the_interval_elapses() {
        let mut driver = driver(open_field_game(), NO_INPUT);
        let start = driver.game().falling;
        let interval = driver.game().fall_interval();

        driver.frame(interval - Duration::from_millis(1)).unwrap();
        assert_eq!(driver.game().falling, start);

        driver.frame(Duration::from_millis(1)).unwrap();
        assert_eq!(driver.game().falling, start.translate(0, 1));
    }

    #[test]
    fn timer_restarts_after_each_fall() {
        let mut driver = driver(open_field_game(), NO_INPUT);
        let start = driver.game().falling;
        let interval = driver.game().fall_interval();

        driver.frame(interval).unwrap();
        driver.frame(interval / 2).unwrap();

        assert_eq!(driver.game().falling, start.translate(0, 1));
    }

    #[test]
    fn short_frames_add_up() {
        let mut driver = driver(open_field_game(), NO_INPUT);
        let start = driver.game().falling;
        let interval = driver.game().fall_interval();
        let frames = (interval.as_millis() / 16 + 1) as usize;

        for _ in 0..frames {
            driver.frame(Duration::from_millis(16)).unwrap();
        }

        assert_eq!(driver.game().falling, start.translate(0, 1));
    }

    #[test]
    fn overshoot_carries_into_the_next_fall() {
        let mut driver = driver(open_field_game(), NO_INPUT);
        let start = driver.game().falling;
        let frame = Duration::from_millis(16);
        // Two rows are due after 240 ms at level 1 (120 ms interval)
        let frames = (2 * driver.game().fall_interval().as_millis() / 16) as usize;

        for _ in 0..frames {
            driver.frame(frame).unwrap();
        }

        assert_eq!(driver.game().falling, start.translate(0, 2));
    }

    #[test]
    fn stalled_frame_drops_a_single_row() {
        let mut driver = driver(open_field_game(), NO_INPUT);
        let start = driver.game().falling;
        let interval = driver.game().fall_interval();

        driver.frame(interval * 5).unwrap();
        assert_eq!(driver.game().falling, start.translate(0, 1));

        driver.frame(interval / 2).unwrap();
        assert_eq!(driver.game().falling, start.translate(0, 1));
    }

    #[test]
    fn pause_freezes_the_fall() {
        let pause = FrameInput::action(Action::TogglePause);
        let mut driver = driver(open_field_game(), [pause]);
        let start = driver.game().falling;

        driver.frame(Duration::ZERO).unwrap();
        for _ in 0..10 {
            driver.frame(Duration::from_secs(1)).unwrap();
        }

        assert!(driver.game().is_paused());
        assert_eq!(driver.game().falling, start);
    }

    #[test]
    fn resuming_continues_the_fall() {
        let pause = FrameInput::action(Action::TogglePause);
        let mut driver = driver(open_field_game(), [pause, pause]);
        let start = driver.game().falling;

        driver.frame(Duration::ZERO).unwrap();
        driver.frame(Duration::from_secs(1)).unwrap();
        assert_eq!(driver.game().mode, Mode::Running);
        assert_eq!(driver.game().falling, start);

        let interval = driver.game().fall_interval();
        driver.frame(interval).unwrap();
        assert_eq!(driver.game().falling, start.translate(0, 1));
    }
}

// ============================================================================
// Player Input
// ============================================================================

mod player_input {
    use super::*;

    #[test]
    fn directional_action_is_applied() {
        let frames = [
            FrameInput::action(Action::MoveRight),
            FrameInput::action(Action::MoveLeft),
            FrameInput::action(Action::MoveLeft),
        ];
        let mut driver = driver(open_field_game(), frames);
        let start = driver.game().falling;

        driver.frame(Duration::ZERO).unwrap();
        assert_eq!(driver.game().falling, start.translate(1, 0));

        driver.frame(Duration::ZERO).unwrap();
        driver.frame(Duration::ZERO).unwrap();
        assert_eq!(driver.game().falling, start.translate(-1, 0));
    }

    #[test]
    fn rotation_is_applied() {
        let frames = [FrameInput::action(Action::RotateCw)];
        let mut driver = driver(open_field_game(), frames);

        driver.frame(Duration::ZERO).unwrap();

        assert_eq!(driver.game().falling.angle, 1);
    }

    #[test]
    fn directional_input_ignored_while_paused() {
        let mut paused = FrameInput::action(Action::TogglePause);
        paused.directional = Some(Action::MoveRight);
        let frames = [paused, FrameInput::action(Action::MoveLeft)];
        let mut driver = driver(open_field_game(), frames);
        let start = driver.game().falling;

        driver.frame(Duration::ZERO).unwrap();
        driver.frame(Duration::ZERO).unwrap();

        assert_eq!(driver.game().falling, start);
    }

    #[test]
    fn restart_only_after_game_over() {
        let restart = FrameInput::action(Action::Restart);
        let mut game = open_field_game();
        game.lines = 4;
        let mut driver = driver(game, [restart]);

        driver.frame(Duration::ZERO).unwrap();
        assert_eq!(driver.game().lines, 4);
    }

    #[test]
    fn restart_after_game_over_starts_fresh() {
        let mut game = sequenced_game(&[Shape::O, Shape::T]);
        fill_row(&mut game.grid, 1);
        game.spawn_next_piece();
        assert!(game.is_over());

        let restart = FrameInput::action(Action::Restart);
        let mut driver = driver(game, [FrameInput::default(), restart]);

        // Nothing falls once the game is over
        driver.frame(Duration::from_secs(5)).unwrap();
        assert!(driver.game().is_over());

        driver.frame(Duration::ZERO).unwrap();
        assert_eq!(driver.game().mode, Mode::Running);
        assert_eq!(driver.game().grid.occupied_count(), 0);
        assert_eq!(driver.game().lines, 0);
    }

    #[test]
    fn pause_ignored_after_game_over() {
        let mut game = open_field_game();
        game.mode = Mode::Over;
        let pause = FrameInput::action(Action::TogglePause);
        let mut driver = driver(game, [pause]);

        driver.frame(Duration::ZERO).unwrap();

        assert_eq!(driver.game().mode, Mode::Over);
    }
}
