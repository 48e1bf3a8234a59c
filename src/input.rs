use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    TogglePause,
    Quit,
    Restart,
}

/// Directional actions, highest priority first.
const DIRECTIONAL: [Action; 4] = [
    Action::MoveRight,
    Action::MoveLeft,
    Action::RotateCw,
    Action::RotateCcw,
];

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Up => Some(Action::RotateCw),
        KeyCode::Down => Some(Action::RotateCcw),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        _ => None,
    }
}

/// Everything the driver acts on for a single frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub quit: bool,
    pub toggle_pause: bool,
    pub restart: bool,
    pub directional: Option<Action>,
}

impl FrameInput {
    pub fn action(action: Action) -> Self {
        let mut state = InputState::default();
        state.press(action);
        state.take_frame()
    }
}

/// Pending key presses between frames.
///
/// Each frame consumes at most one directional press, chosen by priority
/// (right, left, rotate clockwise, rotate counter-clockwise). Presses that
/// lose stay pending for the following frames. A key pressed several times
/// before it is consumed still counts once.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pending: [bool; 4],
    quit: bool,
    toggle_pause: bool,
    restart: bool,
}

impl InputState {
    pub fn press(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::TogglePause => self.toggle_pause = !self.toggle_pause,
            Action::Restart => self.restart = true,
            directional => {
                if let Some(slot) = DIRECTIONAL.iter().position(|&a| a == directional) {
                    self.pending[slot] = true;
                }
            }
        }
    }

    pub fn take_frame(&mut self) -> FrameInput {
        let first = self.pending.iter().position(|&held| held);
        let directional = first.map(|slot| {
            self.pending[slot] = false;
            DIRECTIONAL[slot]
        });

        FrameInput {
            quit: std::mem::take(&mut self.quit),
            toggle_pause: std::mem::take(&mut self.toggle_pause),
            restart: std::mem::take(&mut self.restart),
            directional,
        }
    }
}

// ============================================================================
// Input Source
// ============================================================================

pub trait InputSource {
    /// Collects input for up to `timeout`, then returns this frame's actions.
    ///
    /// The wait doubles as the frame's sleep.
    fn sample(&mut self, timeout: Duration) -> io::Result<FrameInput>;
}

#[derive(Default)]
pub struct CrosstermInput {
    state: InputState,
}

impl CrosstermInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for CrosstermInput {
    fn sample(&mut self, timeout: Duration) -> io::Result<FrameInput> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                // Repeats and releases are ignored: one press, one action.
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = action_for_key(key) {
                        self.state.press(action);
                    }
                }
            }
        }

        Ok(self.state.take_frame())
    }
}
