use std::io::{self, stdout, Stdout};

use anyhow::{bail, Context, Result};
use crossterm::{
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::info;
use ratatui::backend::CrosstermBackend;

use blockfall::config::Settings;
use blockfall::driver::TickDriver;
use blockfall::game::{Game, RandomPieceProvider};
use blockfall::input::CrosstermInput;
use blockfall::ui::{Palette, TerminalPresenter, MIN_HEIGHT, MIN_WIDTH};

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::from_env().context("invalid environment settings")?;
    info!("starting with {settings:?}");

    let (width, height) = terminal::size().context("no terminal available")?;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        bail!("terminal is {width}x{height}, need at least {MIN_WIDTH}x{MIN_HEIGHT}");
    }

    let provider = match settings.seed {
        Some(seed) => RandomPieceProvider::seeded(seed),
        None => RandomPieceProvider::new(),
    };
    let game = Game::with_provider(Box::new(provider));

    enter_terminal().context("failed to set up the terminal")?;

    // Always try to restore the terminal, even if the loop failed.
    let result = run(game, Palette::new(settings.color_mode));
    let restored = leave_terminal();

    result.context("game loop failed")?;
    restored.context("failed to restore the terminal")?;
    Ok(())
}

fn run(game: Game, palette: Palette) -> io::Result<()> {
    let presenter: TerminalPresenter<CrosstermBackend<Stdout>> =
        TerminalPresenter::new(CrosstermBackend::new(stdout()), palette)?;
    let mut driver = TickDriver::new(game, CrosstermInput::new(), presenter);
    driver.run()
}

fn enter_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    if let Err(err) = stdout().execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err);
    }
    Ok(())
}

fn leave_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    stdout().execute(LeaveAlternateScreen)?;
    raw
}
