use std::io;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::config::ColorMode;
use crate::game::{Game, Mode};
use crate::grid::{Cell, GRID_HEIGHT, GRID_WIDTH};
use crate::piece::{Piece, Position};
use crate::shape::Shape;

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const UPPER_CHAR: &str = "▀▀";
const LOWER_CHAR: &str = "▄▄";
const EMPTY_CHAR: &str = "  ";

const BOARD_WIDTH: u16 = GRID_WIDTH as u16 * CELL_WIDTH + 2;
const BOARD_HEIGHT: u16 = (GRID_HEIGHT as u16 + 1) / 2 + 2;
const SIDEBAR_WIDTH: u16 = 16;
const PREVIEW_SIZE: usize = 4;

/// Smallest terminal that shows the whole playfield and sidebar.
pub const MIN_WIDTH: u16 = BOARD_WIDTH + SIDEBAR_WIDTH;
pub const MIN_HEIGHT: u16 = BOARD_HEIGHT;

// ============================================================================
// Color Mapping
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    mode: ColorMode,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    pub fn color(&self, shape: Shape) -> Color {
        match self.mode {
            ColorMode::Ansi => match shape {
                Shape::G => Color::Blue,
                Shape::I => Color::Cyan,
                Shape::L => Color::LightRed,
                Shape::O => Color::Yellow,
                Shape::S => Color::Green,
                Shape::T => Color::Magenta,
                Shape::Z => Color::Red,
            },
            ColorMode::Rgb => match shape {
                Shape::G => Color::Rgb(40, 90, 220),
                Shape::I => Color::Rgb(0, 200, 220),
                Shape::L => Color::Rgb(255, 150, 0),
                Shape::O => Color::Rgb(240, 210, 0),
                Shape::S => Color::Rgb(40, 190, 60),
                Shape::T => Color::Rgb(160, 60, 200),
                Shape::Z => Color::Rgb(220, 40, 40),
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorMode::Ansi)
    }
}

// ============================================================================
// Presenter
// ============================================================================

/// Draws the game. Gets read-only access and reports nothing back.
pub trait Presenter {
    fn present(&mut self, game: &Game) -> io::Result<()>;
}

pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
}

impl<B: Backend> TerminalPresenter<B> {
    pub fn new(backend: B, palette: Palette) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            palette,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Presenter for TerminalPresenter<B> {
    fn present(&mut self, game: &Game) -> io::Result<()> {
        let palette = self.palette;
        self.terminal.draw(|frame| render(frame, game, &palette))?;
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render(frame: &mut Frame, game: &Game, palette: &Palette) {
    let area = centered_rect(MIN_WIDTH, MIN_HEIGHT, frame.size());

    // Layout: [Board][Sidebar]
    let horizontal = Layout::horizontal([
        Constraint::Length(BOARD_WIDTH),
        Constraint::Length(SIDEBAR_WIDTH),
    ])
    .split(area);

    render_board(frame, game, palette, horizontal[0]);
    render_sidebar(frame, game, palette, horizontal[1]);

    match game.mode {
        Mode::Running => {}
        Mode::Paused => render_banner(frame, horizontal[0], "PAUSED", Color::Yellow, "P to resume"),
        Mode::Over => render_banner(frame, horizontal[0], "GAME OVER", Color::Red, "R to restart"),
    }
}

fn render_board(frame: &mut Frame, game: &Game, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visual = game.render_grid();
    let lines = half_block_lines(GRID_WIDTH, GRID_HEIGHT, palette, |x, y| {
        match visual.get(x, y) {
            Cell::Filled(shape) => Some(shape),
            Cell::Empty => None,
        }
    });

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_sidebar(frame: &mut Frame, game: &Game, palette: &Palette, area: Rect) {
    let vertical = Layout::vertical([
        Constraint::Length(PREVIEW_SIZE as u16 / 2 + 2),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .split(area);

    render_preview(frame, &game.next, palette, vertical[0]);
    render_info(frame, game, vertical[1]);

    let controls = Paragraph::new(vec![
        Line::from("←→ move"),
        Line::from("↑↓ rotate"),
        Line::from("P pause"),
        Line::from("Esc quit"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[2]);
}

fn render_preview(frame: &mut Frame, next: &Piece, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Normalise the spawn cells into a small box anchored at (0, 0).
    let (left, top) = (next.left(), next.top());
    let lines = half_block_lines(PREVIEW_SIZE, PREVIEW_SIZE, palette, |x, y| {
        let pos = Position::new(left + x as i16, top + y as i16);
        next.contains(pos).then_some(next.shape)
    });

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let lines = vec![
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines)),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn render_banner(frame: &mut Frame, area: Rect, title: &str, color: Color, hint: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled("Esc to quit", Style::default().fg(Color::DarkGray))),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(22, 7, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Packs pairs of rows into half-block glyphs: top cell as foreground,
/// bottom cell as background.
fn half_block_lines(
    width: usize,
    height: usize,
    palette: &Palette,
    shape_at: impl Fn(usize, usize) -> Option<Shape>,
) -> Vec<Line<'static>> {
    (0..height)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span> = (0..width)
                .map(|x| {
                    let top = shape_at(x, y);
                    let bottom = if y + 1 < height { shape_at(x, y + 1) } else { None };
                    half_block(top, bottom, palette)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn half_block(top: Option<Shape>, bottom: Option<Shape>, palette: &Palette) -> Span<'static> {
    match (top, bottom) {
        (None, None) => Span::raw(EMPTY_CHAR),
        (Some(top), None) => Span::styled(UPPER_CHAR, Style::default().fg(palette.color(top))),
        (None, Some(bottom)) => {
            Span::styled(LOWER_CHAR, Style::default().fg(palette.color(bottom)))
        }
        (Some(top), Some(bottom)) => Span::styled(
            UPPER_CHAR,
            Style::default()
                .fg(palette.color(top))
                .bg(palette.color(bottom)),
        ),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
