use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color as TermColor, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::field::{Field, Occupancy};
use crate::game::{Game, GameState};
use crate::shapes::Color;

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const EMPTY_CHAR: &str = "  ";

const LEFT_PROMPT_WIDTH: u16 = 21;
const RIGHT_PROMPT_WIDTH: u16 = 21;
const LOG_WIDTH: u16 = 50;
const SCREEN_TOP: u16 = 2;

const TITLE: [&str; 2] = ["Gogi's Tetris", "   is 300$"];

const HELP: [&str; 7] = [
    "Move left:     ←",
    "Move right:    →",
    "Speed up:      ↓",
    "Rotate:        ↑",
    "Close game:    esc",
    "Pause/resume:  p",
    "Restart:       n",
];

// ============================================================================
// Color Mapping
// ============================================================================

fn cell_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Cyan => TermColor::Cyan,
        Color::Magenta => TermColor::Magenta,
        Color::Blue => TermColor::Blue,
        Color::White => TermColor::White,
    }
}

fn state_prompt(state: GameState) -> Option<Span<'static>> {
    match state {
        GameState::Running => Some(Span::styled("Running", Style::default().fg(TermColor::Green))),
        GameState::Paused => Some(Span::styled("Paused", Style::default().fg(TermColor::Yellow))),
        GameState::Finished => Some(Span::styled("Game Over", Style::default().fg(TermColor::Red))),
        _ => None,
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render(frame: &mut Frame, game: &Game, debug: bool) {
    let area = frame.size();
    let field = game.field();

    let field_width = field.width() as u16 * CELL_WIDTH + 2;
    let field_height = field.height() as u16 + 2;
    let mut total_width = LEFT_PROMPT_WIDTH + field_width + RIGHT_PROMPT_WIDTH;
    if debug {
        total_width += LOG_WIDTH;
    }

    let main_area = top_centered_rect(total_width, field_height, area);

    let mut constraints = vec![
        Constraint::Length(LEFT_PROMPT_WIDTH),
        Constraint::Length(field_width),
        Constraint::Length(RIGHT_PROMPT_WIDTH),
    ];
    if debug {
        constraints.push(Constraint::Length(LOG_WIDTH));
    }
    let columns = Layout::horizontal(constraints).split(main_area);

    render_left_prompt(frame, game, columns[0]);
    render_field(frame, field, columns[1]);
    render_right_prompt(frame, columns[2]);
    if debug {
        render_log(frame, game, columns[3]);
    }
}

fn render_left_prompt(frame: &mut Frame, game: &Game, area: Rect) {
    let stats = game.stats();
    let mut lines = vec![
        state_prompt(game.state()).map(Line::from).unwrap_or_default(),
        Line::from(""),
        Line::from(format!("Level:  {:>4}", stats.level)),
        Line::from(format!("Time:   {:>4}", stats.elapsed as u64)),
        Line::from(format!("Blocks: {:>4}", stats.blocks)),
        Line::from(format!("Lines:  {:>4}", stats.lines)),
        Line::from(format!("Score:  {:>4}", stats.score)),
        Line::from(""),
        Line::from("Next block:"),
        Line::from(""),
    ];
    lines.extend(field_lines(game.preview(), "  "));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, area);
}

fn render_field(frame: &mut Frame, field: &Field, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(field_lines(field, "")), inner);
}

fn field_lines(field: &Field, indent: &'static str) -> Vec<Line<'static>> {
    field
        .rows()
        .map(|row| {
            let mut spans = vec![Span::raw(indent)];
            spans.extend(row.iter().map(|cell| {
                let style = match cell.occupancy {
                    Occupancy::Empty => Style::default(),
                    Occupancy::Moving | Occupancy::Fixed => {
                        Style::default().bg(cell_color(cell.color))
                    }
                };
                Span::styled(EMPTY_CHAR, style)
            }));
            Line::from(spans)
        })
        .collect()
}

fn render_right_prompt(frame: &mut Frame, area: Rect) {
    let title_style = Style::default().fg(TermColor::Yellow);
    let mut lines: Vec<Line> = TITLE
        .iter()
        .map(|line| Line::from(Span::styled(*line, title_style)))
        .collect();
    lines.push(Line::from(""));
    lines.extend(HELP.iter().map(|line| Line::from(*line)));

    let indent = 3u16.min(area.width);
    let inner = Rect {
        x: area.x + indent,
        width: area.width - indent,
        ..area
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_log(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .title(" Log ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .journal()
        .tail(inner.height as usize, inner.width.saturating_sub(1) as usize)
        .into_iter()
        .map(|entry| Line::from(format!(" {entry}")))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn top_centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let top = SCREEN_TOP.min(area.height);
    Rect {
        y: area.y + top,
        height: height.min(area.height - top),
        ..horizontal[1]
    }
}
