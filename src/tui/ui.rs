//! Stateless UI rendering for checkers.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::view::{BoardView, Hud, SquareView};
use crate::games::checkers::{self, BOARD_SIZE, PieceKind};
use crate::interaction::{Notice, Phase};

/// Terminal columns per board square.
pub const SQUARE_WIDTH: u16 = 5;
/// Terminal rows per board square.
pub const SQUARE_HEIGHT: u16 = 2;

const BOARD_FRAME_WIDTH: u16 = SQUARE_WIDTH * BOARD_SIZE as u16 + 2;
const BOARD_FRAME_HEIGHT: u16 = SQUARE_HEIGHT * BOARD_SIZE as u16 + 2;

const LIGHT_SQUARE: Color = Color::Rgb(229, 203, 180);
const DARK_SQUARE: Color = Color::Rgb(115, 77, 50);

/// Screen regions.
#[derive(Debug, Clone, Copy)]
pub struct ScreenLayout {
    /// Title bar.
    pub title: Rect,
    /// Turn line.
    pub hud: Rect,
    /// Bordered board frame.
    pub board: Rect,
    /// Notice line.
    pub status: Rect,
    /// Key help.
    pub help: Rect,
}

/// Splits the frame. Input hit-testing uses the same regions.
pub fn layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                  // Title
            Constraint::Length(1),                  // HUD
            Constraint::Min(BOARD_FRAME_HEIGHT),    // Board
            Constraint::Length(3),                  // Status
            Constraint::Length(1),                  // Help
        ])
        .split(area);

    ScreenLayout {
        title: chunks[0],
        hud: chunks[1],
        board: center_rect(chunks[2], BOARD_FRAME_WIDTH, BOARD_FRAME_HEIGHT),
        status: chunks[3],
        help: chunks[4],
    }
}

/// Renders one frame.
pub fn draw(frame: &mut Frame, view: &BoardView) {
    let regions = layout(frame.area());

    let title = Paragraph::new("Strictly Games - Checkers")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, regions.title);

    frame.render_widget(hud_line(view.hud.as_ref(), view.phase), regions.hud);
    draw_board(frame, regions.board, view);

    let (text, style) = notice_line(view.notice.as_ref());
    let status = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, regions.status);

    let help = Paragraph::new(
        "Click or arrows+Enter: select/move | P: pause | R: retry | F: refresh | Q: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, regions.help);

    if view.paused {
        draw_pause_overlay(frame, regions.board);
    }
}

fn hud_line(hud: Option<&Hud>, phase: Phase) -> Paragraph<'static> {
    let Some(hud) = hud else {
        return Paragraph::new("Loading board...").alignment(Alignment::Center);
    };

    let mut spans = vec![
        Span::raw("Turn: "),
        Span::styled(
            format!("{} ({})", hud.player, hud.color),
            Style::default()
                .fg(piece_color(hud.color))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    match hud.game_over {
        Some(Some(winner)) => spans.push(Span::styled(
            format!("  GAME OVER - {} wins", winner),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Some(None) => spans.push(Span::styled(
            "  GAME OVER - draw",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        None => {}
    }
    if hud.double_jump {
        spans.push(Span::styled(
            "  Double jump required!",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if phase == Phase::Submitting {
        spans.push(Span::styled(
            "  Submitting move...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn notice_line(notice: Option<&Notice>) -> (String, Style) {
    match notice {
        None => (String::new(), Style::default()),
        Some(Notice::Info(text)) => (text.clone(), Style::default().fg(Color::Yellow)),
        Some(Notice::Rejected(text)) => (
            format!("Move rejected: {}", text),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(Notice::Transport { message, retry }) => {
            let hint = if retry.is_some() {
                " (press R to retry)"
            } else {
                ""
            };
            (
                format!("{}{}", message, hint),
                Style::default().fg(Color::Magenta),
            )
        }
    }
}

fn draw_board(frame: &mut Frame, area: Rect, view: &BoardView) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for row in &view.squares {
        for square in row {
            let cell = Rect::new(
                inner.x + u16::from(square.position.x()) * SQUARE_WIDTH,
                inner.y + u16::from(square.position.y()) * SQUARE_HEIGHT,
                SQUARE_WIDTH,
                SQUARE_HEIGHT,
            )
            .intersection(frame.area());
            if cell.is_empty() {
                continue;
            }
            draw_square(frame, cell, square);
        }
    }
}

fn draw_square(frame: &mut Frame, area: Rect, square: &SquareView) {
    let background = if square.selected {
        Color::Yellow
    } else if square.destination {
        Color::Green
    } else if square.dark {
        DARK_SQUARE
    } else {
        LIGHT_SQUARE
    };

    let (symbol, fg) = match square.piece {
        Some(piece) => (
            match piece.kind {
                PieceKind::Pawn => "●",
                PieceKind::King => "♛",
            },
            piece_color(piece.color),
        ),
        None if square.destination => ("·", Color::White),
        None => (" ", background),
    };

    let mut style = Style::default().bg(background).fg(fg).add_modifier(Modifier::BOLD);
    if square.cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }

    // Vertically center on the lower line of a two-line square.
    let text = vec![Line::from(""), Line::from(symbol)];
    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_pause_overlay(frame: &mut Frame, board: Rect) {
    let area = center_rect(board, 30, 3).intersection(frame.area());
    if area.is_empty() {
        return;
    }
    frame.render_widget(Clear, area);
    let overlay = Paragraph::new("Paused: press P to resume")
        .style(Style::default().fg(Color::Black).bg(Color::LightYellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(overlay, area);
}

fn piece_color(color: checkers::Color) -> Color {
    match color {
        checkers::Color::Black => Color::Black,
        checkers::Color::Red => Color::Red,
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
