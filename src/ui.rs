//! Layout and drawing: title bar, clock, field, pause/help/stopped views, message line.

use crate::app::Game;
use crate::grab::PauseView;
use crate::session::{Session, State, time_str};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use std::time::Instant;

const TOO_SMALL: &str = "Screen is too small";

/// Draw a whole frame. Returns false when the terminal is too small and only
/// the fallback line was drawn.
pub fn draw<G: Game>(
    frame: &mut Frame,
    game: &G,
    session: &Session,
    theme: &Theme,
    now: Instant,
) -> bool {
    let area = frame.area();
    let (min_cols, min_rows) = game.min_size();
    if area.width < min_cols || area.height < min_rows {
        tracing::debug!(
            cols = area.width,
            rows = area.height,
            min_cols,
            min_rows,
            "terminal too small"
        );
        draw_too_small(frame, area);
        return false;
    }

    draw_title(frame, area, G::TITLE, theme);
    draw_clock(frame, area, &time_str(session.elapsed(now)), theme);

    match session.state() {
        State::Paused(PauseView::Plain) => {
            draw_centered(frame, area, area.height / 2, "Paused", theme.text_style());
        }
        State::Paused(PauseView::Help) => draw_help(frame, area, game.help_lines(), theme),
        State::Stopped(outcome) => game.draw_stopped(frame, area, theme, outcome),
        state @ State::Playing => game.draw_field(frame, area, theme, state),
    }

    if let Some(message) = session.message() {
        draw_line(
            frame,
            area,
            area.height - 1,
            0,
            message,
            theme.text_style().add_modifier(Modifier::BOLD),
        );
    }
    true
}

fn draw_too_small(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    draw_line(
        frame,
        area,
        area.height - 1,
        0,
        TOO_SMALL,
        Style::default().add_modifier(Modifier::BOLD),
    );
}

/// Reversed bar across row 0 with the title at column 1.
fn draw_title(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let bar = Rect { height: 1, ..area };
    frame.buffer_mut().set_style(bar, theme.title_style());
    draw_line(frame, area, 0, 1, title, theme.title_style());
}

fn draw_clock(frame: &mut Frame, area: Rect, clock: &str, theme: &Theme) {
    let col = area.width.saturating_sub(text_width(clock) + 1);
    draw_line(frame, area, 0, col, clock, theme.title_style());
}

fn draw_help(frame: &mut Frame, area: Rect, lines: &[&str], theme: &Theme) {
    let block_rows = lines.len() as u16 + 2;
    let top = (area.height.saturating_sub(block_rows) / 2).max(1);
    let widest = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
    let left = area.width.saturating_sub(widest) / 2;

    draw_centered(
        frame,
        area,
        top,
        "HELP",
        theme.text_style().add_modifier(Modifier::BOLD),
    );
    for (row, line) in (top + 2..).zip(lines) {
        draw_line(frame, area, row, left, line, theme.text_style());
    }
}

/// Draw `text` horizontally centred on `row` of `area`.
pub fn draw_centered(frame: &mut Frame, area: Rect, row: u16, text: &str, style: Style) {
    let col = area.width.saturating_sub(text_width(text)) / 2;
    draw_line(frame, area, row, col, text, style);
}

/// Draw `text` at `(row, col)` relative to `area`, clipped to it.
pub(crate) fn draw_line(
    frame: &mut Frame,
    area: Rect,
    row: u16,
    col: u16,
    text: &str,
    style: Style,
) {
    if row >= area.height || col >= area.width {
        return;
    }
    let max_width = usize::from(area.width - col);
    frame
        .buffer_mut()
        .set_stringn(area.x + col, area.y + row, text, max_width, style);
}

pub(crate) fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}
