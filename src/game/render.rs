//! Minefield drawing: flag counter, bordered board, cell glyphs.

use super::{Cell, Minesweeper};
use crate::theme::Theme;
use crate::ui::{draw_line, text_width};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

/// Rows above the board: title, status, top border.
const FIELD_TOP: u16 = 3;

const DIGITS: [&str; 9] = ["•", "1", "2", "3", "4", "5", "6", "7", "8"];

/// `stopped` reveals unflagged mines and wrong flags.
pub(super) fn draw_minefield(
    frame: &mut Frame,
    game: &Minesweeper,
    area: Rect,
    theme: &Theme,
    stopped: bool,
) {
    let count = format!("!: {:>3}/{}", game.flags_placed(), game.total_mines());
    let col = area.width.saturating_sub(text_width(&count) + 8);
    draw_line(frame, area, 0, col, &count, theme.title_style());

    let grid = game.grid();
    let (w, h) = (grid.width() as u16, grid.height() as u16);
    let x_off = area.width.saturating_sub(w) / 2;

    let border = Rect {
        x: area.x + x_off.saturating_sub(1),
        y: area.y + FIELD_TOP - 1,
        width: w + 2,
        height: h + 2,
    }
    .intersection(area);
    Block::bordered()
        .border_style(theme.border_style())
        .render(border, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for pos in grid.positions() {
        let (symbol, mut style) = cell_glyph(grid[pos], stopped, theme);
        if pos == game.cursor() || game.is_highlighted(pos) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let x = area.x + x_off + pos.0 as u16;
        let y = area.y + FIELD_TOP + pos.1 as u16;
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }
}

fn cell_glyph(cell: Cell, stopped: bool, theme: &Theme) -> (&'static str, Style) {
    if cell.clear {
        let n = cell.adjacent_mines;
        let style = Style::default().fg(theme.number_color(n));
        return (DIGITS[usize::from(n).min(8)], style);
    }
    match (cell.flag, cell.mine) {
        (true, false) if stopped => ("x", theme.text_style()),
        (true, _) => ("!", theme.danger_style()),
        (false, true) if stopped => ("*", Style::default().fg(theme.danger)),
        _ => (" ", theme.text_style()),
    }
}
