//! Minesweeper board: lazy mine placement, cascade clear, chord clear, flags, win/loss.

use crate::app::Game;
use crate::error::GameError;
use crate::grid::{Grid, Pos};
use crate::input::{Action, Binding, key_to_binding};
use crate::session::{Outcome, State};
use crate::theme::Theme;
use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ratatui::Frame;
use ratatui::layout::Rect;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::{Duration, Instant};

mod render;

pub const BOARD_WIDTH: usize = 32;
pub const BOARD_HEIGHT: usize = 16;
pub const BOARD_MINES: usize = 100;

/// How long chord feedback stays highlighted.
pub const HIGHLIGHT_TIMEOUT: Duration = Duration::from_millis(500);

const HELP_LINES: &[&str] = &[
    "?           Show this help screen",
    "Q           Quit the game (requires confirmation)",
    "P           Pause the game",
    "N           Start a new game",
    "",
    "W, A, S, D  Move the cursor",
    "J           Clear a cell",
    "K           Flag a cell",
];

/// One board square. `adjacent_mines` stays 0 on mine cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub mine: bool,
    pub clear: bool,
    pub flag: bool,
    pub adjacent_mines: u8,
}

#[derive(Debug, Clone)]
struct Highlight {
    cells: HashSet<Pos>,
    expires: Instant,
}

#[derive(Debug)]
pub struct Minesweeper {
    grid: Grid<Cell>,
    cursor: Pos,
    total_mines: usize,
    /// Number of cells the player has flagged.
    flags_placed: usize,
    /// Mines go down on the first clear so it can never hit one.
    placed_mines: bool,
    highlight: Option<Highlight>,
    outcome: Option<Outcome>,
    rng: StdRng,
}

impl Minesweeper {
    pub fn new(
        width: usize,
        height: usize,
        mines: usize,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        let grid = Grid::new(width, height)?;
        Ok(Self {
            cursor: (width / 2, height / 2),
            grid,
            total_mines: mines,
            flags_placed: 0,
            placed_mines: false,
            highlight: None,
            outcome: None,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        })
    }

    /// Throw the old board away and start a fresh one of the same size.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.grid = Grid::new(self.grid.width(), self.grid.height())?;
        self.cursor = (self.grid.width() / 2, self.grid.height() / 2);
        self.flags_placed = 0;
        self.placed_mines = false;
        self.highlight = None;
        self.outcome = None;
        Ok(())
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn total_mines(&self) -> usize {
        self.total_mines
    }

    pub fn flags_placed(&self) -> usize {
        self.flags_placed
    }

    pub fn is_highlighted(&self, pos: Pos) -> bool {
        self.highlight
            .as_ref()
            .is_some_and(|h| h.cells.contains(&pos))
    }

    /// Move the cursor by a relative step. Steps off the board are ignored.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) -> bool {
        match self.grid.offset(self.cursor, dx, dy) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    /// Toggle the flag on an uncleared cell. There is no cap on the number of flags.
    pub fn flag_cell(&mut self, pos: Pos) {
        let cell = &mut self.grid[pos];
        if cell.clear {
            return;
        }
        cell.flag = !cell.flag;
        if cell.flag {
            self.flags_placed += 1;
        } else {
            self.flags_placed -= 1;
        }
    }

    /// Clear a cell, placing mines first if this is the opening move.
    ///
    /// Flagged cells are left alone, cleared cells chord instead, and a mine ends the game.
    pub fn clear_cell(&mut self, pos: Pos, now: Instant) -> Result<(), GameError> {
        if !self.placed_mines {
            self.place_mines(pos)?;
        }

        let cell = self.grid[pos];
        if cell.flag {
            return Ok(());
        }
        if cell.clear {
            return self.clear_neighbors(pos, now);
        }
        if cell.mine {
            tracing::info!(?pos, "cleared a mine");
            self.outcome = Some(Outcome::Lost);
            return Ok(());
        }

        self.reveal(pos);
        if self.grid.iter().all(|c| c.clear || c.mine) {
            self.win();
        }
        Ok(())
    }

    /// Chord on a cleared cell: compare flagged neighbours with its mine count.
    ///
    /// Equal clears every unflagged neighbour; too few flags highlights the
    /// candidates still open; too many highlights the flags to review.
    pub fn clear_neighbors(&mut self, pos: Pos, now: Instant) -> Result<(), GameError> {
        let cell = self.grid[pos];
        if !cell.clear {
            return Ok(());
        }

        let flags = self.grid.neighbors(pos).filter(|&n| self.grid[n].flag).count();

        match flags.cmp(&usize::from(cell.adjacent_mines)) {
            Ordering::Equal => {
                for n in self.grid.neighbors(pos) {
                    if self.outcome.is_some() {
                        break;
                    }
                    let neighbor = self.grid[n];
                    if !(neighbor.clear || neighbor.flag) {
                        self.clear_cell(n, now)?;
                    }
                }
            }
            Ordering::Less => {
                let open = self
                    .grid
                    .neighbors(pos)
                    .filter(|&n| !self.grid[n].flag && !self.grid[n].clear)
                    .collect();
                self.highlight_cells(open, HIGHLIGHT_TIMEOUT, now);
            }
            Ordering::Greater => {
                let flagged = self
                    .grid
                    .neighbors(pos)
                    .filter(|&n| self.grid[n].flag && !self.grid[n].clear)
                    .collect();
                self.highlight_cells(flagged, HIGHLIGHT_TIMEOUT, now);
            }
        }
        Ok(())
    }

    /// Scatter `total_mines` mines uniformly, keeping `pos` and its neighbours safe.
    pub fn place_mines(&mut self, pos: Pos) -> Result<(), GameError> {
        let safe: HashSet<Pos> = self.grid.neighbors(pos).chain(std::iter::once(pos)).collect();
        let candidates: Vec<Pos> = self
            .grid
            .positions()
            .filter(|p| !safe.contains(p))
            .collect();

        if candidates.len() < self.total_mines {
            tracing::error!(
                mines = self.total_mines,
                slots = candidates.len(),
                "mine placement does not fit"
            );
            return Err(GameError::TooManyMines {
                mines: self.total_mines,
                slots: candidates.len(),
            });
        }

        let mines: Vec<Pos> = candidates
            .choose_multiple(&mut self.rng, self.total_mines)
            .copied()
            .collect();
        tracing::debug!(mines = mines.len(), anchor = ?pos, "placing mines");
        self.lay_mines(mines);
        Ok(())
    }

    /// Put mines on exactly the given positions and count neighbours for the rest.
    pub fn lay_mines(&mut self, mines: impl IntoIterator<Item = Pos>) {
        for pos in mines {
            self.grid[pos].mine = true;
        }
        for pos in self.grid.positions() {
            if self.grid[pos].mine {
                continue;
            }
            let count = self.grid.neighbors(pos).filter(|&n| self.grid[n].mine).count();
            self.grid[pos].adjacent_mines = count as u8;
        }
        self.placed_mines = true;
    }

    /// Flood-fill clear from a safe cell through zero-count cells. A flag the
    /// fill reaches is taken off and counted back.
    fn reveal(&mut self, start: Pos) {
        let mut pending = vec![start];
        while let Some(pos) = pending.pop() {
            let cell = &mut self.grid[pos];
            if cell.clear {
                continue;
            }
            assert!(!cell.mine, "cascade reached mine at {:?}", pos);

            if cell.flag {
                cell.flag = false;
                self.flags_placed -= 1;
            }
            cell.clear = true;
            if cell.adjacent_mines == 0 {
                pending.extend(self.grid.neighbors(pos).filter(|&n| !self.grid[n].clear));
            }
        }
    }

    /// Every safe cell is clear. Remaining mines get flagged for display; the
    /// flag counter keeps the player's own count.
    fn win(&mut self) {
        for cell in self.grid.iter_mut().filter(|c| c.mine) {
            cell.flag = true;
        }
        self.outcome = Some(Outcome::Won);
    }

    /// Replace any current highlight.
    pub fn highlight_cells(&mut self, cells: HashSet<Pos>, timeout: Duration, now: Instant) {
        self.highlight = Some(Highlight {
            cells,
            expires: now + timeout,
        });
    }

    /// Drop the highlight once expired. Returns true if something was removed.
    pub fn expire_highlight(&mut self, now: Instant) -> bool {
        if self.highlight.as_ref().is_some_and(|h| h.expires < now) {
            self.highlight = None;
            return true;
        }
        false
    }
}

impl Game for Minesweeper {
    type Action = Action;

    const TITLE: &'static str = "Minesweeper";

    fn binding(&self, key: KeyCode) -> Option<Binding<Action>> {
        key_to_binding(key)
    }

    fn start_game(&mut self) -> Result<(), GameError> {
        self.reset()?;
        tracing::info!(
            width = self.grid.width(),
            height = self.grid.height(),
            mines = self.total_mines,
            "new board"
        );
        Ok(())
    }

    fn perform(&mut self, action: Action, now: Instant) -> Result<Option<Outcome>, GameError> {
        let before = self.outcome;
        match action {
            Action::Move { dx, dy } => {
                self.move_cursor(dx, dy);
            }
            Action::Clear => self.clear_cell(self.cursor, now)?,
            Action::Flag => self.flag_cell(self.cursor),
        }
        Ok(if before.is_none() { self.outcome } else { None })
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect, theme: &Theme, state: State) {
        render::draw_minefield(frame, self, area, theme, matches!(state, State::Stopped(_)));
    }

    fn draw_stopped(&self, frame: &mut Frame, area: Rect, theme: &Theme, outcome: Outcome) {
        render::draw_minefield(frame, self, area, theme, true);
        let text = match outcome {
            Outcome::Won => "You won!",
            Outcome::Lost => "You lose",
        };
        crate::ui::draw_centered(frame, area, 1, text, theme.text_style());
    }

    fn help_lines(&self) -> &'static [&'static str] {
        HELP_LINES
    }

    fn min_size(&self) -> (u16, u16) {
        let cols = (self.grid.width() + 2).max(40);
        let rows = self.grid.height() + 5;
        (cols as u16, rows as u16)
    }

    fn after_tick(&mut self, now: Instant) -> bool {
        self.expire_highlight(now)
    }
}
