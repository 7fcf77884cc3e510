//! App: the `Game` capability and the turn loop that drives it.

use crate::error::GameError;
use crate::grab::{Command, Effect, PauseView};
use crate::input::Binding;
use crate::session::{Outcome, Repaint, Session, State};
use crate::terminal::{self, Input, Surface};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Upper bound on how long one tick waits for input.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// What a concrete game must provide to run inside [`App`].
pub trait Game {
    type Action: Copy + Debug;

    /// Shown at the left of the title bar.
    const TITLE: &'static str;

    /// Binding for a raw key; `None` leaves the key unbound.
    fn binding(&self, key: KeyCode) -> Option<Binding<Self::Action>>;

    /// Set up a fresh board. Called at startup and for every new game.
    fn start_game(&mut self) -> Result<(), GameError>;

    /// Apply a game action. Returns the outcome when this action finished the game.
    fn perform(&mut self, action: Self::Action, now: Instant)
    -> Result<Option<Outcome>, GameError>;

    fn draw_field(&self, frame: &mut Frame, area: Rect, theme: &Theme, state: State);

    fn draw_stopped(&self, frame: &mut Frame, area: Rect, theme: &Theme, _outcome: Outcome) {
        crate::ui::draw_centered(
            frame,
            area,
            area.height / 2,
            "You won!",
            theme.text_style().add_modifier(Modifier::BOLD),
        );
    }

    /// Lines for the help screen.
    fn help_lines(&self) -> &'static [&'static str] {
        &[]
    }

    /// Smallest terminal `(cols, rows)` the game can be drawn in.
    fn min_size(&self) -> (u16, u16) {
        (40, 10)
    }

    /// Runs first thing every tick. Returning true requests a redraw.
    fn before_tick(&mut self, _now: Instant) -> bool {
        false
    }

    /// Runs last thing every tick. Returning true requests a redraw.
    fn after_tick(&mut self, _now: Instant) -> bool {
        false
    }

    /// Runs once after the loop exits.
    fn end_game(&mut self) {}
}

pub struct App<G: Game> {
    game: G,
    session: Session,
    theme: Theme,
}

impl<G: Game> App<G> {
    pub fn new(game: G, theme: Theme, now: Instant) -> Self {
        Self {
            game,
            session: Session::new(now),
            theme,
        }
    }

    /// Start the first board.
    pub fn start(&mut self, now: Instant) -> Result<(), GameError> {
        self.session.restart(now);
        self.game.start_game()
    }

    fn new_game(&mut self, now: Instant) -> Result<(), GameError> {
        self.session.restart(now);
        self.game.start_game()?;
        self.session.request_redraw();
        Ok(())
    }

    /// Route one key press: the top grab takes it if there is one, otherwise the bindings.
    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> Result<(), GameError> {
        if let Some(response) = self.session.grabs_mut().dispatch(key) {
            if let Some(effect) = response.effect {
                self.apply(effect, now)?;
            }
            return Ok(());
        }

        let Some(binding) = self.game.binding(key) else {
            return Ok(());
        };
        match binding {
            Binding::NewGame => self.session.confirm_new_game(now),
            Binding::Pause => self.session.pause(PauseView::Plain, now),
            Binding::Quit => self.session.confirm_quit(now),
            Binding::Help => self.session.pause(PauseView::Help, now),
            Binding::Game(action) => {
                let outcome = self.game.perform(action, now)?;
                self.session.request_redraw();
                if let Some(outcome) = outcome {
                    self.session.stop(outcome, now);
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, effect: Effect, now: Instant) -> Result<(), GameError> {
        match effect {
            Effect::Confirmed(command) => {
                self.session.clear_message();
                match command {
                    Command::NewGame => self.new_game(now)?,
                    Command::Quit => self.session.quit(),
                }
            }
            Effect::Declined => self.session.clear_message(),
            Effect::Resume => self.session.unpause(now),
            Effect::PromptQuit => self.session.confirm_quit(now),
            Effect::NewGame => self.new_game(now)?,
        }
        Ok(())
    }

    /// Run until the player quits. The terminal is restored on every exit path.
    pub fn run(&mut self) -> Result<()> {
        let mut surface = Surface::enter()?;
        tracing::info!(title = G::TITLE, "session started");
        let result = self.run_loop(&mut surface);
        self.game.end_game();
        surface.exit()?;
        tracing::info!("session ended");
        result
    }

    fn run_loop(&mut self, surface: &mut Surface) -> Result<()> {
        self.start(Instant::now())?;

        while !self.session.quit_requested() {
            let now = Instant::now();
            if let Some(repaint) = self.begin_tick(now) {
                tracing::trace!(?repaint, "paint");
                let mut fits = true;
                surface.terminal().draw(|frame| {
                    fits = crate::ui::draw(frame, &self.game, &self.session, &self.theme, now);
                })?;
                if !fits {
                    self.session.request_redraw();
                }
            }

            let input = terminal::poll_input(POLL_TIMEOUT)?;
            if input == Some(Input::Resize) {
                surface.clear()?;
            }
            self.end_tick(input, Instant::now())?;
        }
        Ok(())
    }

    /// First half of a tick: the before hook, then what needs painting.
    pub fn begin_tick(&mut self, now: Instant) -> Option<Repaint> {
        if self.game.before_tick(now) {
            self.session.request_redraw();
        }
        self.session.take_repaint()
    }

    /// Second half of a tick: the polled input, if any, then the after hooks.
    pub fn end_tick(&mut self, input: Option<Input>, now: Instant) -> Result<(), GameError> {
        match input {
            Some(Input::Key(key)) => self.handle_key(key, now)?,
            Some(Input::Resize) => {
                tracing::debug!("terminal resized");
                self.session.request_redraw();
            }
            Some(Input::Interrupt) => {
                tracing::info!("interrupted");
                self.session.quit();
            }
            None => {}
        }

        self.session.after_tick(now);
        if self.game.after_tick(now) {
            self.session.request_redraw();
        }
        Ok(())
    }
}
