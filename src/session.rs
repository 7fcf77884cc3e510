//! Framework-side session state: lifecycle, clock, status message, redraw and quit flags.

use crate::grab::{Command, Grab, GrabStack, PauseView};
use std::time::{Duration, Instant};

/// How long a message stays up when no timeout is given.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Playing,
    Paused(PauseView),
    Stopped(Outcome),
}

/// What the loop should paint this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    Full,
    Clock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Message {
    text: String,
    expires: Option<Instant>,
}

#[derive(Debug)]
pub struct Session {
    state: State,
    grabs: GrabStack,
    message: Option<Message>,
    redraw: bool,
    quit: bool,
    /// Clock origin; moved forward by each paused span.
    time_offset: Instant,
    /// Set while the clock is frozen (paused or stopped).
    frozen_at: Option<Instant>,
}

impl Session {
    pub fn new(now: Instant) -> Self {
        Self {
            state: State::Playing,
            grabs: GrabStack::default(),
            message: None,
            redraw: true,
            quit: false,
            time_offset: now,
            frozen_at: None,
        }
    }

    /// Back to `Playing` with a fresh clock. Any grabs left over from the old board are dropped.
    pub fn restart(&mut self, now: Instant) {
        self.state = State::Playing;
        if !self.grabs.is_empty() {
            tracing::debug!(depth = self.grabs.len(), "dropping grabs from the old board");
        }
        self.grabs.clear();
        self.time_offset = now;
        self.frozen_at = None;
        self.redraw = true;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Paused(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, State::Stopped(_))
    }

    #[cfg(test)]
    pub fn grabs(&self) -> &GrabStack {
        &self.grabs
    }

    pub(crate) fn grabs_mut(&mut self) -> &mut GrabStack {
        &mut self.grabs
    }

    /// Freeze the clock and grab input. No-op unless playing.
    pub fn pause(&mut self, view: PauseView, now: Instant) {
        if self.state != State::Playing {
            return;
        }
        tracing::debug!(?view, "paused");
        self.state = State::Paused(view);
        self.frozen_at = Some(now);
        self.grabs.push(Grab::Pause(view));
        self.redraw = true;
    }

    /// Resume the clock where it stopped. The pause grab pops itself.
    pub fn unpause(&mut self, now: Instant) {
        if !self.is_paused() {
            return;
        }
        if let Some(paused_at) = self.frozen_at.take() {
            self.time_offset += now.saturating_duration_since(paused_at);
        }
        tracing::debug!("resumed");
        self.state = State::Playing;
        self.redraw = true;
    }

    pub fn stop(&mut self, outcome: Outcome, now: Instant) {
        tracing::info!(?outcome, elapsed = ?self.elapsed(now), "game stopped");
        self.state = State::Stopped(outcome);
        self.frozen_at = Some(now);
        self.grabs.push(Grab::Stopped);
        self.redraw = true;
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Show `text` until `timeout` passes, or until cleared when `timeout` is `None`.
    pub fn set_message(&mut self, text: impl Into<String>, timeout: Option<Duration>, now: Instant) {
        self.message = Some(Message {
            text: text.into(),
            expires: timeout.map(|t| now + t),
        });
        self.redraw = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.redraw = true;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// Ask a yes/no question; `y` runs `command`.
    pub fn prompt_confirmation(&mut self, text: &str, command: Command, now: Instant) {
        tracing::debug!(?command, "confirmation requested");
        self.set_message(format!("{} (y/n)", text), None, now);
        self.grabs.push(Grab::Confirm(command));
    }

    pub fn confirm_new_game(&mut self, now: Instant) {
        self.prompt_confirmation("Start a new game?", Command::NewGame, now);
    }

    pub fn confirm_quit(&mut self, now: Instant) {
        self.prompt_confirmation("Quit game?", Command::Quit, now);
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// A pending full redraw wins; otherwise only a live clock needs painting.
    pub fn take_repaint(&mut self) -> Option<Repaint> {
        if std::mem::take(&mut self.redraw) {
            Some(Repaint::Full)
        } else if !(self.is_paused() || self.is_stopped()) {
            Some(Repaint::Clock)
        } else {
            None
        }
    }

    /// Expire the message once its timeout has passed.
    pub fn after_tick(&mut self, now: Instant) {
        if self
            .message
            .as_ref()
            .and_then(|m| m.expires)
            .is_some_and(|t| t <= now)
        {
            self.clear_message();
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.frozen_at
            .unwrap_or(now)
            .saturating_duration_since(self.time_offset)
    }
}

/// "minutes:seconds" for a duration.
pub fn time_str(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_time_str() {
        assert_eq!(time_str(secs(0)), "0:00");
        assert_eq!(time_str(secs(75)), "1:15");
        assert_eq!(time_str(Duration::from_millis(59_999)), "0:59");
    }

    #[test]
    fn test_pause_freezes_clock_and_unpause_shifts_origin() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        s.pause(PauseView::Plain, t0 + secs(10));
        assert_eq!(s.elapsed(t0 + secs(40)), secs(10));
        assert_eq!(s.grabs().top(), Some(Grab::Pause(PauseView::Plain)));

        s.unpause(t0 + secs(40));
        assert_eq!(s.state(), State::Playing);
        assert_eq!(s.elapsed(t0 + secs(45)), secs(15));
    }

    #[test]
    fn test_pause_only_from_playing() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        s.stop(Outcome::Lost, t0);
        s.pause(PauseView::Help, t0);
        assert_eq!(s.state(), State::Stopped(Outcome::Lost));
        assert_eq!(s.grabs().len(), 1);
    }

    #[test]
    fn test_stop_freezes_clock_and_grabs() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        s.stop(Outcome::Won, t0 + secs(3));
        assert!(s.is_stopped());
        assert_eq!(s.elapsed(t0 + secs(100)), secs(3));
        assert_eq!(s.grabs().top(), Some(Grab::Stopped));

        s.restart(t0 + secs(100));
        assert_eq!(s.state(), State::Playing);
        assert!(s.grabs().is_empty());
        assert_eq!(s.elapsed(t0 + secs(101)), secs(1));
    }

    #[test]
    fn test_message_expiry() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        s.set_message("hello", Some(MESSAGE_TIMEOUT), t0);
        s.after_tick(t0 + Duration::from_millis(999));
        assert_eq!(s.message(), Some("hello"));
        s.after_tick(t0 + MESSAGE_TIMEOUT);
        assert_eq!(s.message(), None);
    }

    #[test]
    fn test_message_without_timeout_persists() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        s.confirm_quit(t0);
        s.after_tick(t0 + secs(3600));
        assert_eq!(s.message(), Some("Quit game? (y/n)"));
        assert_eq!(s.grabs().top(), Some(Grab::Confirm(Command::Quit)));
    }

    #[test]
    fn test_repaint_decision() {
        let t0 = Instant::now();
        let mut s = Session::new(t0);
        assert_eq!(s.take_repaint(), Some(Repaint::Full));
        assert_eq!(s.take_repaint(), Some(Repaint::Clock));

        s.pause(PauseView::Plain, t0);
        assert_eq!(s.take_repaint(), Some(Repaint::Full));
        assert_eq!(s.take_repaint(), None);

        s.unpause(t0);
        s.stop(Outcome::Lost, t0);
        assert_eq!(s.take_repaint(), Some(Repaint::Full));
        assert_eq!(s.take_repaint(), None);
    }
}
