//! Terminal surface (raw mode + alternate screen) and the input source.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use ratatui::DefaultTerminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

/// One input event the turn loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyCode),
    /// The terminal changed size; only the surface needs attention.
    Resize,
    /// Ctrl-C. Raw mode swallows SIGINT, so it arrives as a key.
    Interrupt,
}

/// Owns the terminal while the game runs. Dropping it restores the terminal.
pub struct Surface {
    terminal: DefaultTerminal,
    active: bool,
}

impl Surface {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = DefaultTerminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn terminal(&mut self) -> &mut DefaultTerminal {
        &mut self.terminal
    }

    /// Wipe the screen so the next draw starts from nothing.
    pub fn clear(&mut self) -> Result<()> {
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !std::mem::take(&mut self.active) {
            return Ok(());
        }
        execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Wait up to `timeout` for one event. `None` when nothing relevant arrived.
pub fn poll_input(timeout: Duration) -> Result<Option<Input>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        Event::Resize(..) => Some(Input::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Input::Interrupt);
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    Some(Input::Key(key.code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_plain_press_passes_through() {
        assert_eq!(
            translate(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Input::Key(KeyCode::Char('j')))
        );
        // Shifted symbols arrive with SHIFT set.
        assert_eq!(
            translate(key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(Input::Key(KeyCode::Char('?')))
        );
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Interrupt)
        );
    }

    #[test]
    fn test_modified_keys_are_dropped() {
        assert_eq!(translate(key(KeyCode::Char('q'), KeyModifiers::CONTROL)), None);
        assert_eq!(translate(key(KeyCode::Char('n'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_release_ignored() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(translate(Event::Resize(80, 24)), Some(Input::Resize));
        assert_eq!(translate(Event::FocusGained), None);
    }
}
