//! Modal input grabs: a LIFO stack of handlers that see every key before the normal bindings.

use crossterm::event::KeyCode;

/// Action a confirmation prompt runs when answered with `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Quit,
}

/// What the paused screen shows in place of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseView {
    #[default]
    Plain,
    Help,
}

/// A modal input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grab {
    /// `(y/n)` prompt; `y` runs the command, anything else declines.
    Confirm(Command),
    /// Pause or help overlay.
    Pause(PauseView),
    /// Game-over overlay: only new game and quit are reachable.
    Stopped,
}

/// Follow-up work for the turn loop once a handler has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Confirmed(Command),
    Declined,
    Resume,
    PromptQuit,
    NewGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// `true` keeps the handler on the stack, `false` pops it.
    pub keep: bool,
    pub effect: Option<Effect>,
}

impl Response {
    const fn keep(effect: Option<Effect>) -> Self {
        Self { keep: true, effect }
    }

    const fn release(effect: Option<Effect>) -> Self {
        Self {
            keep: false,
            effect,
        }
    }
}

impl Grab {
    /// Answer a key. Handlers never touch state themselves; the loop applies the effect.
    pub fn respond(self, key: KeyCode) -> Response {
        match self {
            Self::Confirm(command) => {
                if key == KeyCode::Char('y') {
                    Response::release(Some(Effect::Confirmed(command)))
                } else {
                    Response::release(Some(Effect::Declined))
                }
            }
            Self::Pause(PauseView::Plain) => match key {
                KeyCode::Char('p') => Response::release(Some(Effect::Resume)),
                KeyCode::Char('q') => Response::keep(Some(Effect::PromptQuit)),
                _ => Response::keep(None),
            },
            Self::Pause(PauseView::Help) => match key {
                KeyCode::Char('p' | ' ') | KeyCode::Esc => Response::release(Some(Effect::Resume)),
                KeyCode::Char('q') => Response::keep(Some(Effect::PromptQuit)),
                _ => Response::keep(None),
            },
            Self::Stopped => match key {
                KeyCode::Char('n') => Response::release(Some(Effect::NewGame)),
                KeyCode::Char('q') => Response::keep(Some(Effect::PromptQuit)),
                _ => Response::keep(None),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrabStack {
    grabs: Vec<Grab>,
}

impl GrabStack {
    pub fn push(&mut self, grab: Grab) {
        self.grabs.push(grab);
    }

    pub fn top(&self) -> Option<Grab> {
        self.grabs.last().copied()
    }

    pub fn len(&self) -> usize {
        self.grabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grabs.is_empty()
    }

    pub fn clear(&mut self) {
        self.grabs.clear();
    }

    /// Route `key` to the top handler, popping it if it lets go.
    /// `None` means nothing is grabbing and the key belongs to the normal bindings.
    pub fn dispatch(&mut self, key: KeyCode) -> Option<Response> {
        let response = self.top()?.respond(key);
        if !response.keep {
            self.grabs.pop();
        }
        Some(response)
    }
}
