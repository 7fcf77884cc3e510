//! Key bindings. Lowercase letters only; bindings are case-sensitive.

use crossterm::event::KeyCode;

/// What a bound key does: a framework command or a game action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<A> {
    NewGame,
    Pause,
    Quit,
    Help,
    Game(A),
}

/// Minesweeper actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move { dx: isize, dy: isize },
    Clear,
    Flag,
}

/// Map a key to its binding; unbound keys give `None` and are ignored.
pub fn key_to_binding(code: KeyCode) -> Option<Binding<Action>> {
    let binding = match code {
        KeyCode::Char('w') => Binding::Game(Action::Move { dx: 0, dy: -1 }),
        KeyCode::Char('a') => Binding::Game(Action::Move { dx: -1, dy: 0 }),
        KeyCode::Char('s') => Binding::Game(Action::Move { dx: 0, dy: 1 }),
        KeyCode::Char('d') => Binding::Game(Action::Move { dx: 1, dy: 0 }),
        KeyCode::Char('j') => Binding::Game(Action::Clear),
        KeyCode::Char('k') => Binding::Game(Action::Flag),
        KeyCode::Char('n') => Binding::NewGame,
        KeyCode::Char('p') => Binding::Pause,
        KeyCode::Char('q') => Binding::Quit,
        KeyCode::Char('?') => Binding::Help,
        _ => return None,
    };
    Some(binding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            key_to_binding(KeyCode::Char('a')),
            Some(Binding::Game(Action::Move { dx: -1, dy: 0 }))
        );
        assert_eq!(
            key_to_binding(KeyCode::Char('s')),
            Some(Binding::Game(Action::Move { dx: 0, dy: 1 }))
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(key_to_binding(KeyCode::Char('J')), None);
        assert_eq!(key_to_binding(KeyCode::Char('Q')), None);
        assert_eq!(key_to_binding(KeyCode::Char('q')), Some(Binding::Quit));
        assert_eq!(key_to_binding(KeyCode::Char('p')), Some(Binding::Pause));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(key_to_binding(KeyCode::Char('x')), None);
        assert_eq!(key_to_binding(KeyCode::Left), None);
        assert_eq!(key_to_binding(KeyCode::Enter), None);
    }
}
