//! Key bindings for the selector.
//!
//! One flat chord-to-action table. `App::update` resolves every key
//! press through [`KeyBindings::resolve`], so what a key does is decided
//! here and nowhere else.

use ftui::{KeyCode, KeyEvent, Modifiers};

/// Action a key press resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Quit,
    Confirm,
    Next,
    Prev,
    Refresh,
}

/// Chord-to-action table. Several chords may map to the same action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    table: Vec<(KeyEvent, Binding)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Binding::*;
        let plain = |code| KeyEvent::new(code);
        Self {
            table: vec![
                (plain(KeyCode::Char('q')), Quit),
                (plain(KeyCode::Escape), Quit),
                (
                    KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL),
                    Quit,
                ),
                (plain(KeyCode::Enter), Confirm),
                (plain(KeyCode::Down), Next),
                (plain(KeyCode::Char('j')), Next),
                (plain(KeyCode::Up), Prev),
                (plain(KeyCode::Char('k')), Prev),
                (plain(KeyCode::Char('r')), Refresh),
            ],
        }
    }
}

impl KeyBindings {
    /// Resolve a key press against the table.
    ///
    /// `KeyEventKind` is not consulted; Press and Repeat both count. A
    /// stray SHIFT bit on the observed event is tolerated because many
    /// terminals report SHIFT even when the shifted character is already
    /// encoded in `KeyCode::Char`.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Binding> {
        self.table
            .iter()
            .find(|(chord, _)| {
                chord.code == key.code
                    && (key.modifiers == chord.modifiers
                        || key.modifiers == chord.modifiers | Modifiers::SHIFT)
            })
            .map(|(_, binding)| *binding)
    }
}
