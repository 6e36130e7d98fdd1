//! Message type for the Elm-style update loop.
//!
//! Terminal events collapse into this one enum before `App::update`
//! sees them. The `From<ftui::Event>` impl stays mechanical; deciding
//! what a key *means* is the job of `KeyBindings` inside the update
//! function, so rebinding never touches this file.

use ftui::{Event, KeyEvent};

/// Everything the selector model can react to.
#[derive(Debug, Clone)]
pub enum Msg {
    // Raw input
    KeyPressed(KeyEvent),
    Resized { width: u16, height: u16 },
    Tick,
    Noop,

    // Cursor movement
    CursorUp,
    CursorDown,

    // Actions
    Confirm,
    Refresh,

    Quit,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Msg::KeyPressed(key),
            Event::Resize { width, height } => Msg::Resized { width, height },
            Event::Tick => Msg::Tick,
            // Focus, paste, clipboard, and mouse events carry nothing the
            // selector acts on.
            Event::Focus(_) | Event::Paste(_) | Event::Clipboard(_) | Event::Mouse(_) => Msg::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftui::{KeyCode, Modifiers};

    #[test]
    fn key_events_pass_through_with_modifiers() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        match Msg::from(event) {
            Msg::KeyPressed(key) => {
                assert!(matches!(key.code, KeyCode::Char('c')));
                assert!(key.modifiers.contains(Modifiers::CTRL));
            }
            other => panic!("expected KeyPressed, got {:?}", other),
        }
    }

    #[test]
    fn resize_keeps_dimensions() {
        match Msg::from(Event::Resize {
            width: 80,
            height: 24,
        }) {
            Msg::Resized { width, height } => {
                assert_eq!((width, height), (80, 24));
            }
            other => panic!("expected Resized, got {:?}", other),
        }
    }

    #[test]
    fn tick_passes_through() {
        assert!(matches!(Msg::from(Event::Tick), Msg::Tick));
    }

    #[test]
    fn unhandled_events_become_noop() {
        let mouse = Event::Mouse(ftui::MouseEvent::new(ftui::MouseEventKind::Moved, 3, 4));
        assert!(matches!(Msg::from(mouse), Msg::Noop));

        assert!(matches!(Msg::from(Event::Focus(true)), Msg::Noop));
    }
}
