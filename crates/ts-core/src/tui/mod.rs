//! Interactive terminal UI for the tunnel selector.
//!
//! Presents the session catalog as a navigable list: the current tunnel (if
//! any), the configured tunnels, and the add-new action. Confirming a row
//! exits the UI and hands the outcome back to the caller.
//!
//! # Module Structure
//!
//! - `app`: Main application state and event loop
//! - `msg`: Central message type for the Elm-style update loop
//! - `widgets`: Custom widgets for the TUI
//! - `theme`: Color schemes and styling
//! - `events`: Key bindings
//! - `layout`: Responsive screen layout

mod app;
mod events;
pub mod layout;
mod msg;
mod theme;
pub mod widgets;

pub use app::{run_ftui, run_interactive, App, AppState};
pub use events::{Binding, KeyBindings};
pub use layout::{Breakpoint, LayoutState, ScreenAreas, SelectorLayout};
pub use msg::Msg;
pub use theme::{Theme, ThemeMode};

use thiserror::Error;

/// Errors that can occur in the TUI module.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Failed to initialize or run the terminal program.
    #[error("terminal initialization failed: {0}")]
    TerminalInit(String),

    /// IO error during TUI operation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;
