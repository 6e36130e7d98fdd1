//! Main TUI application state and event loop.
//!
//! Manages the selector state and the main render/event loop.
//!
//! ## ftui Model Contract
//!
//! `App` implements `ftui::Model`:
//! - `init()` initializes model state (and may return a startup `Cmd`)
//! - `update(msg)` applies a single `Msg` and may return a `Cmd`
//! - `view(frame)` renders state into a frame (pure w.r.t. input state)
//! - `subscriptions()` registers the periodic rescan tick
//!
//! Confirming a row always ends the program: the resulting [`Outcome`] is
//! parked in a shared slot and handled by [`run_interactive`] after the
//! terminal has been restored, so launched commands inherit a sane tty.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ftui::layout::Rect;
use ftui::runtime::{Every, Subscription};
use ftui::text::Text as FtuiText;
use ftui::widgets::Widget;
use ftui::{
    Cell as FtuiCell, Cmd as FtuiCmd, Frame as FtuiFrame, KeyEvent as FtuiKeyEvent,
    KeyEventKind as FtuiKeyEventKind, Model as FtuiModel, Program, ProgramConfig,
};
use tracing::{debug, info, warn};

use crate::action::{run_command, SessionTerminator, SignalTerminator};
use crate::catalog::SessionCatalog;
use crate::command::CommandBuilder;
use crate::config::TunnelDefinition;
use crate::scan::{ActiveSession, ProcessScanner};
use crate::select::{Outcome, SelectionController};
use ts_common::{Error, Result};

use super::events::{Binding, KeyBindings};
use super::layout::{Breakpoint, LayoutState, SelectorLayout};
use super::msg::Msg;
use super::theme::Theme;
use super::widgets::{CatalogList, StatusBar};
use super::{TuiError, TuiResult};

/// Title shown at the top of the selector screen.
const APP_TITLE: &str = "SSH Tunnel Manager";

/// Current application state/mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Normal browsing mode.
    #[default]
    Normal,
    /// Application is quitting.
    Quitting,
}

type OutcomeSlot = Arc<Mutex<Option<Outcome>>>;

/// Main TUI application.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Theme for styling.
    pub theme: Theme,
    /// Key bindings configuration.
    pub key_bindings: KeyBindings,
    /// Catalog entries and cursor.
    controller: SelectionController,
    /// Command builder matching the session's debug flag.
    builder: CommandBuilder,
    /// Configured tunnel definitions, in file order.
    definitions: Vec<TunnelDefinition>,
    /// Process table scanner for the periodic rescan.
    scanner: ProcessScanner,
    /// Terminator used when stopping sessions.
    terminator: Box<dyn SessionTerminator + Send>,
    /// Confirmed outcome, read by the caller after the program exits.
    outcome: OutcomeSlot,
    /// Status message to display.
    status_message: Option<String>,
    /// Responsive layout state for tracking breakpoint changes.
    layout_state: LayoutState,
    /// Scroll offset for the catalog list.
    scroll_offset: usize,
}

impl App {
    /// Create a new application instance over a pre-scanned session snapshot.
    pub fn new(
        definitions: Vec<TunnelDefinition>,
        actives: Vec<ActiveSession>,
        debug: bool,
    ) -> Self {
        let builder = CommandBuilder::new(debug);
        let catalog = SessionCatalog::build(&actives, &definitions, &builder);
        let controller = SelectionController::new(catalog, actives);

        Self {
            state: AppState::Normal,
            theme: Theme::default(),
            key_bindings: KeyBindings::default(),
            controller,
            builder,
            definitions,
            scanner: ProcessScanner,
            terminator: Box::new(SignalTerminator),
            outcome: Arc::new(Mutex::new(None)),
            status_message: None,
            // Reasonable defaults; updated on the first resize event.
            layout_state: LayoutState::new(80, 24),
            scroll_offset: 0,
        }
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set custom key bindings.
    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    /// Replace the session terminator (test injection).
    pub fn with_terminator(mut self, terminator: Box<dyn SessionTerminator + Send>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Shared slot holding the confirmed outcome.
    pub fn outcome_slot(&self) -> OutcomeSlot {
        Arc::clone(&self.outcome)
    }

    /// Access the selection controller state.
    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    /// Get the current layout breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.layout_state.breakpoint()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Set a status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Rows visible inside the bordered catalog list.
    fn visible_list_rows(&self) -> usize {
        let (width, height) = self.layout_state.size();
        let layout = SelectorLayout::new(Rect::new(0, 0, width, height));
        usize::from(layout.screen_areas().list.height.saturating_sub(2))
    }

    /// Keep the cursor inside the visible window.
    fn ensure_cursor_visible(&mut self) {
        let len = self.controller.entries().len();
        if len == 0 {
            self.scroll_offset = 0;
            return;
        }
        self.scroll_offset = self.scroll_offset.min(len - 1);

        let Some(cursor) = self.controller.cursor() else {
            return;
        };
        let visible = self.visible_list_rows();
        if visible == 0 {
            return;
        }
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + visible {
            self.scroll_offset = cursor + 1 - visible;
        }
    }

    /// Rescan the process table and rebuild the catalog.
    ///
    /// Scan failures keep the previous catalog; a stale view beats an empty
    /// one when `ps` hiccups.
    fn rescan(&mut self, announce: bool) {
        match self.scanner.scan() {
            Ok(actives) => {
                let count = actives.len();
                let catalog = SessionCatalog::build(&actives, &self.definitions, &self.builder);
                self.controller.rebuild(catalog, actives);
                self.ensure_cursor_visible();
                if announce {
                    self.set_status(format!("Sessions rescanned ({} active)", count));
                }
            }
            Err(e) => {
                warn!(error = %e, "scan.rescan_failed");
                self.set_status(format!("Rescan failed: {}", e));
            }
        }
    }

    /// Confirm the current selection and quit with its outcome.
    fn handle_confirm(&mut self) -> FtuiCmd<Msg> {
        let Some(outcome) = self.controller.confirm(&mut *self.terminator) else {
            return FtuiCmd::none();
        };

        let kind = match &outcome {
            Outcome::Status(_) => "status",
            Outcome::Launch(_) => "launch",
            Outcome::AddFlow => "add_flow",
        };
        info!(target: "tui.user_input", action = "confirm", outcome = kind, "Selection confirmed");

        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome);
        }
        self.state = AppState::Quitting;
        FtuiCmd::quit()
    }

    /// Handle a message from the ftui runtime.
    fn handle_msg(&mut self, msg: Msg) -> FtuiCmd<Msg> {
        match msg {
            Msg::KeyPressed(key) => self.handle_key_event(key),
            Msg::Resized { width, height } => {
                self.layout_state.update(width, height);
                self.ensure_cursor_visible();
                FtuiCmd::none()
            }
            Msg::Tick => {
                self.rescan(false);
                FtuiCmd::none()
            }
            Msg::Refresh => {
                self.rescan(true);
                FtuiCmd::none()
            }
            Msg::Noop => FtuiCmd::none(),

            Msg::CursorUp => {
                self.controller.move_up();
                self.ensure_cursor_visible();
                FtuiCmd::none()
            }
            Msg::CursorDown => {
                self.controller.move_down();
                self.ensure_cursor_visible();
                FtuiCmd::none()
            }

            Msg::Confirm => self.handle_confirm(),

            Msg::Quit => {
                self.state = AppState::Quitting;
                FtuiCmd::quit()
            }
        }
    }

    fn handle_key_event(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        if !matches!(key.kind, FtuiKeyEventKind::Press | FtuiKeyEventKind::Repeat) {
            return FtuiCmd::none();
        }

        debug!(
            target: "tui.user_input",
            key_code = ?key.code,
            modifiers = ?key.modifiers,
            "Key event received"
        );

        match self.key_bindings.resolve(&key) {
            Some(Binding::Quit) => {
                info!(target: "tui.user_input", action = "quit", "Quit requested");
                self.state = AppState::Quitting;
                FtuiCmd::quit()
            }
            Some(Binding::Confirm) => self.handle_confirm(),
            Some(Binding::Next) => {
                self.controller.move_down();
                self.ensure_cursor_visible();
                FtuiCmd::none()
            }
            Some(Binding::Prev) => {
                self.controller.move_up();
                self.ensure_cursor_visible();
                FtuiCmd::none()
            }
            Some(Binding::Refresh) => FtuiCmd::msg(Msg::Refresh),
            None => FtuiCmd::none(),
        }
    }
}

impl FtuiModel for App {
    type Message = Msg;

    fn init(&mut self) -> FtuiCmd<Self::Message> {
        info!(
            target: "tui.startup",
            terminal_size = ?self.layout_state.size(),
            theme = ?self.theme.mode,
            entries = self.controller.entries().len(),
            "TUI model initialized"
        );
        FtuiCmd::none()
    }

    fn update(&mut self, msg: Self::Message) -> FtuiCmd<Self::Message> {
        self.handle_msg(msg)
    }

    fn view(&self, frame: &mut FtuiFrame) {
        let full_area = Rect::new(0, 0, frame.width(), frame.height());
        let layout = SelectorLayout::new(full_area);

        // Degrade gracefully for tiny terminals
        if layout.is_too_small() {
            paint_line(frame, 0, 0, "Terminal too small (min 40x10)");
            return;
        }

        let areas = layout.screen_areas();

        // ── Title bar ──────────────────────────────────────────────────
        let title = ftui::widgets::paragraph::Paragraph::new(FtuiText::raw(APP_TITLE))
            .style(self.theme.class("title"));
        Widget::render(&title, areas.title, frame);

        // ── Catalog list ───────────────────────────────────────────────
        CatalogList::new(self.controller.entries())
            .theme(&self.theme)
            .breakpoint(layout.breakpoint())
            .cursor(self.controller.cursor())
            .scroll_offset(self.scroll_offset)
            .render_ftui(areas.list, frame);

        // ── Status bar ─────────────────────────────────────────────────
        let mut status_bar = StatusBar::new().theme(&self.theme);
        if let Some(ref msg) = self.status_message {
            status_bar = status_bar.message(msg);
        }
        status_bar.render_ftui(areas.status, frame);
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        vec![Box::new(Every::with_id(
            0x5453_5449_434B,
            Duration::from_secs(5),
            || Msg::Tick,
        ))]
    }
}

/// Write one clipped row of characters straight into the buffer.
fn paint_line(frame: &mut FtuiFrame, x: u16, y: u16, text: &str) {
    if y >= frame.height() {
        return;
    }
    let avail = usize::from(frame.width().saturating_sub(x));
    for (i, ch) in text.chars().take(avail).enumerate() {
        frame.buffer.set(x + i as u16, y, FtuiCell::from_char(ch));
    }
}

/// Run the TUI using the ftui runtime.
///
/// Delegates terminal setup, event polling, and teardown entirely to ftui's
/// `Program` runtime.
pub fn run_ftui(app: App, config: ProgramConfig) -> TuiResult<()> {
    let mut program =
        Program::with_config(app, config).map_err(|e| TuiError::TerminalInit(e.to_string()))?;
    program
        .run()
        .map_err(|e| TuiError::TerminalInit(e.to_string()))
}

/// Run the interactive selector and act on the confirmed row.
///
/// Stop results and the add-flow notice are printed once the terminal is
/// back in cooked mode; a launch spawns the tunnel command with inherited
/// stdio so password prompts reach the user.
pub fn run_interactive(definitions: Vec<TunnelDefinition>, debug: bool) -> Result<()> {
    let scanner = ProcessScanner;
    let actives = match scanner.scan() {
        Ok(actives) => actives,
        Err(e) => {
            // The selector still works without the CURRENT TUNNEL section.
            warn!(error = %e, "scan.initial_failed");
            Vec::new()
        }
    };

    let app = App::new(definitions, actives, debug);
    let slot = app.outcome_slot();
    run_ftui(app, ProgramConfig::default()).map_err(|e| Error::Tui(e.to_string()))?;

    let outcome = slot.lock().ok().and_then(|mut s| s.take());
    match outcome {
        Some(Outcome::Status(message)) => {
            println!("{}", message);
            Ok(())
        }
        Some(Outcome::Launch(command)) => {
            println!("Starting tunnel...");
            run_command(&command)
        }
        Some(Outcome::AddFlow) => {
            println!("Coming soon: Interactive tunnel creation");
            Ok(())
        }
        None => Ok(()),
    }
}
