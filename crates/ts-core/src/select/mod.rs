//! Selection state machine over the session catalog.
//!
//! The controller owns a cursor into one immutable catalog build plus the
//! untruncated session snapshot that build came from. It has no rendering
//! or input concerns: callers feed it movement and confirm requests and
//! execute whatever [`Outcome`] falls out.

use tracing::{debug, warn};

use crate::action::SessionTerminator;
use crate::catalog::{ActionKind, CatalogEntry, SessionCatalog};
use crate::scan::ActiveSession;

/// The resolved result of a confirmed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A status line to print.
    Status(String),
    /// A tunnel command to run through the shell.
    Launch(String),
    /// Enter the interactive add-tunnel flow.
    AddFlow,
}

/// Single-selection navigation over a catalog build.
#[derive(Debug)]
pub struct SelectionController {
    entries: Vec<CatalogEntry>,
    /// Full session snapshot the catalog was built from. The catalog
    /// shows only the first session but a launch must stop all of them.
    actives: Vec<ActiveSession>,
    cursor: Option<usize>,
}

impl SelectionController {
    /// Create a controller over one catalog build.
    ///
    /// `actives` must be the same snapshot the catalog was built from.
    /// The cursor starts on the first selectable row.
    pub fn new(catalog: SessionCatalog, actives: Vec<ActiveSession>) -> Self {
        let cursor = catalog.first_selectable();
        SelectionController {
            entries: catalog.into_entries(),
            actives,
            cursor,
        }
    }

    /// Replace the catalog after a rescan.
    ///
    /// Keeps the cursor index when the row there is still selectable,
    /// otherwise snaps back to the first selectable row.
    pub fn rebuild(&mut self, catalog: SessionCatalog, actives: Vec<ActiveSession>) {
        let first = catalog.first_selectable();
        let entries = catalog.into_entries();

        self.cursor = match self.cursor {
            Some(idx) if entries.get(idx).is_some_and(CatalogEntry::is_selectable) => Some(idx),
            _ => first,
        };
        self.entries = entries;
        self.actives = actives;
    }

    /// All rows in display order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The untruncated session snapshot.
    pub fn actives(&self) -> &[ActiveSession] {
        &self.actives
    }

    /// Current cursor index, if any row is selectable.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The row under the cursor.
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.cursor.and_then(|idx| self.entries.get(idx))
    }

    /// Force the cursor to a row, selectable or not.
    ///
    /// Out-of-range indexes are ignored. Confirming a non-selectable row
    /// is a no-op, so this cannot make an invalid action reachable.
    pub fn set_cursor(&mut self, idx: usize) {
        if idx < self.entries.len() {
            self.cursor = Some(idx);
        }
    }

    /// Move to the previous selectable row. No wraparound.
    pub fn move_up(&mut self) {
        let Some(current) = self.cursor else {
            return;
        };
        let mut idx = current;
        while idx > 0 {
            idx -= 1;
            if self.entries[idx].is_selectable() {
                self.cursor = Some(idx);
                return;
            }
        }
    }

    /// Move to the next selectable row. No wraparound.
    pub fn move_down(&mut self) {
        let Some(current) = self.cursor else {
            return;
        };
        for idx in current + 1..self.entries.len() {
            if self.entries[idx].is_selectable() {
                self.cursor = Some(idx);
                return;
            }
        }
    }

    /// Confirm the row under the cursor.
    ///
    /// Returns `None` when the cursor is absent or resting on a
    /// non-selectable row. Launching stops every session in the snapshot
    /// first, best-effort: kill failures are logged and never abort the
    /// launch.
    pub fn confirm(&mut self, terminator: &mut dyn SessionTerminator) -> Option<Outcome> {
        let entry = self.selected_entry()?.clone();

        match entry {
            CatalogEntry::SectionHeader(_) | CatalogEntry::Separator => None,
            CatalogEntry::ActiveSessionRow(session) => {
                let outcome = match terminator.terminate(session.pid) {
                    Ok(()) => {
                        debug!(pid = session.pid.0, "session.stopped");
                        Outcome::Status(format!("Tunnel stopped: {}", session.destination))
                    }
                    Err(e) => Outcome::Status(format!(
                        "Failed to stop tunnel: {}",
                        e.into_common(session.pid)
                    )),
                };
                Some(outcome)
            }
            CatalogEntry::AvailableTunnelRow { command, .. } => {
                for session in &self.actives {
                    if let Err(e) = terminator.terminate(session.pid) {
                        warn!(pid = session.pid.0, error = %e, "session.kill_failed");
                    }
                }
                Some(Outcome::Launch(command))
            }
            CatalogEntry::ActionRow(ActionKind::AddNew) => Some(Outcome::AddFlow),
        }
    }
}
