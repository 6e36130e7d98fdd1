//! Merged session catalog: live tunnels plus configured definitions.
//!
//! The catalog is a flat, ordered list of typed rows rebuilt wholesale
//! on every refresh. Ordering is fixed: the current tunnel section (when
//! a session is running), then the available tunnels section, then the
//! add-new action row. Headers and separators are never selectable.

use serde::{Deserialize, Serialize};

use crate::command::CommandBuilder;
use crate::config::TunnelDefinition;
use crate::scan::ActiveSession;

/// Header above the running tunnel row.
pub const CURRENT_HEADER: &str = "CURRENT TUNNEL";

/// Header above the configured tunnel rows.
pub const AVAILABLE_HEADER: &str = "AVAILABLE TUNNELS";

/// Action rows at the bottom of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Enter the interactive add-tunnel flow.
    AddNew,
}

/// One row of the merged catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// Section title. Not selectable.
    SectionHeader(String),
    /// Blank spacing row. Not selectable.
    Separator,
    /// A running tunnel that can be stopped.
    ActiveSessionRow(ActiveSession),
    /// A configured tunnel with its pre-resolved launch command.
    AvailableTunnelRow {
        tunnel: TunnelDefinition,
        command: String,
    },
    /// An action row such as "+ Add New Tunnel".
    ActionRow(ActionKind),
}

impl CatalogEntry {
    /// Whether the cursor may rest on and confirm this row.
    pub fn is_selectable(&self) -> bool {
        match self {
            CatalogEntry::SectionHeader(_) | CatalogEntry::Separator => false,
            CatalogEntry::ActiveSessionRow(_)
            | CatalogEntry::AvailableTunnelRow { .. }
            | CatalogEntry::ActionRow(_) => true,
        }
    }

    /// Primary display text for the row.
    pub fn label(&self) -> String {
        match self {
            CatalogEntry::SectionHeader(title) => title.clone(),
            CatalogEntry::Separator => String::new(),
            CatalogEntry::ActiveSessionRow(session) => format!(
                "● {} (PID: {}) - Click to stop",
                session.destination, session.pid
            ),
            CatalogEntry::AvailableTunnelRow { tunnel, .. } => tunnel.name.clone(),
            CatalogEntry::ActionRow(ActionKind::AddNew) => "+ Add New Tunnel".to_string(),
        }
    }

    /// Secondary display text, where a row has one.
    pub fn detail(&self) -> Option<String> {
        match self {
            CatalogEntry::AvailableTunnelRow { tunnel, .. } => Some(tunnel.destination()),
            _ => None,
        }
    }
}

/// The ordered catalog for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionCatalog {
    entries: Vec<CatalogEntry>,
}

impl SessionCatalog {
    /// Build the catalog from a process snapshot and the configured
    /// definitions.
    ///
    /// Single-tunnel policy: when multiple sessions are running only the
    /// first is shown. Launch commands are resolved here, once, so every
    /// row is ready to execute at confirm time.
    pub fn build(
        actives: &[ActiveSession],
        definitions: &[TunnelDefinition],
        builder: &CommandBuilder,
    ) -> Self {
        let mut entries = Vec::with_capacity(definitions.len() + 6);

        if let Some(first) = actives.first() {
            entries.push(CatalogEntry::SectionHeader(CURRENT_HEADER.to_string()));
            entries.push(CatalogEntry::ActiveSessionRow(first.clone()));
            entries.push(CatalogEntry::Separator);
        }

        entries.push(CatalogEntry::SectionHeader(AVAILABLE_HEADER.to_string()));
        for tunnel in definitions {
            let command = builder.build(tunnel);
            entries.push(CatalogEntry::AvailableTunnelRow {
                tunnel: tunnel.clone(),
                command,
            });
        }

        entries.push(CatalogEntry::Separator);
        entries.push(CatalogEntry::ActionRow(ActionKind::AddNew));

        SessionCatalog { entries }
    }

    /// All rows in display order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Consume the catalog, yielding its rows.
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }

    /// Index of the first selectable row.
    ///
    /// Always present in practice because the add-new action row is
    /// unconditional.
    pub fn first_selectable(&self) -> Option<usize> {
        self.entries.iter().position(CatalogEntry::is_selectable)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
