//! Catalog list widget for the tunnel selector.
//!
//! Renders the session catalog as a bordered table. Section headers and
//! separators are rendered as non-selectable rows; the cursor highlight is
//! mapped onto ftui's `TableState`.

use ftui::layout::Constraint as FtuiConstraint;
use ftui::text::{Line as FtuiLine, Span as FtuiSpan, Text as FtuiText};
use ftui::widgets::block::Block as FtuiBlock;
use ftui::widgets::table::{Row as FtuiRow, Table as FtuiTable, TableState as FtuiTableState};
use ftui::widgets::StatefulWidget as FtuiStatefulWidget;
use ftui::Style as FtuiStyle;

use crate::catalog::CatalogEntry;
use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;

const SEPARATOR_TEXT: &str = "──────────";
const COL_LABEL: u16 = 40;

/// Catalog list widget.
#[derive(Debug)]
pub struct CatalogList<'a> {
    /// Theme for styling.
    theme: Option<&'a Theme>,
    /// Current breakpoint (controls detail column).
    breakpoint: Breakpoint,
    /// Catalog entries in display order.
    entries: &'a [CatalogEntry],
    /// Cursor position, if any row is selectable.
    cursor: Option<usize>,
    /// Scroll offset (first visible row).
    scroll_offset: usize,
    /// Whether the list has input focus.
    focused: bool,
}

impl<'a> CatalogList<'a> {
    /// Create a new catalog list over the given entries.
    pub fn new(entries: &'a [CatalogEntry]) -> Self {
        Self {
            theme: None,
            breakpoint: Breakpoint::Standard,
            entries,
            cursor: None,
            scroll_offset: 0,
            focused: true,
        }
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Set the current breakpoint.
    pub fn breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Set the cursor position.
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set the scroll offset.
    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    /// Set whether the list is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Build the title string based on catalog contents.
    fn title_string(&self) -> String {
        let active = self
            .entries
            .iter()
            .filter(|e| matches!(e, CatalogEntry::ActiveSessionRow(_)))
            .count();
        let available = self
            .entries
            .iter()
            .filter(|e| matches!(e, CatalogEntry::AvailableTunnelRow { .. }))
            .count();

        if active > 0 {
            format!(" Tunnels [{active} active, {available} available] ")
        } else {
            format!(" Tunnels [{available} available] ")
        }
    }

    /// Get the style for a catalog entry row.
    fn entry_style(&self, entry: &CatalogEntry) -> FtuiStyle {
        let class = match entry {
            CatalogEntry::SectionHeader(_) => "table.header",
            CatalogEntry::Separator => "row.separator",
            CatalogEntry::ActiveSessionRow(_) => "row.active",
            CatalogEntry::AvailableTunnelRow { .. } => return self.default_row_style(),
            CatalogEntry::ActionRow(_) => "row.action",
        };
        self.theme
            .map(|t| t.stylesheet().get_or_default(class))
            .unwrap_or_else(|| fallback_style(entry))
    }

    fn default_row_style(&self) -> FtuiStyle {
        FtuiStyle::default()
    }

    /// Get the border style from the theme based on focus state.
    fn border_ftui_style(&self) -> FtuiStyle {
        self.theme
            .map(|t| {
                let class = if self.focused {
                    "border.focused"
                } else {
                    "border.normal"
                };
                t.stylesheet().get_or_default(class)
            })
            .unwrap_or_default()
    }

    /// Build ftui table rows, constraints, and highlight style (no block).
    fn build_ftui_table_parts(&self) -> FtuiTableParts {
        let highlight_style = self
            .theme
            .map(|t| t.stylesheet().get_or_default("table.selected"))
            .unwrap_or_else(|| FtuiStyle::new().reverse());

        let show_detail = self.breakpoint.show_detail_column();

        let mut constraints = vec![FtuiConstraint::Fixed(COL_LABEL)];
        if show_detail {
            constraints.push(FtuiConstraint::Fill);
        }

        let rows: Vec<FtuiRow> = self
            .entries
            .iter()
            .map(|entry| {
                let style = self.entry_style(entry);
                let label = match entry {
                    CatalogEntry::Separator => SEPARATOR_TEXT.to_string(),
                    _ => entry.label(),
                };

                let mut cells: Vec<FtuiText> = vec![FtuiText::from_line(FtuiLine::from_spans([
                    FtuiSpan::styled(label, style),
                ]))];
                if show_detail {
                    cells.push(FtuiText::raw(detail_text(entry, self.breakpoint)));
                }

                FtuiRow::new(cells)
            })
            .collect();

        FtuiTableParts {
            rows,
            constraints,
            highlight_style,
        }
    }

    /// Render the catalog list (for Elm view()).
    ///
    /// Scroll offset sync-back is skipped; the update loop recalculates the
    /// offset whenever the cursor moves.
    pub fn render_ftui(&self, area: ftui::layout::Rect, frame: &mut ftui::render::frame::Frame) {
        let title = self.title_string();
        let border_style = self.border_ftui_style();

        let parts = self.build_ftui_table_parts();

        let block = FtuiBlock::bordered()
            .title(&title)
            .border_style(border_style);

        let table = FtuiTable::new(parts.rows, parts.constraints)
            .block(block)
            .highlight_style(parts.highlight_style)
            .column_spacing(1);

        let mut ftui_state = FtuiTableState::default();
        ftui_state.selected = self.cursor;
        ftui_state.offset = self.scroll_offset;

        FtuiStatefulWidget::render(&table, area, frame, &mut ftui_state);
    }
}

/// Intermediate parts for building an ftui Table (avoids lifetime issues with title).
struct FtuiTableParts {
    rows: Vec<FtuiRow>,
    constraints: Vec<FtuiConstraint>,
    highlight_style: FtuiStyle,
}

/// Detail column text for an entry at the given breakpoint.
fn detail_text(entry: &CatalogEntry, breakpoint: Breakpoint) -> String {
    match entry {
        CatalogEntry::AvailableTunnelRow { tunnel, command } => match breakpoint {
            Breakpoint::Standard => command.clone(),
            _ => tunnel.destination(),
        },
        _ => String::new(),
    }
}

/// Themeless fallback styles per row kind.
fn fallback_style(entry: &CatalogEntry) -> FtuiStyle {
    match entry {
        CatalogEntry::SectionHeader(_) => FtuiStyle::new().bold(),
        CatalogEntry::ActiveSessionRow(_) => FtuiStyle::new().bold(),
        CatalogEntry::ActionRow(_) => FtuiStyle::new().underline(),
        _ => FtuiStyle::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SessionCatalog;
    use crate::command::CommandBuilder;
    use crate::config::TunnelDefinition;
    use crate::scan::ActiveSession;
    use ts_common::ProcessId;

    fn tunnel(name: &str) -> TunnelDefinition {
        TunnelDefinition {
            name: name.to_string(),
            host: "host.example.com".to_string(),
            user: "deploy".to_string(),
            subnets: vec!["10.0.0.0/8".to_string()],
            extra_args: String::new(),
        }
    }

    fn session(pid: u32) -> ActiveSession {
        ActiveSession {
            pid: ProcessId(pid),
            destination: "deploy@host.example.com".to_string(),
            raw_line: String::new(),
        }
    }

    fn sample_entries(actives: &[ActiveSession]) -> Vec<CatalogEntry> {
        let builder = CommandBuilder::new(false);
        SessionCatalog::build(actives, &[tunnel("staging"), tunnel("prod")], &builder)
            .into_entries()
    }

    #[test]
    fn test_title_counts_available_only() {
        let entries = sample_entries(&[]);
        let list = CatalogList::new(&entries);
        assert_eq!(list.title_string(), " Tunnels [2 available] ");
    }

    #[test]
    fn test_title_counts_active_and_available() {
        let entries = sample_entries(&[session(4242)]);
        let list = CatalogList::new(&entries);
        assert_eq!(list.title_string(), " Tunnels [1 active, 2 available] ");
    }

    #[test]
    fn test_parts_have_one_row_per_entry() {
        let entries = sample_entries(&[session(4242)]);
        let list = CatalogList::new(&entries);
        let parts = list.build_ftui_table_parts();
        assert_eq!(parts.rows.len(), entries.len());
    }

    #[test]
    fn test_detail_column_follows_breakpoint() {
        let entries = sample_entries(&[]);

        let standard = CatalogList::new(&entries).breakpoint(Breakpoint::Standard);
        assert_eq!(standard.build_ftui_table_parts().constraints.len(), 2);

        let minimal = CatalogList::new(&entries).breakpoint(Breakpoint::Minimal);
        assert_eq!(minimal.build_ftui_table_parts().constraints.len(), 1);
    }

    #[test]
    fn test_detail_text_shows_command_on_standard() {
        let builder = CommandBuilder::new(false);
        let def = tunnel("staging");
        let command = builder.build(&def);
        let entry = CatalogEntry::AvailableTunnelRow {
            tunnel: def.clone(),
            command: command.clone(),
        };

        assert_eq!(detail_text(&entry, Breakpoint::Standard), command);
        assert_eq!(detail_text(&entry, Breakpoint::Compact), def.destination());
    }

    #[test]
    fn test_detail_text_empty_for_headers() {
        let entry = CatalogEntry::SectionHeader("CURRENT TUNNEL".to_string());
        assert_eq!(detail_text(&entry, Breakpoint::Standard), "");
        assert_eq!(detail_text(&CatalogEntry::Separator, Breakpoint::Standard), "");
    }
}
