//! Screen geometry for the selector.
//!
//! One vertical column: title bar, catalog list, status bar, solved with
//! ftui's [`Flex`] constraints. Width decides a [`Breakpoint`] that
//! controls how much detail each catalog row carries.

use ftui::layout::{Constraint, Flex, Rect};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

/// Width classes for the catalog rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Under 80 columns: row labels only.
    Minimal,
    /// 80 to 119 columns: labels plus the tunnel destination.
    Compact,
    /// 120 columns and up: labels plus the full resolved command.
    Standard,
}

impl Breakpoint {
    /// Classify a terminal size. Only width matters; height is handled
    /// by scrolling.
    pub fn from_size(width: u16, _height: u16) -> Self {
        if width >= 120 {
            Breakpoint::Standard
        } else if width >= 80 {
            Breakpoint::Compact
        } else {
            Breakpoint::Minimal
        }
    }

    /// Whether rows get a second column of detail text.
    pub fn show_detail_column(&self) -> bool {
        !matches!(self, Breakpoint::Minimal)
    }

    /// Name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Breakpoint::Minimal => "minimal",
            Breakpoint::Compact => "compact",
            Breakpoint::Standard => "standard",
        }
    }
}

// ---------------------------------------------------------------------------
// Screen split
// ---------------------------------------------------------------------------

/// The three horizontal bands of the selector screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub title: Rect,
    pub list: Rect,
    pub status: Rect,
}

/// Solves the selector screen against one terminal area.
#[derive(Debug, Clone, Copy)]
pub struct SelectorLayout {
    area: Rect,
    breakpoint: Breakpoint,
}

impl SelectorLayout {
    pub fn new(area: Rect) -> Self {
        let breakpoint = Breakpoint::from_size(area.width, area.height);
        trace!(
            width = area.width,
            height = area.height,
            breakpoint = breakpoint.name(),
            "layout.calculate"
        );
        Self { area, breakpoint }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Below 40x10 nothing useful fits; the caller renders a size
    /// warning instead of the catalog.
    pub fn is_too_small(&self) -> bool {
        self.area.width < 40 || self.area.height < 10
    }

    /// Split the area into title, list, and status bands.
    pub fn screen_areas(&self) -> ScreenAreas {
        let bands = Flex::vertical()
            .constraints([
                Constraint::Fixed(1),
                Constraint::Min(5),
                Constraint::Fixed(1),
            ])
            .split(self.area);

        ScreenAreas {
            title: bands[0],
            list: bands[1],
            status: bands[2],
        }
    }
}

// ---------------------------------------------------------------------------
// Resize tracking
// ---------------------------------------------------------------------------

/// Last observed terminal geometry.
///
/// Fed from resize events. Render paths derive their own layout from the
/// frame, so this exists for log context and breakpoint-change events.
#[derive(Debug, Clone, Copy)]
pub struct LayoutState {
    size: (u16, u16),
    breakpoint: Breakpoint,
}

impl LayoutState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            breakpoint: Breakpoint::from_size(width, height),
        }
    }

    /// Record a resize, logging when the breakpoint flips.
    pub fn update(&mut self, width: u16, height: u16) {
        let next = Breakpoint::from_size(width, height);
        if next != self.breakpoint {
            debug!(
                from = self.breakpoint.name(),
                to = next.name(),
                width,
                height,
                "layout.breakpoint_change"
            );
        }
        self.size = (width, height);
        self.breakpoint = next;
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_thresholds() {
        // Boundaries sit exactly at 80 and 120 columns.
        assert_eq!(Breakpoint::from_size(79, 24), Breakpoint::Minimal);
        assert_eq!(Breakpoint::from_size(80, 24), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_size(119, 24), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_size(120, 24), Breakpoint::Standard);
        assert_eq!(Breakpoint::from_size(300, 24), Breakpoint::Standard);
    }

    #[test]
    fn test_only_minimal_hides_detail() {
        assert!(!Breakpoint::Minimal.show_detail_column());
        assert!(Breakpoint::Compact.show_detail_column());
        assert!(Breakpoint::Standard.show_detail_column());
    }

    #[test]
    fn test_bands_tile_the_full_height() {
        let area = Rect::new(0, 0, 100, 40);
        let areas = SelectorLayout::new(area).screen_areas();

        assert_eq!(areas.title.height, 1);
        assert_eq!(areas.status.height, 1);
        assert_eq!(areas.list.height, 38);
        assert_eq!(areas.list.y, areas.title.y + areas.title.height);
        assert_eq!(areas.status.y + areas.status.height, area.height);
    }

    #[test]
    fn test_too_small_cutoffs() {
        assert!(SelectorLayout::new(Rect::new(0, 0, 39, 24)).is_too_small());
        assert!(SelectorLayout::new(Rect::new(0, 0, 80, 9)).is_too_small());
        assert!(!SelectorLayout::new(Rect::new(0, 0, 40, 10)).is_too_small());
    }

    #[test]
    fn test_resize_tracking_flips_breakpoint() {
        let mut state = LayoutState::new(100, 40);
        assert_eq!(state.breakpoint(), Breakpoint::Compact);

        state.update(110, 40);
        assert_eq!(state.breakpoint(), Breakpoint::Compact);
        assert_eq!(state.size(), (110, 40));

        state.update(60, 20);
        assert_eq!(state.breakpoint(), Breakpoint::Minimal);
        assert_eq!(state.size(), (60, 20));
    }
}
