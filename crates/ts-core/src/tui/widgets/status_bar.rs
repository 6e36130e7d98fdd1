//! Bottom status line.
//!
//! One line holding an optional transient notice (last stop result,
//! rescan count) ahead of the fixed key hints.

use ftui::widgets::Widget as FtuiWidget;

use crate::tui::theme::Theme;

/// The binding set is small enough that context-sensitive hints would be
/// noise; one fixed line covers everything.
const HINT_LINE: &str = "\u{2191}/\u{2193} navigate \u{2022} enter select \u{2022} q quit";

/// One-line status bar widget.
#[derive(Debug, Default)]
pub struct StatusBar<'a> {
    theme: Option<&'a Theme>,
    message: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Transient notice shown ahead of the hints.
    pub fn message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// The full line exactly as rendered.
    pub fn line(&self) -> String {
        match self.message {
            Some(msg) => format!("{} \u{2502} {}", msg, HINT_LINE),
            None => HINT_LINE.to_string(),
        }
    }

    /// Paint the line into `area` as a single ftui Paragraph.
    pub fn render_ftui(&self, area: ftui::layout::Rect, frame: &mut ftui::render::frame::Frame) {
        let style = self
            .theme
            .map(|t| t.stylesheet().get_or_default("status.normal"))
            .unwrap_or_default();

        let paragraph = ftui::widgets::paragraph::Paragraph::new(self.line()).style(style);
        FtuiWidget::render(&paragraph, area, frame);
    }
}
