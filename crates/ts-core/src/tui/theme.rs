//! Selector colors and styles.
//!
//! A `Palette` names every color the selector draws with; `Theme` turns
//! one palette into an ftui `Theme` plus a `StyleSheet` that widgets
//! query by class name. Modes: dark (default), high contrast (WCAG AAA),
//! and attribute-only for `NO_COLOR` terminals.

use ftui::style::{contrast_ratio, Rgb, StyleSheet, Theme as FtuiTheme, ThemeBuilder};
use ftui::PackedRgba;
use ftui::Style as FtuiStyle;

/// Theme mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    /// WCAG AAA contrast for accessibility.
    HighContrast,
    /// Text attributes only; honors <https://no-color.org/>.
    NoColor,
}

/// Every color the selector uses, by role.
#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Rgb,
    fg: Rgb,
    muted: Rgb,
    /// Running session rows.
    active: Rgb,
    /// The add-new action row.
    action: Rgb,
    error: Rgb,
    warning: Rgb,
    border: Rgb,
    border_focused: Rgb,
}

impl Palette {
    const DARK: Palette = Palette {
        bg: Rgb::new(30, 30, 30),
        fg: Rgb::new(220, 220, 220),
        muted: Rgb::new(128, 128, 128),
        active: Rgb::new(80, 220, 80),
        action: Rgb::new(0, 200, 200),
        error: Rgb::new(255, 80, 80),
        warning: Rgb::new(255, 200, 50),
        border: Rgb::new(80, 80, 80),
        border_focused: Rgb::new(0, 200, 200),
    };

    /// Everything at 7:1 or better against pure black.
    const HIGH_CONTRAST: Palette = Palette {
        bg: Rgb::new(0, 0, 0),
        fg: Rgb::new(255, 255, 255),
        muted: Rgb::new(200, 200, 200),
        active: Rgb::new(100, 255, 100),
        action: Rgb::new(255, 255, 0),
        error: Rgb::new(255, 100, 100),
        warning: Rgb::new(255, 255, 80),
        border: Rgb::new(255, 255, 255),
        border_focused: Rgb::new(255, 255, 0),
    };

    const MONO: Palette = Palette {
        bg: Rgb::new(0, 0, 0),
        fg: Rgb::new(255, 255, 255),
        muted: Rgb::new(255, 255, 255),
        active: Rgb::new(255, 255, 255),
        action: Rgb::new(255, 255, 255),
        error: Rgb::new(255, 255, 255),
        warning: Rgb::new(255, 255, 255),
        border: Rgb::new(255, 255, 255),
        border_focused: Rgb::new(255, 255, 255),
    };
}

fn packed(rgb: Rgb) -> PackedRgba {
    PackedRgba::rgb(rgb.r, rgb.g, rgb.b)
}

/// Resolved theme: mode, ftui theme, and the widget stylesheet.
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    ftui_theme: FtuiTheme,
    stylesheet: StyleSheet,
    palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Theme {
    /// Pick a theme from the environment.
    ///
    /// `NO_COLOR` wins, then `TS_HIGH_CONTRAST`, then dark.
    pub fn from_env() -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            Self::no_color()
        } else if std::env::var("TS_HIGH_CONTRAST").is_ok() {
            Self::high_contrast()
        } else {
            Self::dark()
        }
    }

    pub fn dark() -> Self {
        Self::from_palette(ThemeMode::Dark, Palette::DARK)
    }

    pub fn high_contrast() -> Self {
        Self::from_palette(ThemeMode::HighContrast, Palette::HIGH_CONTRAST)
    }

    /// Attribute-only rendering: bold, underline, and reverse carry the
    /// role distinctions instead of color.
    pub fn no_color() -> Self {
        let sheet = StyleSheet::new();
        sheet.define("row.active", FtuiStyle::new().bold());
        sheet.define("row.action", FtuiStyle::new().underline());
        sheet.define("row.separator", FtuiStyle::new());
        sheet.define("table.header", FtuiStyle::new().bold());
        sheet.define("table.selected", FtuiStyle::new().reverse());
        sheet.define("title", FtuiStyle::new().bold());
        sheet.define("status.normal", FtuiStyle::new());
        sheet.define("status.error", FtuiStyle::new().bold().underline());
        sheet.define("status.success", FtuiStyle::new().bold());
        sheet.define("border.normal", FtuiStyle::new());
        sheet.define("border.focused", FtuiStyle::new().bold());

        Theme {
            mode: ThemeMode::NoColor,
            ftui_theme: ThemeBuilder::new().build(),
            stylesheet: sheet,
            palette: Palette::MONO,
        }
    }

    fn from_palette(mode: ThemeMode, palette: Palette) -> Self {
        let color = |rgb: Rgb| ftui::Color::rgb(rgb.r, rgb.g, rgb.b);

        let ftui_theme = ThemeBuilder::new()
            .background(color(palette.bg))
            .text(color(palette.fg))
            .text_muted(color(palette.muted))
            .success(color(palette.active))
            .primary(color(palette.action))
            .error(color(palette.error))
            .warning(color(palette.warning))
            .border(color(palette.border))
            .border_focused(color(palette.border_focused))
            .build();

        let sheet = StyleSheet::new();
        sheet.define(
            "row.active",
            FtuiStyle::new().fg(packed(palette.active)).bold(),
        );
        sheet.define("row.action", FtuiStyle::new().fg(packed(palette.action)));
        sheet.define("row.separator", FtuiStyle::new().fg(packed(palette.muted)));
        sheet.define(
            "table.header",
            FtuiStyle::new().fg(packed(palette.fg)).bold(),
        );
        sheet.define(
            "table.selected",
            FtuiStyle::new().bg(PackedRgba::rgb(60, 60, 60)),
        );
        sheet.define("title", FtuiStyle::new().fg(packed(palette.fg)).bold());
        sheet.define("status.normal", FtuiStyle::new().fg(packed(palette.muted)));
        sheet.define(
            "status.error",
            FtuiStyle::new().fg(packed(palette.error)).bold(),
        );
        sheet.define("status.success", FtuiStyle::new().fg(packed(palette.active)));
        sheet.define("border.normal", FtuiStyle::new());
        sheet.define("border.focused", FtuiStyle::new().bold());

        Theme {
            mode,
            ftui_theme,
            stylesheet: sheet,
            palette,
        }
    }

    pub fn ftui_theme(&self) -> &FtuiTheme {
        &self.ftui_theme
    }

    pub fn stylesheet(&self) -> &StyleSheet {
        &self.stylesheet
    }

    /// Style for a class name; default style when undefined.
    pub fn class(&self, name: &str) -> FtuiStyle {
        self.stylesheet.get_or_default(name)
    }

    /// Row colors that fall short of `min_ratio` against the background.
    fn contrast_failures(&self, min_ratio: f64) -> Vec<String> {
        let p = &self.palette;
        [
            ("active", p.active),
            ("action", p.action),
            ("error", p.error),
            ("text", p.fg),
        ]
        .into_iter()
        .filter_map(|(name, fg)| {
            let ratio = contrast_ratio(fg, p.bg);
            (ratio < min_ratio).then(|| format!("{name}: {ratio:.2}:1 < {min_ratio:.1}:1"))
        })
        .collect()
    }

    /// WCAG AA failures (4.5:1 floor).
    pub fn validate_wcag_aa(&self) -> Vec<String> {
        self.contrast_failures(4.5)
    }

    /// WCAG AAA failures (7:1 floor).
    pub fn validate_wcag_aaa(&self) -> Vec<String> {
        self.contrast_failures(7.0)
    }
}
