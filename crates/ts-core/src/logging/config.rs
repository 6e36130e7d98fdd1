//! Log level, format, and destination settings.
//!
//! Sources, weakest to strongest: built-in defaults, then `TS_LOG` /
//! `RUST_LOG` / `TS_LOG_FORMAT`, then CLI flags. The resolved
//! [`LogConfig`] is handed to [`super::init_logging`] once at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console lines (default).
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }

    /// Accepts the CLI spellings (`text`, `json`) alongside the
    /// canonical names.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "human" | "text" | "console" | "pretty" => Some(LogFormat::Human),
            "jsonl" | "json" | "structured" | "machine" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(&s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown log format: {}", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity that reaches the log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// Default.
    #[default]
    Info,
    Warn,
    Error,
    /// Nothing at all; the interactive selector runs at this level
    /// unless logging is explicitly requested.
    Off,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" | "quiet" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(&s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps in human output. JSONL always carries them.
    pub timestamps: bool,
    /// Destination file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
            file: None,
        }
    }
}

impl LogConfig {
    /// Resolve settings from the environment, with CLI values winning.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        LogConfig {
            level: cli_level.or_else(level_from_env).unwrap_or_default(),
            format: cli_format.or_else(format_from_env).unwrap_or_default(),
            ..LogConfig::default()
        }
    }

    /// Override the format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Toggle timestamps in human output.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Route output to a file instead of stderr.
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file = path;
        self
    }
}

/// `TS_LOG` is authoritative when it parses; otherwise a level keyword
/// anywhere in `RUST_LOG` is honored so existing habits keep working.
fn level_from_env() -> Option<LogLevel> {
    if let Ok(val) = std::env::var("TS_LOG") {
        if let Ok(level) = val.parse() {
            return Some(level);
        }
    }
    let rust_log = std::env::var("RUST_LOG").ok()?;
    for keyword in ["trace", "debug", "warn", "error"] {
        if rust_log.contains(keyword) {
            return LogLevel::from_token(keyword);
        }
    }
    None
}

fn format_from_env() -> Option<LogFormat> {
    std::env::var("TS_LOG_FORMAT").ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display_parse_round_trip() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Off,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }

    #[test]
    fn test_level_alternate_spellings() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("quiet".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert_eq!(" Info ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_format_display_parse_round_trip() {
        for format in [LogFormat::Human, LogFormat::Jsonl] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_format_accepts_cli_spellings() {
        // The --log-format flag documents text|json.
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Jsonl));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_filter_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.timestamps);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = LogConfig::default()
            .with_format(LogFormat::Jsonl)
            .with_level(LogLevel::Debug)
            .with_timestamps(false)
            .with_file(Some(PathBuf::from("/tmp/ts.log")));

        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.timestamps);
        assert_eq!(
            config.file.as_deref(),
            Some(std::path::Path::new("/tmp/ts.log"))
        );
    }

    #[test]
    fn test_cli_values_win_in_from_env() {
        // CLI values beat whatever the ambient environment says.
        let config = LogConfig::from_env(Some(LogLevel::Trace), Some(LogFormat::Jsonl));
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Jsonl);
    }
}
