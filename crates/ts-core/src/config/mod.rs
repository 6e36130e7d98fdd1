//! Tunnel definition catalog persisted as YAML.
//!
//! Resolution order for the config file: CLI argument, then the
//! TUNNEL_SELECT_CONFIG environment variable, then the XDG config
//! directory. A missing file is not an error: loading yields the
//! built-in default catalog, and the first save creates the file
//! along with its parent directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ts_common::{Error, Result};

/// Environment variable naming an explicit config file path.
const ENV_CONFIG_PATH: &str = "TUNNEL_SELECT_CONFIG";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.yaml";

/// Application name for XDG directories.
const APP_NAME: &str = "tunnel-select";

// ---------------------------------------------------------------------------
// Tunnel definitions
// ---------------------------------------------------------------------------

/// A saved tunnel definition.
///
/// Subnets are comma-joined on the wire (`subnets: 10.0.0.0/8,192.168.0.0/16`)
/// and a list in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelDefinition {
    /// Display name, unique within the catalog.
    pub name: String,
    /// SSH host.
    pub host: String,
    /// SSH user.
    pub user: String,
    /// CIDR subnets to route through the tunnel.
    #[serde(with = "subnet_csv")]
    pub subnets: Vec<String>,
    /// Additional sshuttle arguments, passed through verbatim except
    /// for a leading `-i <key>` pair which moves into the ssh command.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_args: String,
}

impl TunnelDefinition {
    /// The `user@host` endpoint string.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Comma-separated wire format for subnet lists.
mod subnet_csv {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(subnets: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&subnets.join(","))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// The persisted tunnel catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tunnel definitions in catalog order.
    #[serde(default)]
    pub tunnels: Vec<TunnelDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tunnels: vec![TunnelDefinition {
                name: "Example Server".to_string(),
                host: "example.com".to_string(),
                user: "user".to_string(),
                subnets: vec!["10.0.0.0/8".to_string()],
                extra_args: String::new(),
            }],
        }
    }
}

impl Config {
    /// An empty catalog (no placeholder tunnel).
    pub fn empty() -> Self {
        Config {
            tunnels: Vec::new(),
        }
    }

    /// Load a config file, falling back to the built-in default catalog
    /// when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config.missing_using_default");
            return Ok(Config::default());
        }

        let data = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&data)
            .map_err(|e| Error::ConfigParse(format!("{}: {}", path.display(), e)))
    }

    /// Load a config file, falling back to an empty catalog when the
    /// file does not exist.
    ///
    /// Mutation paths use this so the first save never persists the
    /// placeholder example tunnel.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::empty());
        }
        Config::load(path)
    }

    /// Write the catalog to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, data)?;
        debug!(path = %path.display(), tunnels = self.tunnels.len(), "config.saved");
        Ok(())
    }

    /// Append a tunnel, rejecting duplicate names.
    pub fn add_tunnel(&mut self, tunnel: TunnelDefinition) -> Result<()> {
        if self.find(&tunnel.name).is_some() {
            return Err(Error::Validation(format!(
                "tunnel with name '{}' already exists",
                tunnel.name
            )));
        }
        self.tunnels.push(tunnel);
        Ok(())
    }

    /// Look up a tunnel by name.
    pub fn find(&self, name: &str) -> Option<&TunnelDefinition> {
        self.tunnels.iter().find(|t| t.name == name)
    }
}

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

/// Where the config file path came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via the TUNNEL_SELECT_CONFIG environment variable.
    Environment,

    /// Default location in the XDG config directory.
    #[default]
    XdgConfig,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
        }
    }
}

/// A resolved config file path and its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Path to load from and save to. May not exist yet.
    pub path: PathBuf,
    /// Where the path came from.
    pub source: ConfigSource,
}

/// Resolve the config file path.
///
/// CLI and environment paths are honored even when the file does not
/// exist yet, since saves target the same location.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Result<ResolvedConfig> {
    if let Some(path) = cli_path {
        return Ok(ResolvedConfig {
            path: path.to_path_buf(),
            source: ConfigSource::CliArgument,
        });
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.is_empty() {
            return Ok(ResolvedConfig {
                path: PathBuf::from(env_path),
                source: ConfigSource::Environment,
            });
        }
    }

    let base = dirs::config_dir()
        .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?;
    Ok(ResolvedConfig {
        path: base.join(APP_NAME).join(CONFIG_FILENAME),
        source: ConfigSource::XdgConfig,
    })
}

/// Get the XDG config directory for tunnel-select.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
