//! Tunnel registration: validate, probe, persist.
//!
//! The add flow runs entirely before the selection UI: required fields,
//! CIDR syntax, an optional SSH connectivity probe with an interactive
//! override, then a duplicate-name check against the saved catalog.

use std::io::BufRead;
use std::net::IpAddr;
use std::path::Path;

use tracing::info;

use ts_common::{Error, Result};

use crate::config::{Config, TunnelDefinition};
use crate::probe;

/// Parameters for registering a new tunnel definition.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    /// Unique display name.
    pub name: String,
    /// SSH host.
    pub host: String,
    /// SSH user.
    pub user: String,
    /// Comma-separated CIDR list, as typed on the command line.
    pub subnets: String,
    /// Extra sshuttle arguments.
    pub extra_args: String,
    /// Skip the SSH connectivity probe entirely.
    pub skip_probe: bool,
    /// Continue past a failed probe without prompting.
    pub assume_yes: bool,
}

/// Validate one CIDR string.
pub fn validate_cidr(subnet: &str) -> Result<()> {
    let Some((addr, prefix)) = subnet.split_once('/') else {
        return Err(Error::Validation(format!(
            "invalid CIDR '{}': missing prefix length",
            subnet
        )));
    };

    let addr: IpAddr = addr.parse().map_err(|_| {
        Error::Validation(format!("invalid CIDR '{}': bad address", subnet))
    })?;

    let max_prefix: u8 = match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };

    let prefix: u8 = prefix.parse().map_err(|_| {
        Error::Validation(format!("invalid CIDR '{}': bad prefix length", subnet))
    })?;

    if prefix > max_prefix {
        return Err(Error::Validation(format!(
            "invalid CIDR '{}': prefix length exceeds {}",
            subnet, max_prefix
        )));
    }

    Ok(())
}

/// Split and validate a comma-separated subnet list.
pub fn validate_subnets(raw: &str) -> Result<Vec<String>> {
    let subnets: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if subnets.is_empty() {
        return Err(Error::Validation(
            "subnets are required (use --subnets)".to_string(),
        ));
    }

    for subnet in &subnets {
        validate_cidr(subnet)
            .map_err(|e| Error::Validation(format!("invalid subnet format: {}", e)))?;
    }

    Ok(subnets)
}

/// Read a yes/no answer. Accepts `y` and `yes`, case-insensitive.
pub fn read_confirmation(reader: &mut dyn BufRead) -> bool {
    let mut line = String::new();
    if reader.read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Register a new tunnel definition in the config file at `config_path`.
///
/// On probe failure the user is asked whether to continue; declining
/// cancels the whole operation and nothing is written.
pub fn run_add(request: &AddRequest, config_path: &Path) -> Result<()> {
    if request.name.is_empty() {
        return Err(Error::Validation(
            "tunnel name is required (use --name)".to_string(),
        ));
    }
    if request.host.is_empty() {
        return Err(Error::Validation(
            "SSH hostname is required (use --host)".to_string(),
        ));
    }
    if request.user.is_empty() {
        return Err(Error::Validation(
            "SSH username is required (use --user)".to_string(),
        ));
    }
    if request.subnets.is_empty() {
        return Err(Error::Validation(
            "subnets are required (use --subnets)".to_string(),
        ));
    }

    let subnets = validate_subnets(&request.subnets)?;

    // Duplicate names are rejected before the probe so a clash fails
    // fast without touching the network.
    let mut config = Config::load_or_empty(config_path)?;
    config.add_tunnel(TunnelDefinition {
        name: request.name.clone(),
        host: request.host.clone(),
        user: request.user.clone(),
        subnets,
        extra_args: request.extra_args.clone(),
    })?;

    if !request.skip_probe {
        if let Err(e) = probe::check_ssh(&request.user, &request.host, &request.extra_args) {
            println!("Warning: SSH connectivity test failed: {}", e);
            if !request.assume_yes {
                print!("Continue anyway? [y/N]: ");
                use std::io::Write;
                std::io::stdout().flush()?;
                let stdin = std::io::stdin();
                if !read_confirmation(&mut stdin.lock()) {
                    return Err(Error::Cancelled);
                }
            }
        }
    }

    config.save(config_path)?;

    info!(name = %request.name, path = %config_path.display(), "register.added");
    Ok(())
}
