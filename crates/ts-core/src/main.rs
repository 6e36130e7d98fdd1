//! Tunnel Select Core - sshuttle session manager
//!
//! The main entry point for ts-core, handling:
//! - Interactive tunnel selection (stop a running session or launch a saved one)
//! - Non-interactive tunnel registration with SSH connectivity probing
//! - Active session status for wrapper scripts
//! - Catalog listing with resolved sshuttle commands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ts_common::{Error, OutputFormat};
use ts_core::command::CommandBuilder;
use ts_core::config::{resolve_config_path, Config, ResolvedConfig};
use ts_core::exit_codes::ExitCode;
use ts_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ts_core::register::{run_add, AddRequest};
use ts_core::scan::ProcessScanner;

use tracing::{debug, error};

/// Tunnel Select - interactive sshuttle tunnel manager
#[derive(Parser)]
#[command(name = "ts-core")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to the tunnel catalog file
    #[arg(long, global = true, env = "TUNNEL_SELECT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose tunnel mode: foreground sshuttle with -v and ssh -vvv
    #[arg(long, global = true)]
    debug: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_name = "text|json")]
    log_format: Option<LogFormat>,

    /// Send logs to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new tunnel definition
    Add(AddArgs),

    /// Show active sshuttle sessions
    Status(StatusArgs),

    /// List saved tunnel definitions with their resolved commands
    Tunnels(TunnelsArgs),
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct AddArgs {
    /// Unique display name for the tunnel
    #[arg(long)]
    name: Option<String>,

    /// SSH host to tunnel through
    #[arg(long)]
    host: Option<String>,

    /// SSH user
    #[arg(long)]
    user: Option<String>,

    /// Comma-separated CIDR subnets to route
    #[arg(long)]
    subnets: Option<String>,

    /// Extra sshuttle arguments (a leading "-i <key>" moves into the ssh command)
    #[arg(long, default_value = "")]
    extra_args: String,

    /// Skip the SSH connectivity probe
    #[arg(long)]
    skip_probe: bool,

    /// Continue past a failed probe without prompting
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct TunnelsArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    // Map -v/-q to a log level; environment variables still apply when
    // neither flag is given (handled inside LogConfig::from_env).
    let cli_level = if cli.global.quiet {
        Some(LogLevel::Off)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };

    let mut log_config = LogConfig::from_env(cli_level, cli.global.log_format)
        .with_file(cli.global.log_file.clone());

    // The selection UI owns the terminal. Without an explicit opt-in
    // (a flag, an env var, or a file destination) stderr stays silent
    // so log lines cannot corrupt the frames.
    if cli.command.is_none()
        && cli_level.is_none()
        && log_config.file.is_none()
        && std::env::var_os("TS_LOG").is_none()
        && std::env::var_os("RUST_LOG").is_none()
    {
        log_config.level = LogLevel::Off;
    }

    if let Err(e) = init_logging(&log_config) {
        eprintln!("Error: {}", e);
        std::process::exit(ExitCode::Failure.as_i32());
    }

    let exit_code = match cli.command {
        None => run_select(&cli.global),
        Some(Commands::Add(args)) => run_add_command(&cli.global, &args),
        Some(Commands::Status(args)) => run_status(&cli.global, &args),
        Some(Commands::Tunnels(args)) => run_tunnels(&cli.global, &args),
    };

    std::process::exit(exit_code.as_i32());
}

/// Log a structured failure event, print the user-facing message, and
/// map the error to the failure exit code.
fn fail(e: Error) -> ExitCode {
    error!(
        code = e.code(),
        category = %e.category(),
        recoverable = e.is_recoverable(),
        "command failed"
    );
    eprintln!("Error: {}", e);
    ExitCode::Failure
}

fn load_catalog(global: &GlobalOpts) -> Result<(ResolvedConfig, Config), ExitCode> {
    let resolved = resolve_config_path(global.config.as_deref()).map_err(fail)?;
    let config = Config::load(&resolved.path).map_err(fail)?;

    debug!(
        path = %resolved.path.display(),
        source = %resolved.source,
        tunnels = config.tunnels.len(),
        "catalog.loaded"
    );

    Ok((resolved, config))
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_select(global: &GlobalOpts) -> ExitCode {
    let (_, config) = match load_catalog(global) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    select_session(config, global.debug)
}

#[cfg(feature = "ui")]
fn select_session(config: Config, debug: bool) -> ExitCode {
    match ts_core::tui::run_interactive(config.tunnels, debug) {
        Ok(()) => ExitCode::Success,
        Err(e) => fail(e),
    }
}

#[cfg(not(feature = "ui"))]
fn select_session(_config: Config, _debug: bool) -> ExitCode {
    fail(Error::FeatureDisabled(
        "interactive selection requires the 'ui' feature".to_string(),
    ))
}

fn run_add_command(global: &GlobalOpts, args: &AddArgs) -> ExitCode {
    let resolved = match resolve_config_path(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => return fail(e),
    };

    let request = AddRequest {
        name: args.name.clone().unwrap_or_default(),
        host: args.host.clone().unwrap_or_default(),
        user: args.user.clone().unwrap_or_default(),
        subnets: args.subnets.clone().unwrap_or_default(),
        extra_args: args.extra_args.clone(),
        skip_probe: args.skip_probe,
        assume_yes: args.yes,
    };

    match run_add(&request, &resolved.path) {
        Ok(()) => {
            println!("Tunnel configuration added successfully!");
            ExitCode::Success
        }
        Err(e) => fail(e),
    }
}

fn run_status(_global: &GlobalOpts, args: &StatusArgs) -> ExitCode {
    let sessions = match ProcessScanner::new().scan() {
        Ok(sessions) => sessions,
        Err(e) => return fail(e.into()),
    };

    match args.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "scanned_at": chrono::Utc::now().to_rfc3339(),
                "count": sessions.len(),
                "sessions": sessions,
            });
            match serde_json::to_string_pretty(&report) {
                Ok(text) => println!("{}", text),
                Err(e) => return fail(e.into()),
            }
        }
        OutputFormat::Text => {
            if sessions.is_empty() {
                println!("No active tunnels");
            } else {
                for session in &sessions {
                    println!("{} (PID: {})", session.destination, session.pid);
                }
            }
        }
    }

    ExitCode::Success
}

fn run_tunnels(global: &GlobalOpts, args: &TunnelsArgs) -> ExitCode {
    let (_, config) = match load_catalog(global) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let builder = CommandBuilder::new(global.debug);

    match args.format {
        OutputFormat::Json => {
            let tunnels: Vec<_> = config
                .tunnels
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "destination": t.destination(),
                        "subnets": t.subnets,
                        "command": builder.build(t),
                    })
                })
                .collect();
            let report = serde_json::json!({ "tunnels": tunnels });
            match serde_json::to_string_pretty(&report) {
                Ok(text) => println!("{}", text),
                Err(e) => return fail(e.into()),
            }
        }
        OutputFormat::Text => {
            if config.tunnels.is_empty() {
                println!("No tunnels configured");
            } else {
                for tunnel in &config.tunnels {
                    println!("{} ({})", tunnel.name, tunnel.destination());
                    println!("  {}", builder.build(tunnel));
                }
            }
        }
    }

    ExitCode::Success
}
