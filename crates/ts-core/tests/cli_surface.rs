//! CLI surface tests for ts-core.
//!
//! These tests verify help output, argument validation, the add flow
//! against a scratch config file, and the machine-readable status and
//! tunnels listings.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for ts-core binary.
fn ts_core() -> Command {
    cargo_bin_cmd!("ts-core")
}

/// Register a tunnel non-interactively against the given config path.
fn add_tunnel(config: &Path, name: &str) -> assert_cmd::assert::Assert {
    ts_core()
        .args([
            "add",
            "--config",
            config.to_str().unwrap(),
            "--name",
            name,
            "--host",
            "bastion.example.net",
            "--user",
            "deploy",
            "--subnets",
            "10.0.0.0/8,192.168.0.0/16",
            "--skip-probe",
        ])
        .assert()
}

// ============================================================================
// Top-level Help Tests
// ============================================================================

mod top_level {
    use super::*;

    #[test]
    fn help_flag_works() {
        ts_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Tunnel Select"));
    }

    #[test]
    fn version_flag_works() {
        ts_core()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ts-core"));
    }

    #[test]
    fn help_shows_all_commands() {
        ts_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("add"))
            .stdout(predicate::str::contains("status"))
            .stdout(predicate::str::contains("tunnels"));
    }

    #[test]
    fn help_shows_global_options() {
        ts_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--config"))
            .stdout(predicate::str::contains("--debug"))
            .stdout(predicate::str::contains("--verbose"))
            .stdout(predicate::str::contains("--quiet"))
            .stdout(predicate::str::contains("--log-format"))
            .stdout(predicate::str::contains("--log-file"));
    }

    #[test]
    fn unknown_command_fails() {
        ts_core()
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_global_flag_fails() {
        ts_core()
            .arg("--nonexistent-flag")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}

// ============================================================================
// Add Command Tests
// ============================================================================

mod add_command {
    use super::*;

    #[test]
    fn add_help_works() {
        ts_core()
            .args(["add", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Register a new tunnel"))
            .stdout(predicate::str::contains("--skip-probe"));
    }

    #[test]
    fn missing_name_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        ts_core()
            .args(["add", "--config", config.to_str().unwrap()])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "tunnel name is required (use --name)",
            ));
    }

    #[test]
    fn missing_host_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        ts_core()
            .args([
                "add",
                "--config",
                config.to_str().unwrap(),
                "--name",
                "prod",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "SSH hostname is required (use --host)",
            ));
    }

    #[test]
    fn missing_user_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        ts_core()
            .args([
                "add",
                "--config",
                config.to_str().unwrap(),
                "--name",
                "prod",
                "--host",
                "bastion.example.net",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "SSH username is required (use --user)",
            ));
    }

    #[test]
    fn missing_subnets_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        ts_core()
            .args([
                "add",
                "--config",
                config.to_str().unwrap(),
                "--name",
                "prod",
                "--host",
                "bastion.example.net",
                "--user",
                "deploy",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "subnets are required (use --subnets)",
            ));
    }

    #[test]
    fn invalid_cidr_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        ts_core()
            .args([
                "add",
                "--config",
                config.to_str().unwrap(),
                "--name",
                "prod",
                "--host",
                "bastion.example.net",
                "--user",
                "deploy",
                "--subnets",
                "10.0.0.0/99",
                "--skip-probe",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid subnet format"));

        assert!(!config.exists());
    }

    #[test]
    fn add_persists_definition() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        add_tunnel(&config, "prod")
            .success()
            .stdout(predicate::str::contains(
                "Tunnel configuration added successfully!",
            ));

        let saved = std::fs::read_to_string(&config).unwrap();
        assert!(saved.contains("prod"));
        assert!(saved.contains("10.0.0.0/8,192.168.0.0/16"));
    }

    #[test]
    fn duplicate_name_rejected() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");

        add_tunnel(&config, "prod").success();
        add_tunnel(&config, "prod")
            .code(1)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn env_var_selects_config_path() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("env-config.yaml");

        ts_core()
            .env("TUNNEL_SELECT_CONFIG", config.to_str().unwrap())
            .args([
                "add",
                "--name",
                "prod",
                "--host",
                "bastion.example.net",
                "--user",
                "deploy",
                "--subnets",
                "10.0.0.0/8",
                "--skip-probe",
            ])
            .assert()
            .success();

        assert!(config.exists());
    }
}

// ============================================================================
// Status Command Tests
// ============================================================================

mod status_command {
    use super::*;

    #[test]
    fn status_help_works() {
        ts_core()
            .args(["status", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Show active sshuttle sessions"));
    }

    #[test]
    fn status_text_runs() {
        ts_core().arg("status").assert().success();
    }

    #[test]
    fn status_json_parses() {
        let output = ts_core()
            .args(["status", "--format", "json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let report: Value = serde_json::from_slice(&output).unwrap();
        assert!(report.get("scanned_at").and_then(Value::as_str).is_some());
        assert!(report.get("sessions").and_then(Value::as_array).is_some());
        assert!(report.get("count").and_then(Value::as_u64).is_some());
    }

    #[test]
    fn status_short_format_flag() {
        ts_core().args(["status", "-f", "json"]).assert().success();
    }

    #[test]
    fn invalid_format_rejected() {
        ts_core()
            .args(["status", "--format", "xml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}

// ============================================================================
// Tunnels Command Tests
// ============================================================================

mod tunnels_command {
    use super::*;

    #[test]
    fn tunnels_help_works() {
        ts_core()
            .args(["tunnels", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("List saved tunnel definitions"));
    }

    #[test]
    fn lists_saved_tunnels_with_commands() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        add_tunnel(&config, "prod").success();

        ts_core()
            .args(["tunnels", "--config", config.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("prod (deploy@bastion.example.net)"))
            .stdout(predicate::str::contains(
                "sshuttle -r deploy@bastion.example.net 10.0.0.0/8 192.168.0.0/16 --daemon",
            ));
    }

    #[test]
    fn debug_mode_resolves_foreground_commands() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        add_tunnel(&config, "prod").success();

        ts_core()
            .args(["tunnels", "--config", config.to_str().unwrap(), "--debug"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-vvv"))
            .stdout(predicate::str::contains("--daemon").not());
    }

    #[test]
    fn tunnels_json_parses() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        add_tunnel(&config, "prod").success();

        let output = ts_core()
            .args([
                "tunnels",
                "--config",
                config.to_str().unwrap(),
                "--format",
                "json",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let report: Value = serde_json::from_slice(&output).unwrap();
        let tunnels = report.get("tunnels").and_then(Value::as_array).unwrap();
        assert_eq!(tunnels.len(), 1);
        assert_eq!(tunnels[0]["name"], "prod");
        assert_eq!(tunnels[0]["destination"], "deploy@bastion.example.net");
        assert!(tunnels[0]["command"]
            .as_str()
            .unwrap()
            .starts_with("sshuttle -r "));
    }

    #[test]
    fn missing_config_lists_builtin_default() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("absent.yaml");

        ts_core()
            .args(["tunnels", "--config", config.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Example Server"));
    }
}

// ============================================================================
// Logging Flag Tests
// ============================================================================

mod logging_flags {
    use super::*;

    #[test]
    fn verbose_flag_accepted() {
        ts_core().args(["-v", "status"]).assert().success();
    }

    #[test]
    fn quiet_flag_accepted() {
        ts_core().args(["-q", "status"]).assert().success();
    }

    #[test]
    fn log_format_accepted() {
        ts_core()
            .args(["--log-format", "json", "status"])
            .assert()
            .success();
    }

    #[test]
    fn log_file_is_created() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("ts.log");

        ts_core()
            .args(["--log-file", log_path.to_str().unwrap(), "-v", "status"])
            .assert()
            .success();

        assert!(log_path.exists());
    }
}
