//! CLI commands driven through parsed arguments against a temp workspace.

use cityreg::tooling::cli::{Cli, CliContext};
use cityreg::{ApiError, RegistryError};
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ADMIN: &str = "0xadadadadadadadadadadadadadadadadadadadad";
const USER_A: &str = "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a";
const USER_B: &str = "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b";
const ADDR_X: &str = "0x5858585858585858585858585858585858585858";
const ADDR_Y: &str = "0x5959595959595959595959595959595959595959";

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("gotham.toml");
    fs::write(
        &path,
        format!(
            "[registry]\nadmin = \"{}\"\n\n[storage]\nstore_path = \"state\"\n",
            ADMIN
        ),
    )
    .unwrap();
    path
}

/// Run one command line, opening the store for just that command.
fn run(workspace: &Path, config: &Path, args: &[&str]) -> Result<String, ApiError> {
    let workspace_arg = workspace.to_string_lossy().to_string();
    let config_arg = config.to_string_lossy().to_string();
    let mut argv = vec![
        "cityreg",
        "--workspace",
        workspace_arg.as_str(),
        "--config",
        config_arg.as_str(),
    ];
    argv.extend_from_slice(args);

    let cli = Cli::parse_from(argv);
    let context = CliContext::new(cli.workspace.clone(), cli.config.clone())?
        .with_caller(cli.caller);
    context.execute(&cli.command)
}

#[test]
fn test_gotham_through_the_cli() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(workspace.path());
    let ws = workspace.path();

    run(ws, &config, &["init"]).unwrap();
    run(
        ws,
        &config,
        &[
            "city",
            "create",
            "--name",
            "Gotham",
            "--treasury",
            "1000000",
            "--max-population",
            "500000",
        ],
    )
    .unwrap();

    run(
        ws,
        &config,
        &["--as", USER_A, "agent", "create", "--name", "Bruce", "--identity", ADDR_X, "--reputation", "15"],
    )
    .unwrap();
    run(
        ws,
        &config,
        &["--as", USER_B, "agent", "create", "--name", "Joker", "--identity", ADDR_Y, "--reputation", "5"],
    )
    .unwrap();

    let protected = run(ws, &config, &["agent", "kill", "--identity", ADDR_X]);
    assert!(matches!(
        protected,
        Err(ApiError::Registry(RegistryError::CannotKillProtectedAgent(_)))
    ));
    run(ws, &config, &["agent", "kill", "--identity", ADDR_Y]).unwrap();

    let list = run(ws, &config, &["agent", "list"]).unwrap();
    assert!(list.contains("Bruce"));
    assert!(!list.contains("Joker"));
    assert!(list.contains("Total: 1 agent(s)"));

    let log = run(ws, &config, &["log", "--format", "json"]).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&log).unwrap();
    let operations: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| match &entry["operation"] {
            serde_json::Value::String(unit) => unit.as_str(),
            serde_json::Value::Object(map) => map.keys().next().unwrap().as_str(),
            other => panic!("unexpected operation encoding: {}", other),
        })
        .collect();
    assert_eq!(
        operations,
        vec!["initialize", "create_city", "create_agent", "create_agent", "kill_agent"]
    );
}

#[test]
fn test_unknown_caller_cannot_administer() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(workspace.path());
    let ws = workspace.path();
    run(ws, &config, &["init"]).unwrap();

    let result = run(ws, &config, &["--as", USER_A, "admin", "withdraw"]);
    assert!(matches!(
        result,
        Err(ApiError::Registry(RegistryError::Unauthorized { .. }))
    ));

    let claim = run(ws, &config, &["--as", USER_A, "agent", "claim", "--identity", ADDR_X]);
    assert!(matches!(
        claim,
        Err(ApiError::Registry(RegistryError::AgentNotAlive(_)))
    ));
}

#[test]
fn test_missing_config_file() {
    let workspace = TempDir::new().unwrap();
    let missing = workspace.path().join("absent.toml");
    let result = run(workspace.path(), &missing, &["init"]);
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}
