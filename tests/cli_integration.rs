// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the repolore CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A small full-stack repository on disk
fn fixture_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("package.json", r#"{"description": "A task tracker", "dependencies": {"react": "18.2.0"}}"#),
        ("src/components/TaskList.jsx", "import { get } from '../api';\nexport default function TaskList() {}\n"),
        ("src/api.js", "export const get = (url) => fetch(url);\n"),
        ("server/services/auth.py", "import os\n\n\ndef login(user):\n    \"\"\"Log a user in.\"\"\"\n    return user\n"),
        ("tests/test_auth.py", "from server.services.auth import login\n"),
    ];
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

/// The binary, isolated from the user's config, cache and credentials
fn repolore(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repolore").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("REPOLORE__CACHE_DIR", home.join("clones"))
        .env_remove("REPOLORE_CONFIG")
        .env_remove("GITHUB_TOKEN")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_summary_json() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(repolore(home.path()).args(["--json", "summary"]).arg(repo.path()));
    assert_eq!(value["details"]["description"], "A task tracker");
    assert_eq!(value["details"]["inferred_type"], "Node.js/JavaScript");
    assert_eq!(value["details"]["tech_stack"], serde_json::json!(["react"]));
    assert!(value["summary"].as_str().unwrap().starts_with("A task tracker"));
}

#[test]
fn test_summary_text() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .arg("summary")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("A task tracker"))
        .stdout(predicate::str::contains("Node.js/JavaScript"));
}

#[test]
fn test_deps_json() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(repolore(home.path()).args(["--json", "deps"]).arg(repo.path()));
    assert_eq!(value["total_files"], 4);
    assert_eq!(value["internal_imports"], 1);
    assert_eq!(
        value["edges"],
        serde_json::json!([{"from": "src/components/TaskList.jsx", "to": "src/api.js"}])
    );
    assert!(value["mermaid_diagram"].as_str().unwrap().starts_with("graph TD"));
}

#[test]
fn test_configured_max_depth_limits_discovery() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(
        repolore(home.path())
            .args(["--json", "deps"])
            .arg(repo.path())
            .env("REPOLORE__ANALYSIS__MAX_DEPTH", "2"),
    );
    assert_eq!(value["total_files"], 2);
    assert_eq!(value["edges"], serde_json::json!([]));
}

#[test]
fn test_diagram_formats() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .arg("diagram")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains("src_components_TaskList_jsx --> src_api_js"));

    repolore(home.path())
        .args(["diagram", "--format", "dot", "--max-nodes", "2"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph dependencies {"));
}

#[test]
fn test_diagram_to_file() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();
    let target = home.path().join("deps.mmd");

    repolore(home.path())
        .arg("diagram")
        .arg(repo.path())
        .arg("--output")
        .arg(&target)
        .assert()
        .success();

    assert!(fs::read_to_string(target).unwrap().starts_with("graph TD"));
}

#[test]
fn test_unknown_diagram_format() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .args(["diagram", "--format", "svg"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown diagram format"));
}

#[test]
fn test_symbols_json() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(
        repolore(home.path())
            .args(["--json", "symbols"])
            .arg(repo.path())
            .arg("server/services/auth.py"),
    );
    assert_eq!(value["symbols"][0]["name"], "login");
    assert_eq!(value["symbols"][0]["type"], "function");
    assert_eq!(value["symbols"][0]["start_line"], 4);
    assert_eq!(value["symbols"][0]["docstring"], "Log a user in.");
}

#[test]
fn test_symbols_missing_file() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .arg("symbols")
        .arg(repo.path())
        .arg("server/nope.py")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.py"));
}

#[test]
fn test_profile_without_history() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(repolore(home.path()).args(["--json", "profile"]).arg(repo.path()));
    assert_eq!(value["stats"]["total_files"], 4);
    assert_eq!(value["stats"]["total_commits"], 0);
    let files = value["files"].as_array().unwrap();
    let list = files.iter().find(|f| f["name"] == "TaskList.jsx").unwrap();
    assert_eq!(list["connections"], serde_json::json!(["api.js"]));
}

#[test]
fn test_architecture_json() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    let value = json_stdout(repolore(home.path()).args(["--json", "architecture"]).arg(repo.path()));
    let stats = &value["architecture_stats"];
    assert_eq!(stats["total_files"], 4);
    assert_eq!(stats["frontend_files"], 2);
    assert_eq!(stats["backend_files"], 2);
}

#[test]
fn test_evolution_needs_hosted_repository() {
    let repo = fixture_repo();
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .arg("evolution")
        .arg(repo.path())
        .assert()
        .failure();
}

#[test]
fn test_missing_repository() {
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .args(["summary", "/definitely/not/a/repository"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn test_config_prints_effective_settings() {
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .arg("config")
        .env("REPOLORE__ANALYSIS__DIAGRAM_MAX_NODES", "7")
        .env("GITHUB_TOKEN", "ghp_secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("[analysis]"))
        .stdout(predicate::str::contains("diagram_max_nodes = 7"))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("ghp_secret").not());
}

#[test]
fn test_explicit_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("lore.toml");
    fs::write(&path, "[analysis]\nevolution_commit_limit = 5\n").unwrap();

    let value = json_stdout(repolore(home.path()).args(["--json", "config", "--config"]).arg(&path));
    assert_eq!(value["analysis"]["evolution_commit_limit"], 5);
    assert_eq!(value["analysis"]["profile_commit_limit"], 30);
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();

    repolore(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repolore"));
}
