//! Integration tests for the scmpoll CLI
//!
//! These run the binary against temporary git repositories and script
//! plugins described by a temporary config file.

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use common::git_repo::TempGitRepo;

/// Helper function to create a scmpoll command
fn scmpoll() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("scmpoll"))
}

/// Write a config polling `repo` as material `app`
fn write_config(temp: &TempDir, repo: &TempGitRepo, extra: &str) -> PathBuf {
    let path = temp.path().join("config.toml");
    let work = temp.path().join("work");
    fs::write(
        &path,
        format!(
            r#"work_dir = "{}"

[[materials]]
name = "app"
plugin_id = "git"
[materials.configuration]
url = "{}"
{extra}
"#,
            work.display(),
            repo.url()
        ),
    )
    .unwrap();
    path
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn config_arg(path: &Path) -> [String; 2] {
    ["--config".to_string(), path.to_string_lossy().into_owned()]
}

// =============================================================================
// BASIC COMMANDS
// =============================================================================

#[test]
fn test_version() {
    scmpoll()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_json() {
    let value = json_stdout(scmpoll().args(["version", "--json"]));
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_command_prints_hint() {
    scmpoll().assert().success().stdout(predicate::str::contains("--help"));
}

#[test]
fn test_plugins_lists_builtin_and_configured() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    let config = write_config(
        &temp,
        &repo,
        r#"
[[plugins]]
id = "example.scm"
command = "/usr/local/bin/example-scm"
"#,
    );

    let value = json_stdout(scmpoll().args(config_arg(&config)).args(["plugins", "--json"]));
    assert_eq!(value["plugins"], serde_json::json!(["example.scm", "git"]));
}

// =============================================================================
// POLLING
// =============================================================================

#[test]
fn test_latest_reports_head() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    repo.write_file("README.md", "hello");
    let head = repo.commit_all("Initial commit");
    let config = write_config(&temp, &repo, "");

    let value = json_stdout(scmpoll().args(config_arg(&config)).args(["latest", "app", "--json"]));

    assert_eq!(value["material"], "app");
    assert_eq!(value["plugin_id"], "git");
    let mods = value["modifications"].as_array().unwrap();
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0]["revision"], head.as_str());
    assert_eq!(mods[0]["user_name"], "Test User");
    assert_eq!(mods[0]["comment"], "Initial commit");
    assert_eq!(mods[0]["modified_files"][0]["file_name"], "README.md");
    assert_eq!(mods[0]["modified_files"][0]["action"], "added");

    let data: Value = serde_json::from_str(mods[0]["additional_data"].as_str().unwrap()).unwrap();
    assert_eq!(data["branch"], "master");
}

#[test]
fn test_latest_human_output() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    repo.write_file("README.md", "hello");
    let head = repo.commit_all("Initial commit");
    let config = write_config(&temp, &repo, "");

    scmpoll()
        .args(config_arg(&config))
        .args(["latest", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains(head))
        .stdout(predicate::str::contains("Initial commit"))
        .stdout(predicate::str::contains("README.md"));
}

#[test]
fn test_latest_empty_repository() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    let config = write_config(&temp, &repo, "");

    scmpoll()
        .args(config_arg(&config))
        .args(["latest", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No new revisions"));
}

#[test]
fn test_since_lists_newer_revisions() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    repo.write_file("a.txt", "1");
    let first = repo.commit_all("first");
    repo.write_file("a.txt", "2");
    let second = repo.commit_all("second");
    repo.write_file("a.txt", "3");
    let third = repo.commit_all("third");
    let config = write_config(&temp, &repo, "");

    let value = json_stdout(scmpoll().args(config_arg(&config)).args([
        "since",
        "app",
        "--revision",
        first.as_str(),
        "--data",
        "branch=master",
        "--json",
    ]));

    let ids: Vec<_> = value["modifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["revision"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![third, second]);
}

#[test]
fn test_since_up_to_date() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    repo.write_file("a.txt", "1");
    let head = repo.commit_all("first");
    let config = write_config(&temp, &repo, "");

    let value = json_stdout(scmpoll().args(config_arg(&config)).args([
        "since",
        "app",
        "-r",
        head.as_str(),
        "-t",
        "2024-01-01T00:00:00.000Z",
        "--json",
    ]));
    assert_eq!(value["modifications"], serde_json::json!([]));
}

#[cfg(unix)]
#[test]
fn test_latest_through_process_plugin() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("plugin.sh");
    fs::write(
        &script,
        r#"cat > /dev/null
echo '{"revision": {"revision": "p-1", "timestamp": "2011-07-14T19:43:37.100Z", "user": "bob"}}'
"#,
    )
    .unwrap();
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        format!(
            r#"work_dir = "{}"

[[plugins]]
id = "example.scm"
command = "sh"
args = ["{}"]

[[materials]]
name = "ext"
plugin_id = "example.scm"
"#,
            temp.path().join("work").display(),
            script.display()
        ),
    )
    .unwrap();

    let value = json_stdout(scmpoll().args(config_arg(&config)).args(["latest", "ext", "--json"]));
    assert_eq!(value["plugin_id"], "example.scm");
    assert_eq!(value["modifications"][0]["revision"], "p-1");
    assert_eq!(value["modifications"][0]["user_name"], "bob");
    assert_eq!(value["modifications"][0]["modified_time"], "2011-07-14T19:43:37.100Z");
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_unknown_material_fails() {
    let temp = TempDir::new().unwrap();
    let repo = TempGitRepo::new();
    let config = write_config(&temp, &repo, "");

    scmpoll()
        .args(config_arg(&config))
        .args(["latest", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no material named 'nope'"));
}

#[test]
fn test_unregistered_plugin_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        r#"
[[materials]]
name = "app"
plugin_id = "svn"
"#,
    )
    .unwrap();

    scmpoll()
        .args(config_arg(&config))
        .args(["latest", "app"])
        .env("XDG_CACHE_HOME", temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("svn"));
}

#[test]
fn test_missing_config_fails() {
    scmpoll()
        .args(["--config", "/nonexistent/scmpoll.toml", "plugins"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

#[test]
fn test_bad_data_argument_rejected() {
    scmpoll()
        .args(["since", "app", "--revision", "abc", "--data", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}
