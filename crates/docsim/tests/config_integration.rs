//! Configuration integration tests.
//!
//! Config discovery, format parsing, and precedence are checked end to end
//! through `info --json`, which reports the effective values.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Command with user config and env overrides neutralised.
fn isolated(home: &Path) -> Command {
    let mut c = cmd();
    c.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".xdg"))
        .env_remove("DOCSIM_LOG_LEVEL")
        .env_remove("DOCSIM_COMPARE__MIN_MATCH_LENGTH");
    c
}

/// Run `info --json` from `dir` and parse the output.
fn info_json_with(dir: &Path, home: &Path, extra: &[&str], env: &[(&str, &str)]) -> Value {
    let mut c = isolated(home);
    c.args(["-C", dir.to_str().unwrap()]).args(extra).args(["info", "--json"]);
    for (key, value) in env {
        c.env(key, value);
    }
    let output = c.output().expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn info_json(dir: &Path) -> Value {
    info_json_with(dir, dir, &[], &[])
}

/// A directory acting as a repository root.
fn repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".git")).unwrap();
    tmp
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = repo();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert_eq!(json["config"]["min_match_length"], 20);
    assert_eq!(json["config"]["min_text_chars"], 50);
    assert_eq!(json["config"]["parallel"], true);
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn discovers_dotfile_config() {
    let tmp = repo();
    fs::write(tmp.path().join(".docsim.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "debug");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".docsim.toml"), "reported: {reported}");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = repo();
    let sub_dir = tmp.path().join("docs").join("drafts");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("docsim.toml"), "max_similarity = 35.0\n").unwrap();

    let json = info_json_with(&sub_dir, tmp.path(), &[], &[]);
    assert_eq!(json["config"]["max_similarity"], 35.0);
}

#[test]
fn closer_config_takes_precedence() {
    let tmp = repo();
    let sub_dir = tmp.path().join("sub");
    fs::create_dir(&sub_dir).unwrap();
    fs::write(tmp.path().join(".docsim.toml"), r#"log_level = "error""#).unwrap();
    fs::write(sub_dir.join(".docsim.toml"), r#"log_level = "warn""#).unwrap();

    let json = info_json_with(&sub_dir, tmp.path(), &[], &[]);
    assert_eq!(json["config"]["log_level"], "warn");
}

#[test]
fn git_boundary_stops_config_search() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join(".docsim.toml"), r#"log_level = "error""#).unwrap();
    let repo_dir = outer.path().join("repo");
    let work = repo_dir.join("src");
    fs::create_dir_all(repo_dir.join(".git")).unwrap();
    fs::create_dir_all(&work).unwrap();

    let json = info_json_with(&work, outer.path(), &[], &[]);
    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
}

// =============================================================================
// Formats and nested sections
// =============================================================================

#[test]
fn nested_sections_from_toml() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.toml"),
        r#"
max_ai_score = 70.0

[compare]
min_match_length = 12
parallel = false

[detector]
min_text_chars = 80
"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["min_match_length"], 12);
    assert_eq!(json["config"]["parallel"], false);
    assert_eq!(json["config"]["min_text_chars"], 80);
    assert_eq!(json["config"]["max_ai_score"], 70.0);
}

#[test]
fn parses_yaml_config() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.yaml"),
        "log_level: warn\ncompare:\n  min_match_length: 30\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "warn");
    assert_eq!(json["config"]["min_match_length"], 30);
}

#[test]
fn parses_json_config() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.json"),
        r#"{"log_level": "debug", "max_input_bytes": 1024}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "debug");
    assert_eq!(json["config"]["input_limit"], 1024);
}

#[test]
fn disable_input_limit_removes_limit() {
    let tmp = repo();
    fs::write(tmp.path().join("docsim.toml"), "disable_input_limit = true\n").unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["input_limit"].is_null());
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = repo();
    fs::write(tmp.path().join(".docsim.toml"), r#"log_level = "debug""#).unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, r#"log_level = "error""#).unwrap();

    let json = info_json_with(
        tmp.path(),
        tmp.path(),
        &["--config", explicit.to_str().unwrap()],
        &[],
    );
    assert_eq!(json["config"]["log_level"], "error");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("ci.toml"), "reported: {reported}");
}

#[test]
fn env_var_overrides_files() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.toml"),
        "[compare]\nmin_match_length = 12\n",
    )
    .unwrap();

    let json = info_json_with(
        tmp.path(),
        tmp.path(),
        &[],
        &[("DOCSIM_COMPARE__MIN_MATCH_LENGTH", "40")],
    );
    assert_eq!(json["config"]["min_match_length"], 40);
}

#[test]
#[cfg(target_os = "linux")]
fn user_config_is_lowest_precedence() {
    let home = TempDir::new().unwrap();
    let user_dir = home.path().join(".xdg").join("docsim");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(
        user_dir.join("config.toml"),
        "max_similarity = 10.0\nlog_level = \"warn\"\n",
    )
    .unwrap();

    let project = repo();
    fs::write(project.path().join(".docsim.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json_with(project.path(), home.path(), &[], &[]);
    assert_eq!(json["config"]["log_level"], "error");
    assert_eq!(json["config"]["max_similarity"], 10.0);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = repo();
    fs::write(tmp.path().join(".docsim.toml"), "log_level = [not valid").unwrap();

    isolated(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_value_shows_error() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.yaml"),
        "compare:\n  min_match_length: lots\n",
    )
    .unwrap();

    isolated(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = repo();
    fs::write(
        tmp.path().join(".docsim.toml"),
        "log_level = \"warn\"\nsomething_else = 3\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "warn");
}
