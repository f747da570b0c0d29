use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let yaml = format!(
        r#"
run_id: "cli_smoke"
games:
  seed: 5
  count: 1
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
"#,
        jsonl = dir.join("{run_id}").join("games.jsonl").display(),
        summary = dir.join("{run_id}").join("summary.md").display(),
    );
    let path = dir.join("dalmuti.yaml");
    fs::write(&path, yaml).expect("config written");
    path
}

#[test]
fn validate_only_skips_the_simulation() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path());

    Command::cargo_bin("dalmuti")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--games")
        .arg("4")
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(contains("Loaded configuration 'cli_smoke' (4 games)"))
        .stdout(contains("Validation-only mode"));

    assert!(!dir.path().join("cli_smoke").exists());
}

#[test]
fn run_prints_the_final_snapshot() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path());

    Command::cargo_bin("dalmuti")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--run-id")
        .arg("renamed")
        .arg("--print-snapshot")
        .assert()
        .success()
        .stdout(contains("Simulation complete for 'renamed'"))
        .stdout(contains("\"phase\": \"Over\""));

    assert!(dir.path().join("renamed").join("games.jsonl").exists());
}

#[test]
fn missing_config_fails() {
    let dir = tempdir().expect("temp dir");
    Command::cargo_bin("dalmuti")
        .expect("binary built")
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure();
}
