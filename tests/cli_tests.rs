mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use support::TempDb;

fn studiodesk() -> Command {
    let mut cmd = Command::cargo_bin("studiodesk").expect("binary builds");
    cmd.env_remove("STUDIODESK_ADMIN_TOKEN").env("RUST_LOG", "off");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run studiodesk");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn check_config_reports_a_valid_file() {
    let db = TempDb::new();
    let path = db.config("[server]\nbind = \"127.0.0.1:9000\"\n");

    studiodesk()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("127.0.0.1:9000"));
}

#[test]
fn check_config_fails_on_an_invalid_file() {
    let db = TempDb::new();
    let path = db.config("[logging]\nformat = \"xml\"\n");

    studiodesk()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("logging.format"));
}

#[test]
fn migrate_is_idempotent() {
    let db = TempDb::new();
    let path = db.config("");

    let first = json_stdout(studiodesk().args(["--json", "migrate", "--config"]).arg(&path));
    assert!(first["applied"].as_u64().unwrap_or_default() > 0);

    let second = json_stdout(studiodesk().args(["--json", "migrate", "--config"]).arg(&path));
    assert_eq!(second["applied"], 0);
}

#[test]
fn businesses_are_created_and_listed() {
    let db = TempDb::new();
    let path = db.config("");

    let created = json_stdout(
        studiodesk()
            .args(["--json", "business", "create", "Prisma Dance", "--config"])
            .arg(&path),
    );
    assert_eq!(created["name"], "Prisma Dance");

    let listed = json_stdout(studiodesk().args(["--json", "business", "list", "--config"]).arg(&path));
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], created["id"]);
}

#[test]
fn sweep_on_an_empty_database_expires_nothing() {
    let db = TempDb::new();
    let path = db.config("");

    let report = json_stdout(studiodesk().args(["--json", "sweep", "--config"]).arg(&path));
    assert_eq!(report["expired"], 0);
}

#[test]
fn generating_an_unknown_schedule_fails() {
    let db = TempDb::new();
    let path = db.config("");

    studiodesk()
        .args([
            "schedule",
            "generate",
            "--business",
            "missing",
            "--schedule",
            "missing",
            "--from",
            "2026-05-01",
            "--to",
            "2026-05-31",
            "--config",
        ])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
