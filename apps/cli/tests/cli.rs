use assert_cmd::Command;
use chrono::{Duration, Utc};
use penmark::licensing::codec::encode;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ACME_KEY: &str = "MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAYA";

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("penmark.toml");
        let store = dir.path().join("org_license_data.json");
        let toml = format!(
            "[licensing]\nstore_path = {:?}\n\n[logging]\nlevel = \"warn\"\n",
            store.display().to_string()
        );
        fs::write(&config, toml).unwrap();
        Self { dir, config }
    }

    #[allow(deprecated)]
    fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("penmark").unwrap();
        cmd.current_dir(self.dir.path()).arg("--config").arg(&self.config);
        cmd
    }

    fn store(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.dir.path().join("org_license_data.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

fn key(days: i64, quota: u64) -> String {
    encode("acme-corp", Utc::now() + Duration::days(days), quota).into_string()
}

#[test]
fn help_lists_commands() {
    Workspace::new()
        .cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verify").and(predicate::str::contains("consume")));
}

#[test]
fn verify_known_key() {
    Workspace::new()
        .cli()
        .args(["verify", ACME_KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"))
        .stdout(predicate::str::contains("acme-corp"))
        .stdout(predicate::str::contains("2030-01-01T00:00:00+00:00"));
}

#[test]
fn verify_is_case_and_dash_insensitive() {
    Workspace::new()
        .cli()
        .args(["verify", &ACME_KEY.replace('-', "").to_lowercase()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents:     500"));
}

#[test]
fn verify_garbage_exits_with_two() {
    Workspace::new()
        .cli()
        .args(["verify", "!!!!!-!!!!!-!!!!!"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("MALFORMED"));
}

#[test]
fn verify_expired_key_exits_with_two() {
    Workspace::new()
        .cli()
        .args(["verify", &key(-1, 10)])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("EXPIRED"));
}

#[test]
fn activate_consume_and_status_share_the_store() {
    let ws = Workspace::new();

    ws.cli()
        .args(["activate", &key(30, 2)])
        .assert()
        .success()
        .stdout(predicate::str::contains("License activated successfully"));

    ws.cli().arg("consume").assert().success().stdout("Document recorded: 1 used, 1 remaining\n");
    ws.cli().arg("consume").assert().success().stdout("Document recorded: 2 used, 0 remaining\n");
    ws.cli()
        .arg("consume")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("maximum number of documents"));

    assert_eq!(ws.store()["usedDocuments"], 2);
    assert_eq!(ws.store()["isActive"], true);

    ws.cli()
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"remainingDocuments\": 0"));
}

#[test]
fn rejected_activation_leaves_no_record() {
    let ws = Workspace::new();

    ws.cli()
        .args(["activate", "not-a-license"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Invalid license key"));

    assert!(!ws.dir.path().join("org_license_data.json").exists());
    ws.cli().arg("status").assert().success().stdout("No active license\n");
}

#[test]
fn consume_without_license_is_refused() {
    Workspace::new()
        .cli()
        .arg("consume")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("No active license"));
}

#[test]
fn missing_config_file_fails() {
    let ws = Workspace::new();
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("penmark").unwrap();
    cmd.current_dir(ws.dir.path())
        .args(["--config", "does-not-exist.toml", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration is malformed"));
}
