//! End-to-end tests of the `tsl` binary: config resolution, command
//! output, permission denial exit codes, and the quiet flag.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config with the offline validator so tests never touch the
/// network.
fn write_config(dir: &TempDir) -> (PathBuf, PathBuf) {
    let data_file = dir.path().join("data.json");
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "root_id = \"1\"\ndata_file = {:?}\nvalidator = \"allow\"\n",
            data_file
        ),
    )
    .unwrap();
    (config, data_file)
}

fn tsl(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("tsl").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn first_run_initializes_and_creates_a_store() {
    let dir = TempDir::new().unwrap();
    let (config, data_file) = write_config(&dir);

    tsl(&config)
        .args(["store", "create", "My Shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created store 'my_shop'"))
        .stderr(predicate::str::contains("created new data file"));

    assert!(data_file.exists());

    tsl(&config)
        .args(["store", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_shop"))
        .stdout(predicate::str::contains("unowned"));
}

#[test]
fn whitelist_flow_through_the_binary() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config).args(["store", "create", "shop"]).assert().success();
    tsl(&config)
        .args(["product", "create", "shop", "Epic Sword!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created product 'epic_sword'"));

    tsl(&config)
        .args(["allow", "add", "shop", "epic_sword", "123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whitelisted 123"));

    tsl(&config)
        .args(["allow", "list", "shop", "epic_sword"])
        .assert()
        .success()
        .stdout(predicate::str::contains("123"));

    tsl(&config)
        .args(["allow", "remove", "shop", "epic_sword", "123"])
        .assert()
        .success();

    tsl(&config)
        .args(["allow", "list", "shop", "epic_sword"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whitelist is empty"));
}

#[test]
fn blacklist_blocks_new_whitelist_adds() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config).args(["store", "create", "shop"]).assert().success();
    tsl(&config)
        .args(["product", "create", "shop", "p"])
        .assert()
        .success();
    tsl(&config).args(["deny", "add", "666"]).assert().success();

    tsl(&config)
        .args(["allow", "add", "shop", "p", "666"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("blacklisted"));
}

#[test]
fn unprivileged_caller_is_denied() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config)
        .args(["--caller", "999", "store", "create", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));
}

#[test]
fn owner_can_manage_only_their_store() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config).args(["store", "create", "mine"]).assert().success();
    tsl(&config).args(["store", "create", "other"]).assert().success();
    tsl(&config)
        .args(["owner", "set", "mine", "42"])
        .assert()
        .success();

    tsl(&config)
        .args(["--caller", "42", "product", "create", "mine", "p"])
        .assert()
        .success();

    tsl(&config)
        .args(["--caller", "42", "product", "create", "other", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));
}

#[test]
fn panel_reflects_the_caller_role() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config)
        .arg("panel")
        .assert()
        .success()
        .stdout(predicate::str::contains("role: root"));

    tsl(&config)
        .args(["--caller", "999", "panel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("role: unprivileged"))
        .stdout(predicate::str::contains("no actions available"));
}

#[test]
fn whoami_uses_the_fallback_label_without_a_directory() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown User (1)"));
}

#[test]
fn verify_reports_a_consistent_registry() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config).args(["store", "create", "shop"]).assert().success();
    tsl(&config)
        .args(["owner", "set", "shop", "42"])
        .assert()
        .success();

    tsl(&config)
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("registry is consistent"));
}

#[test]
fn missing_root_id_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "validator = \"allow\"\n").unwrap();

    tsl(&config)
        .args(["store", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("root_id is not configured"));
}

#[test]
fn invalid_caller_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config)
        .args(["--caller", "not-a-number", "panel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --caller"));
}

#[test]
fn quiet_flag_suppresses_normal_output() {
    let dir = TempDir::new().unwrap();
    let (config, _) = write_config(&dir);

    tsl(&config)
        .args(["--quiet", "store", "create", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn corrupt_data_file_recovers_with_a_warning() {
    let dir = TempDir::new().unwrap();
    let (config, data_file) = write_config(&dir);

    fs::write(&data_file, "{definitely not json").unwrap();

    tsl(&config)
        .args(["store", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("data file was unreadable"))
        .stdout(predicate::str::contains("no stores"));

    let backups: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".corrupt."))
        .collect();
    assert_eq!(backups.len(), 1);
}
