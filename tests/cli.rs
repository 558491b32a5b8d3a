//! CLI integration tests
//!
//! Drive the `tally` binary through piped stdin against a temporary data
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tally(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_output() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("income and expense ledger"))
        .stdout(predicate::str::contains("menu"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn test_sign_up_sign_in_and_add() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .write_stdin("2\nalice\nsecret\ny\n1\nalice\nsecret\n1\n1\n15/03/2024\n1\nBonus\n500\n0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Sign in"))
        .stdout(predicate::str::contains("4. search transactions"));

    let contents = fs::read_to_string(temp.path().join("data").join("transactions.csv")).unwrap();
    assert_eq!(contents, "alice,0,15/03/2024,0,Bonus,500\n");
    assert!(temp.path().join("data").join("users.dat").exists());
}

#[test]
fn test_data_survives_restart() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .write_stdin("2\nbob\npw\nn\n1\nbob\npw\n1\n2\n01/01/2024\n1\nLunch\n-12.5\n0\n0\n")
        .assert()
        .success();

    tally(&temp)
        .write_stdin("1\nbob\npw\n5\n0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. Expense   01/01/2024     Food"))
        .stdout(predicate::str::contains("-12.50"));
}

#[test]
fn test_wrong_password() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .write_stdin("2\nbob\npw\nn\n1\nbob\nnope\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sign in failed."));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    tally(&temp).write_stdin("").assert().success();
}

#[test]
fn test_init_and_config() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(temp.path().join("config.json").exists());

    tally(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("transactions.csv"))
        .stdout(predicate::str::contains("MultiUser"));
}

#[test]
fn test_audit_lists_mutations() {
    let temp = TempDir::new().unwrap();
    tally(&temp)
        .write_stdin("2\nbob\npw\nn\n1\nbob\npw\n1\n2\n01/01/2024\n1\nLunch\n-12.5\n0\n0\n")
        .assert()
        .success();

    tally(&temp)
        .args(["audit", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE User bob by bob"))
        .stdout(predicate::str::contains("CREATE Transaction 1 by bob"))
        .stdout(predicate::str::contains(&tally::crypto::hash_password("pw")).not());
}

#[test]
fn test_single_user_layout_from_settings() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.json"),
        r#"{"record_layout":"single_user"}"#,
    )
    .unwrap();

    tally(&temp)
        .write_stdin("2\nsolo\npw\nn\n1\nsolo\npw\n1\n1\n02/02/2024\n2\nTips\n7.25\n0\n0\n")
        .assert()
        .success();

    let contents = fs::read_to_string(temp.path().join("data").join("transactions.csv")).unwrap();
    assert_eq!(contents, "0,02/02/2024,1,Tips,7.25\n");
}
