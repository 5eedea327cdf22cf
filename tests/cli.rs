use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_generate_from_local_descriptor() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("discovery-stubgen")
        .env_remove("RUST_LOG")
        .arg("--descriptor")
        .arg(fixture("sheets_v4.json"))
        .arg("--no-format")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully created the class 'GoogleSheetsAPIDiscovery'",
        ))
        .stdout(predicate::str::contains(
            "from sheets_discovery import GoogleSheetsAPIDiscovery",
        ));

    let module = fs::read_to_string(dir.path().join("sheets_discovery.py")).unwrap();
    assert!(module.starts_with("from typing import Literal\nclass GoogleSheetsAPIDiscovery:\n"));
    assert!(module.contains("        class _Values:"));
    assert!(!dir.path().join("raw_sheets_discovery.py").exists());
}

#[test]
fn test_missing_formatter_writes_raw_module() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("discovery-stubgen")
        .env_remove("RUST_LOG")
        .arg("--descriptor")
        .arg(fixture("sheets_v4.json"))
        .args(["--formatter", "definitely-missing"])
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "definitely-missing failed to format the output",
        ))
        .stdout(predicate::str::contains("raw_sheets_discovery.py"));

    assert!(dir.path().join("raw_sheets_discovery.py").exists());
    assert!(!dir.path().join("sheets_discovery.py").exists());
}

#[test]
fn test_error_payload_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("error.json");
    fs::write(
        &payload,
        r#"{"error": {"code": 404, "message": "Discovery document not found"}}"#,
    )
    .unwrap();

    cargo_bin_cmd!("discovery-stubgen")
        .env_remove("RUST_LOG")
        .arg("--descriptor")
        .arg(&payload)
        .arg("--no-format")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("error: Invalid response."))
        .stderr(predicate::str::contains("apis-explorer"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
