// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Tests of the binary application.

use assert_cmd::Command;

#[test]
fn test_bin_basic_automatic() {
    Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/basic.yaml", "--silent", "--overwrite"])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string("temp_atomicj_basic.yaml").unwrap();
    assert!(content.starts_with("# Curves prepared for processing with 'atomicj v"));
    assert!(content.contains("tests/files/inputs/basic.yaml"));
    assert!(content.contains("cells:"));
    assert!(content.contains("identifier: cell_01"));
    assert!(content.contains("identifier: cell_02"));
    assert!(content.contains("formula: hertzian_cone"));
    assert!(content.contains("thin_sample: false"));
    assert!(content.contains("automatic: true"));
    assert!(content.contains("n_curves: 2"));

    std::fs::remove_file("temp_atomicj_basic.yaml").unwrap();
}

#[test]
fn test_bin_manual_apply_to_all() {
    Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/manual.yaml", "--overwrite"])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string("temp_atomicj_manual.yaml").unwrap();
    assert!(content.contains("stiff:"));
    assert!(content.contains("soft:"));
    assert!(content.contains("automatic: false"));
    assert!(content.contains("manual (use Y, x = NaN, y = 8)"));
    assert!(content.contains("manual (use Y, x = NaN, y = 2)"));
    // averaging of recorded curves is switched off
    assert!(!content.contains("n_curves"));

    std::fs::remove_file("temp_atomicj_manual.yaml").unwrap();
}

#[test]
fn test_bin_not_silent() {
    let output = Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/verbose.yaml", "--overwrite"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ATOMICJ v"));
    assert!(stdout.contains("BATCHES PREPARED"));

    std::fs::remove_file("temp_atomicj_verbose.yaml").unwrap();
}

#[test]
fn test_bin_incomplete_settings_fail() {
    Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/incomplete.yaml", "--silent", "--overwrite"])
        .assert()
        .failure()
        .stdout("");

    assert!(!std::path::Path::new("temp_atomicj_incomplete.yaml").exists());
}

#[test]
fn test_bin_unknown_key_fail() {
    Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/unknown_key.yaml", "--silent"])
        .assert()
        .failure();
}

#[test]
fn test_bin_missing_config_fail() {
    Command::cargo_bin("atomicj")
        .unwrap()
        .args(["tests/files/inputs/nonexistent.yaml", "--silent"])
        .assert()
        .failure();
}
