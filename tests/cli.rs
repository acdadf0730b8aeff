//! Integration tests for the keyinfo-writer binary

mod util;

use regex::Regex;
use std::path::PathBuf;
use std::process::Command;

fn keyinfo_writer_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_keyinfo-writer"))
}

#[test]
fn test_writes_chain_to_stdout() {
    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("chain.p7b"))
        .output()
        .expect("Failed to execute");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "keyinfo-writer failed: {}", stdout);
    assert!(stdout.starts_with("<?xml"), "Should start with a declaration");

    let x509_data = Regex::new(r"<ds:X509Data>").unwrap();
    assert_eq!(x509_data.find_iter(&stdout).count(), 2);
    assert_eq!(stdout.matches("<ds:KeyValue>").count(), 1);
}

#[test]
fn test_writes_to_output_file() {
    let target = util::scratch_path("cli-output.xml");
    let _ = std::fs::remove_file(&target);

    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("self-signed.cer"))
        .arg(&target)
        .arg("--compact")
        .arg("--no-declaration")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "Nothing should go to stdout");

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("<ds:KeyInfo xmlns:ds=\"http://www.w3.org/2000/09/xmldsig#\">"));
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn test_default_namespace_prefix() {
    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("self-signed.pem"))
        .args(["--prefix", ""])
        .output()
        .expect("Failed to execute");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("<KeyInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">"));
    assert!(stdout.contains("<X509SubjectName>"));
}

#[test]
fn test_missing_file_fails() {
    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("does-not-exist.p7b"))
        .output()
        .expect("Failed to execute");

    assert!(!output.status.success(), "Should fail on a missing file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot read certificate file"), "stderr: {}", stderr);
    assert!(stderr.contains("Exception loading"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unwritable_output_fails() {
    let target = util::scratch_path("cli-no-such-dir").join("keyinfo.xml");
    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("self-signed.cer"))
        .arg(&target)
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Exception writing"), "stderr: {}", stderr);
    assert!(stderr.contains("Failed to write KeyInfo"), "stderr: {}", stderr);
}

#[test]
fn test_bogus_file_fails() {
    let output = Command::new(keyinfo_writer_bin())
        .arg(util::data_path("boguscert"))
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to decode certificates"), "stderr: {}", stderr);
}
