//! CLI integration tests driving the compiled binary.

use std::io::Write;
use std::process::Command;

use tempfile::{tempdir, NamedTempFile};

fn kmerfreq_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kmerfreq"))
}

fn reads_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn cli_help_flag() {
    let output = kmerfreq_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kmerfreq"));
    assert!(stdout.contains("k-mer"));
}

#[test]
fn cli_version_flag() {
    let output = kmerfreq_cmd()
        .arg("--version")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_missing_args() {
    let output = kmerfreq_cmd().output().expect("Failed to execute");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("required") || stderr.contains("Usage"));
}

#[test]
fn cli_invalid_k() {
    let file = reads_file("ACGT\n", ".txt");
    let output = kmerfreq_cmd()
        .args([file.path().to_str().unwrap(), "abc", "10"])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
}

#[test]
fn cli_k_zero() {
    let file = reads_file("ACGT\n", ".txt");
    let output = kmerfreq_cmd()
        .args([file.path().to_str().unwrap(), "0", "10"])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
}

#[test]
fn cli_top_count_zero() {
    let file = reads_file("ACGT\n", ".txt");
    let output = kmerfreq_cmd()
        .args([file.path().to_str().unwrap(), "4", "0"])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
}

#[test]
fn cli_invalid_false_positive_rate() {
    let file = reads_file("ACGT\n", ".txt");
    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--false-positive-rate",
            "2.0",
        ])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("false_positive_rate"));
}

#[test]
fn cli_invalid_file_path() {
    let output = kmerfreq_cmd()
        .args(["/nonexistent/path/reads.txt", "4", "10"])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
}

#[test]
fn cli_counts_repeats_from_text_input() {
    let file = reads_file("ACGTACGTACGT\n", ".txt");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--quiet",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ACGT\t2"));
    assert!(db.exists());
}

#[test]
fn cli_naive_mode_counts_every_occurrence() {
    let file = reads_file("ACGTACGTACGT\n", ".txt");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--quiet",
            "--no-filter",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ACGT\t3"));
    assert!(stdout.contains("CGTA\t2"));
}

#[test]
fn cli_fastq_input() {
    let file = reads_file("@r1\nACGTACGTACGT\n+\nIIIIIIIIIIII\n", ".fastq");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--quiet",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ACGT\t2"));
}

#[test]
fn cli_json_output() {
    let file = reads_file("ACGTACGTACGT\n", ".txt");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--quiet",
            "--format",
            "json",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"kmer\": \"ACGT\""));
    assert!(stdout.contains("\"count\": 2"));
}

#[test]
fn cli_remove_database_flag() {
    let file = reads_file("ACGTACGTACGT\n", ".txt");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--quiet",
            "--remove-database",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    assert!(!db.exists());
}

#[test]
fn cli_reports_database_path_unless_quiet() {
    let file = reads_file("ACGTACGTACGT\n", ".txt");
    let dir = tempdir().unwrap();
    let db = dir.path().join("counts.db");

    let output = kmerfreq_cmd()
        .args([
            file.path().to_str().unwrap(),
            "4",
            "10",
            "--database-path",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Results are saved to"));
}
