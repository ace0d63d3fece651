#![cfg(feature = "cli")]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

fn word_list(count: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..count {
        writeln!(file, "Song {}-Artist {}", i, i).unwrap();
    }
    file.flush().unwrap();
    file
}

fn run_bingo(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_music-bingo"))
        .args(args)
        .current_dir(workdir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn pdf_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .map(|e| e.file_name().to_string_lossy().ends_with(".pdf"))
                .unwrap_or(false)
        })
        .count()
}

#[test]
fn test_dry_run_stdout_is_json() {
    let input = word_list(30);
    let workdir = TempDir::new().unwrap();

    let output = run_bingo(
        workdir.path(),
        &[input.path().to_str().unwrap(), "1", "--dry-run"],
    );

    assert!(output.status.success());
    let layout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(layout["card_number"], 1);
    assert_eq!(layout["cells"].as_array().unwrap().len(), 25);
    assert_eq!(pdf_count(workdir.path()), 0);
}

#[test]
fn test_dry_run_verbose_keeps_stdout_clean() {
    let input = word_list(30);
    let workdir = TempDir::new().unwrap();

    let output = run_bingo(
        workdir.path(),
        &[input.path().to_str().unwrap(), "--dry-run", "--verbose"],
    );

    assert!(output.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_missing_word_list_exit_code() {
    let workdir = TempDir::new().unwrap();

    let output = run_bingo(workdir.path(), &["does-not-exist.txt", "2"]);

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("doesn't exist. Stopping."));
}

#[test]
fn test_zero_cards_with_short_list_exits_cleanly() {
    let input = word_list(10);
    let workdir = TempDir::new().unwrap();

    let output = run_bingo(workdir.path(), &[input.path().to_str().unwrap(), "0"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(pdf_count(workdir.path()), 0);
}

#[test]
fn test_cards_written_to_output_dir() {
    let input = word_list(30);
    let workdir = TempDir::new().unwrap();
    let out_dir = workdir.path().join("cards");

    let output = run_bingo(
        workdir.path(),
        &[
            input.path().to_str().unwrap(),
            "2",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    assert!(out_dir.join("bingo_1.pdf").exists());
    assert!(out_dir.join("bingo_2.pdf").exists());
}
