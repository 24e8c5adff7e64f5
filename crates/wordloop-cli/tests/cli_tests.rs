//! CLI integration tests using assert_cmd.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wordloop(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("wordloop").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("WORDLOOP_GOOGLE_TTS_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `<dir>/<name>` with one image per word.
fn write_package(dir: &Path, name: &str, words: &[&str]) {
    let pkg = dir.join(name);
    fs::create_dir_all(&pkg).unwrap();
    let mut index = String::from("rank,id,word\n");
    for (i, word) in words.iter().enumerate() {
        index.push_str(&format!("{i},{},{word}\n", 100 + i));
        let image_dir = pkg.join((100 + i).to_string());
        fs::create_dir_all(&image_dir).unwrap();
        fs::write(image_dir.join("1.png"), b"png").unwrap();
    }
    fs::write(pkg.join("index.csv"), index).unwrap();
}

#[test]
fn languages_lists_all() {
    let dir = TempDir::new().unwrap();
    wordloop(dir.path())
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("de-DE-Wavenet-G"))
        .stdout(predicate::str::contains("ja-JP-Wavenet-A"))
        .stdout(predicate::str::contains("mini-spanish-package-k3"))
        .stdout(predicate::str::contains("English"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    wordloop(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wordloop.toml"));
    assert!(dir.path().join("wordloop.toml").exists());

    wordloop(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn inspect_reports_package() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "pkg", &["der Hund", "die Katze"]);
    let index = dir.path().join("pkg").join("index.csv");
    let mut content = fs::read_to_string(&index).unwrap();
    content.push_str("broken\n7,999,das Haus\n");
    fs::write(&index, content).unwrap();

    wordloop(dir.path())
        .args(["inspect", "--package", "pkg", "--language", "de"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hund"))
        .stdout(predicate::str::contains("no images"))
        .stdout(predicate::str::contains("line 4: fewer than two columns"))
        .stdout(predicate::str::contains("2 usable words"));
}

#[test]
fn inspect_missing_package_fails() {
    let dir = TempDir::new().unwrap();
    wordloop(dir.path())
        .args(["inspect", "--package", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn play_until_mastered() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "pkg", &["dog"]);

    wordloop(dir.path())
        .args([
            "play",
            "--language",
            "en",
            "--package",
            "pkg",
            "--silent",
            "--seed",
            "7",
        ])
        .write_stdin("1\n1\n1\n1\n1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1/5."))
        .stdout(predicate::str::contains("Mastered."))
        .stdout(predicate::str::contains(
            "All words mastered! Progress: 100% (1/1)",
        ));
}

#[test]
fn play_remove_counts_as_progress() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "pkg", &["dog", "cat"]);

    wordloop(dir.path())
        .args(["play", "--language", "en", "--package", "pkg", "--silent"])
        .write_stdin("d\nd\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 50% (1/2)"))
        .stdout(predicate::str::contains("Progress: 100% (2/2)"));
}

#[test]
fn play_rejects_out_of_range_option() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "pkg", &["dog"]);

    wordloop(dir.path())
        .args(["play", "--language", "en", "--package", "pkg", "--silent"])
        .write_stdin("0\n9\nxyz\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pick a number from 1 to 1."))
        .stdout(predicate::str::contains("Unknown command `xyz`"));
}

#[test]
fn play_uses_config_packages_dir() {
    let dir = TempDir::new().unwrap();
    write_package(&dir.path().join("packs"), "mini-german-package-k3", &["der Hund"]);
    fs::write(
        dir.path().join("wordloop.toml"),
        "packages_dir = \"packs\"\ndefault_language = \"de\"\n[synthesis]\ntype = \"none\"\n",
    )
    .unwrap();

    wordloop(dir.path())
        .args(["play", "--silent"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("wordloop: German (1 words)"))
        .stdout(predicate::str::contains("der Hund"));
}

#[test]
fn play_missing_package_fails() {
    let dir = TempDir::new().unwrap();
    wordloop(dir.path())
        .args(["play", "--language", "ja", "--silent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("word data unavailable"));
}

#[test]
fn play_rejects_unknown_language() {
    let dir = TempDir::new().unwrap();
    wordloop(dir.path())
        .args(["play", "--language", "xx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown language"));
}

#[test]
fn play_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    wordloop(dir.path())
        .args(["play", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
