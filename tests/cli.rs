//! End-to-end tests of the packtrie binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ANIMALS: &str = "bat bats cat cats dog dogs fish fishing dogging\n";

/// Temp directory with a word source, an empty config and a packed dictionary
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("animals.txt"), ANIMALS).unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();

        let fixture = Fixture { dir };
        let (_, stderr, ok) = fixture.run(&[
            "pack",
            "animals.txt",
            "-o",
            "animals.packed",
            "--quiet",
        ]);
        assert!(ok, "pack failed: {}", stderr);
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run the binary inside the fixture directory with colors off
    fn run(&self, args: &[&str]) -> (String, String, bool) {
        run_in(self.dir.path(), args)
    }
}

fn run_in(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_packtrie"))
        .args(args)
        .args(["--color", "never", "--config"])
        .arg(dir.join("config.json"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run packtrie");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_pack_writes_file() {
    let fixture = Fixture::new();
    let packed = fs::read_to_string(fixture.path("animals.packed")).unwrap();
    assert_eq!(packed, "bat3cat3dog2fish1;!ing;!ging,s;!s\n");
}

#[test]
fn test_pack_to_stdout() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["pack", "animals.txt"]);
    assert!(ok);
    assert_eq!(stdout, "bat3cat3dog2fish1;!ing;!ging,s;!s\n");
}

#[test]
fn test_pack_without_symbols() {
    let fixture = Fixture::new();
    fs::write(fixture.path("shared.txt"), "ab abs cb cbs db dbs eb ebs fb fbs").unwrap();

    let (with_symbols, _, ok) = fixture.run(&["pack", "shared.txt"]);
    assert!(ok);
    let (relative, _, ok) = fixture.run(&["pack", "shared.txt", "--max-symbols", "0"]);
    assert!(ok);
    assert!(!relative.contains(':'));
    assert!(with_symbols.len() <= relative.len());
}

#[test]
fn test_lookup() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["lookup", "animals.packed", "cats", "Dogging", "cow"]);
    assert!(ok);
    assert_eq!(
        stdout,
        "found   cats\nfound   Dogging\nmissing cow\n"
    );
}

#[test]
fn test_check() {
    let fixture = Fixture::new();
    fs::write(fixture.path("good.txt"), "bat\ncats\nfishing\n").unwrap();
    fs::write(fixture.path("bad.txt"), "bat\ncow\nfishing\n").unwrap();

    let (stdout, _, ok) = fixture.run(&["check", "animals.packed", "good.txt"]);
    assert!(ok);
    assert_eq!(stdout, "3/3 words found\n");

    let (stdout, _, ok) = fixture.run(&["check", "animals.packed", "bad.txt"]);
    assert!(!ok);
    assert_eq!(stdout, "missing cow\n2/3 words found\n");
}

#[test]
fn test_match() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["match", "animals.packed", "fishingrod"]);
    assert!(ok);
    assert_eq!(stdout, "fishingrod\n   4 fish\n   7 fishing\n");
}

#[test]
fn test_words() {
    let fixture = Fixture::new();

    let (stdout, _, ok) = fixture.run(&["words", "animals.packed", "--from", "dog"]);
    assert!(ok);
    assert_eq!(stdout, "dog\ndogging\ndogs\n");

    let (stdout, _, ok) = fixture.run(&[
        "words",
        "animals.packed",
        "--from",
        "c",
        "--beyond",
        "e",
        "--limit",
        "3",
    ]);
    assert!(ok);
    assert_eq!(stdout, "cat\ncats\ndog\n");
}

#[test]
fn test_words_normalizes_bounds() {
    let fixture = Fixture::new();

    let (stdout, _, ok) = fixture.run(&["words", "animals.packed", "--from", "Dog"]);
    assert!(ok);
    assert_eq!(stdout, "dog\ndogging\ndogs\n");

    let (stdout, _, ok) = fixture.run(&[
        "words", "animals.packed", "--from", "C", "--beyond", "D",
    ]);
    assert!(ok);
    assert_eq!(stdout, "cat\ncats\n");
}

#[test]
fn test_words_uses_configured_limit() {
    let fixture = Fixture::new();
    fs::write(fixture.path("config.json"), r#"{"default_limit": 2}"#).unwrap();

    let (stdout, _, ok) = fixture.run(&["words", "animals.packed"]);
    assert!(ok);
    assert_eq!(stdout, "bat\nbats\n");
}

#[test]
fn test_stats_json() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["stats", "animals.packed", "--json"]);
    assert!(ok);

    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["words"], 9);
    assert_eq!(stats["records"], 4);
    assert_eq!(stats["symbols"], 0);
}

#[test]
fn test_stats_text() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["stats", "animals.packed"]);
    assert!(ok);
    assert!(stdout.contains("Pack Statistics"));
    assert!(stdout.contains("Words:             9"));
}

#[test]
fn test_invalid_packed_file() {
    let fixture = Fixture::new();
    fs::write(fixture.path("broken.packed"), "b,a\n").unwrap();

    let (_, stderr, ok) = fixture.run(&["lookup", "broken.packed", "a"]);
    assert!(!ok);
    assert!(stderr.contains("Invalid packed file"), "stderr: {}", stderr);
    assert!(stderr.contains("not in order"), "stderr: {}", stderr);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("words.txt"), "a b").unwrap();
    // run_in always passes --config, and this directory has none
    let (_, stderr, ok) = run_in(dir.path(), &["pack", "words.txt"]);
    assert!(!ok);
    assert!(stderr.contains("Failed to read config file"), "stderr: {}", stderr);
}
