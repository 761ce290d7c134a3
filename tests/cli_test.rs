use std::{fs, path::Path, process::Command, process::Output};

use tempfile::TempDir;

fn heartnotes(tmp: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_heartnotes"))
        .arg("--config")
        .arg(tmp.join("config.json"))
        .arg("--data-dir")
        .arg(tmp.join("data"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn listed_notes(tmp: &Path, filter: &str) -> Vec<serde_json::Value> {
    let output = heartnotes(tmp, &["list", "--json", "--filter", filter]);
    assert!(output.status.success());
    serde_json::from_str(&stdout(&output)).unwrap()
}

#[test]
fn test_add_then_list_newest_first() {
    let tmp = TempDir::new().unwrap();

    assert!(heartnotes(tmp.path(), &["add", "-c", "good morning"]).status.success());
    let output = heartnotes(tmp.path(), &["add", "-c", "good night", "-m", "sleepy"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Note saved with ID:"));

    let notes = listed_notes(tmp.path(), "all");
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["content"], "good night");
    assert_eq!(notes[0]["mood"], "sleepy");
    assert_eq!(notes[1]["content"], "good morning");
    assert!(notes[1]["mood"].is_null());
    assert!(notes[0]["date"].is_string());
    assert!(notes[0]["timestamp"].is_i64());

    assert_eq!(listed_notes(tmp.path(), "today").len(), 2);
    assert_eq!(listed_notes(tmp.path(), "week").len(), 2);
}

#[test]
fn test_empty_note_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let output = heartnotes(tmp.path(), &["add", "-c", "   "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid note"));

    assert!(listed_notes(tmp.path(), "all").is_empty());
}

#[test]
fn test_photo_only_note() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("us.png");
    let bogus = tmp.path().join("readme.txt");
    fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();
    fs::write(&bogus, "not a picture").unwrap();

    let output = heartnotes(
        tmp.path(),
        &["add", "-i", photo.to_str().unwrap(), "-i", bogus.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Skipped image"));

    let notes = listed_notes(tmp.path(), "all");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["content"], "");
    assert_eq!(notes[0]["images"].as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["images"][0]["name"], "us.png");
    assert_eq!(notes[0]["images"][0]["data"], "data:image/png;base64,iVBORw==");
}

#[test]
fn test_delete_note() {
    let tmp = TempDir::new().unwrap();
    heartnotes(tmp.path(), &["add", "-c", "keep me"]);
    heartnotes(tmp.path(), &["add", "-c", "remove me"]);

    let notes = listed_notes(tmp.path(), "all");
    let id = notes[0]["id"].as_i64().unwrap().to_string();

    let output = heartnotes(tmp.path(), &["delete", &id, "--force"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("deleted"));

    let notes = listed_notes(tmp.path(), "all");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["content"], "keep me");

    let output = heartnotes(tmp.path(), &["delete", &id, "--force"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No note with ID"));
}

#[test]
fn test_show_missing_note_fails() {
    let tmp = TempDir::new().unwrap();

    let output = heartnotes(tmp.path(), &["show", "12345"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Note not found: 12345"));
}

#[test]
fn test_heart_counter_accumulates_within_a_day() {
    let tmp = TempDir::new().unwrap();

    let output = heartnotes(tmp.path(), &["hearts"]);
    assert!(stdout(&output).contains("0 hearts today"));

    heartnotes(tmp.path(), &["heart"]);
    let output = heartnotes(tmp.path(), &["heart"]);
    assert!(stdout(&output).contains("2 hearts today"));

    let output = heartnotes(tmp.path(), &["hearts"]);
    assert!(stdout(&output).contains("2 hearts today"));

    let stored = fs::read_to_string(tmp.path().join("data").join("heartCount")).unwrap();
    assert_eq!(stored, "2");
}

#[test]
fn test_stale_counter_is_reset() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("heartCount"), "4").unwrap();
    fs::write(data.join("lastHeartReset"), "Thu Jan 01 1970").unwrap();

    let output = heartnotes(tmp.path(), &["hearts"]);
    assert!(stdout(&output).contains("0 hearts today"));
    assert_eq!(fs::read_to_string(data.join("heartCount")).unwrap(), "0");
}

#[test]
fn test_malformed_notes_load_as_empty() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("ldrNotes"), "definitely not json").unwrap();

    assert!(listed_notes(tmp.path(), "all").is_empty());
    assert!(heartnotes(tmp.path(), &["add", "-c", "fresh start"]).status.success());
    assert_eq!(listed_notes(tmp.path(), "all").len(), 1);

    let kept = fs::read_to_string(data.join("ldrNotes-unreadable")).unwrap();
    assert_eq!(kept, "definitely not json");
}

#[test]
fn test_config_reset_writes_defaults() {
    let tmp = TempDir::new().unwrap();

    let output = heartnotes(tmp.path(), &["config", "--reset"]);
    assert!(output.status.success());

    let written = fs::read_to_string(tmp.path().join("config.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["default_filter"], "all");
    assert_eq!(value["list_limit"], 20);
}
