//! Integration tests for the unfold CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STORY: &str = r#"{
  "title": "Test Story",
  "start": "hall",
  "sections": {
    "hall": "<p>A hall. <a data-goto-section=\"cellar\">Go down</a> <a id=\"_inline-1\" data-replace-with=\"@note\">read the note</a></p>",
    "cellar": "<p>Dark cellar, {$name}. <a data-goto-section=\"hall\">Back up</a></p>",
    "note": "it says <em>hello</em>"
  },
  "variables": { "name": "Ada" }
}"#;

/// Write a story file into a fresh temp directory.
fn story_file(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("story.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

fn test_story() -> (TempDir, PathBuf) {
    story_file(STORY)
}

fn unfold() -> Command {
    let mut cmd = Command::cargo_bin("unfold").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_story() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lighthouse.json");
    unfold()
        .arg("init")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created story"));

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("The Lighthouse"));
}

#[test]
fn init_fails_if_file_exists() {
    let (_dir, path) = test_story();
    unfold()
        .arg("init")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_sample_passes_check() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lighthouse.json");
    unfold().arg("init").arg(&path).assert().success();

    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 warnings"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_story() {
    let (_dir, path) = test_story();
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All sections expand")
                .and(predicate::str::contains("3 sections")),
        );
}

#[test]
fn check_fails_on_unbalanced_brace() {
    let (_dir, path) = story_file(
        r#"{"title": "Bad", "start": "a", "sections": {"a": "fine", "b": "oops }"}}"#,
    );
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("without a matching")
                .and(predicate::str::contains("1 of 2 sections failed")),
        );
}

#[test]
fn check_lists_warnings() {
    let (_dir, path) = story_file(
        r#"{"title": "Warn", "start": "a", "sections": {"a": "hi {$missing} {#nope}"}}"#,
    );
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(
            predicate::str::contains("variable not set")
                .and(predicate::str::contains("nope is not a function")),
        )
        .stdout(predicate::str::contains("2 warnings"));
}

#[test]
fn check_flags_dangling_link_directives() {
    let (_dir, path) = story_file(
        r#"{"title": "Links", "start": "a", "sections": {"a": "<a data-goto-section=\"nowhere\" data-call-function=\"turn\">x</a> <a data-call-function=\"dance\">y</a>"}}"#,
    );
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(
            predicate::str::contains("links to missing section 'nowhere'")
                .and(predicate::str::contains("calls unknown function 'dance'"))
                .and(predicate::str::contains("turn").not()),
        )
        .stdout(predicate::str::contains("2 warnings"));
}

#[test]
fn check_reports_inclusion_cycle() {
    let (_dir, path) = story_file(
        r#"{"title": "Loop", "start": "a", "sections": {"a": "A{@b}", "b": "B{@a}"}}"#,
    );
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("inclusion cycle"));
}

#[test]
fn check_rejects_missing_start() {
    let (_dir, path) =
        story_file(r#"{"title": "Nope", "start": "zzz", "sections": {"a": "A"}}"#);
    unfold()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load story"));
}

// ---------------------------------------------------------------------------
// expand
// ---------------------------------------------------------------------------

#[test]
fn expand_prints_markup() {
    let (_dir, path) = test_story();
    unfold()
        .arg("expand")
        .arg(&path)
        .arg("cellar")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<p>Dark cellar, Ada. <a data-goto-section="hall">Back up</a></p>"#,
        ));
}

#[test]
fn expand_unknown_section() {
    let (_dir, path) = test_story();
    unfold()
        .arg("expand")
        .arg(&path)
        .arg("attic")
        .assert()
        .failure()
        .stderr(predicate::str::contains("section 'attic' not found"));
}

// ---------------------------------------------------------------------------
// sections
// ---------------------------------------------------------------------------

#[test]
fn sections_lists_every_section() {
    let (_dir, path) = test_story();
    unfold()
        .arg("sections")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cellar")
                .and(predicate::str::contains("note"))
                .and(predicate::str::contains("start"))
                .and(predicate::str::contains("3 sections in 'Test Story'")),
        );
}

#[test]
fn sections_lists_included_sections() {
    let (_dir, path) = story_file(
        r#"{"title": "Parts", "start": "a", "sections": {"a": "{@b} and {@c} {$x}", "b": "B", "c": "C"}}"#,
    );
    unfold()
        .arg("sections")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("b, c"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_follows_links() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin("1\n:quit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("A hall. [1] Go down [2] read the note")
                .and(predicate::str::contains("Dark cellar, Ada. [1] Back up")),
        );
}

#[test]
fn play_replaces_inline_macro() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("A hall. [1] Go down it says hello"));
}

#[test]
fn play_unknown_link_number() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no link [9]"));
}

#[test]
fn play_goto_and_set() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin(":set name Bob\n:goto cellar\n:goto nowhere\n:vars\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Dark cellar, Bob.")
                .and(predicate::str::contains("section not found"))
                .and(predicate::str::contains("name = Bob")),
        );
}

#[test]
fn play_back_and_unset() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin(":back\n1\n:unset name\n:unset name\n:back\n:goto cellar\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("nothing to go back to")
                .and(predicate::str::contains("no variable 'name'"))
                .and(predicate::str::contains("Dark cellar, . [1] Back up")),
        );
}

#[test]
fn play_shows_history_with_links_disabled() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .write_stdin("1\n:history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("A hall. Go down read the note"));
}

#[test]
fn play_hidden_history() {
    let (_dir, path) = test_story();
    unfold()
        .arg("play")
        .arg(&path)
        .arg("--hide-history")
        .write_stdin("1\n:history\n:history on\n:history\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("History is hidden")
                .and(predicate::str::contains("A hall. Go down read the note")),
        );
}

#[test]
fn play_writes_transcript() {
    let (dir, path) = test_story();
    let transcript = dir.path().join("history.json");
    unfold()
        .arg("play")
        .arg(&path)
        .arg("--transcript")
        .arg(&transcript)
        .write_stdin("1\n1\n")
        .assert()
        .success();

    let json = fs::read_to_string(&transcript).unwrap();
    let hall = json.find("\"section\": \"hall\"").unwrap();
    let cellar = json.find("\"section\": \"cellar\"").unwrap();
    assert!(hall < cellar);
    assert!(json.contains("__disabledLink"));
}

#[test]
fn play_custom_start() {
    let (_dir, path) = test_story();
    unfold()
        .args(["play", "--start", "cellar"])
        .arg(&path)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dark cellar"));
}

#[test]
fn play_unknown_start_fails() {
    let (_dir, path) = test_story();
    unfold()
        .args(["play", "--start", "nowhere"])
        .arg(&path)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("section not found"));
}
