//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timerkit"))
        .args(args)
        .env("TIMERKIT_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

/// Parse JSON-lines output, keeping only the event objects.
fn events(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .collect()
}

fn count(events: &[serde_json::Value], kind: &str) -> usize {
    events.iter().filter(|e| e["type"] == kind).count()
}

#[test]
fn test_tabata_list_seeds_example() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_ok(dir.path(), &["tabata", "list", "--json"]);
    let list: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Example workout");
    assert_eq!(list[0]["rounds"], 8);

    // Listing again does not seed a second time.
    let stdout = run_ok(dir.path(), &["tabata", "list", "--json"]);
    let again: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(again.as_array().unwrap().len(), 1);
}

#[test]
fn test_tabata_edit_and_run() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(dir.path(), &["tabata", "new", "--name", "Sprints"]).trim().to_string();

    run_ok(dir.path(), &["tabata", "set", &id, "prepare", "2"]);
    run_ok(dir.path(), &["tabata", "set", &id, "work", "2"]);
    run_ok(dir.path(), &["tabata", "set", &id, "rest", "1"]);
    let stdout = run_ok(dir.path(), &["tabata", "rounds", &id, "-100"]);
    assert_eq!(stdout.trim(), "rounds = 1");
    run_ok(dir.path(), &["tabata", "rounds", &id, "1"]);

    let shown: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["tabata", "show", &id])).unwrap();
    assert_eq!(shown["name"], "Sprints");
    assert_eq!(shown["prepare"], 2);
    assert_eq!(shown["rounds"], 2);

    let stdout = run_ok(dir.path(), &["tabata", "run", &id, "--fast", "--json"]);
    let events = events(&stdout);
    assert_eq!(count(&events, "IntervalStarted"), 1);
    // prepare 2 + 1, two rounds of work 2 + 1, one rest 1 + 1
    assert_eq!(count(&events, "IntervalTick"), 3 + 2 * 3 + 2);
    assert_eq!(count(&events, "PhaseChanged"), 4);
    assert_eq!(count(&events, "IntervalCompleted"), 1);
    assert_eq!(events.last().unwrap()["type"], "IntervalCompleted");
}

#[test]
fn test_tabata_rejects_zero_work() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(dir.path(), &["tabata", "new"]).trim().to_string();
    let (_, stderr, code) = run_cli(dir.path(), &["tabata", "set", &id, "work", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_recipe_steps_and_run() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(dir.path(), &["recipe", "new", "--name", "Eggs"]).trim().to_string();
    run_ok(dir.path(), &["recipe", "add-step", &id, "Cool", "2"]);

    let shown: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["recipe", "show", &id])).unwrap();
    let first_step = shown["timers"][0]["id"].as_u64().unwrap().to_string();
    run_ok(dir.path(), &["recipe", "edit-step", &id, &first_step, "--duration", "3", "--label", "Boil"]);
    run_ok(dir.path(), &["recipe", "memo", &id, "ice bath"]);

    let stdout = run_ok(dir.path(), &["recipe", "run", &id, "--fast", "--json"]);
    let events = events(&stdout);
    assert_eq!(count(&events, "StepCompleted"), 2);
    assert_eq!(count(&events, "StepStarted"), 2);
    assert_eq!(count(&events, "RecipeCompleted"), 1);

    run_ok(dir.path(), &["recipe", "remove-step", &id, &first_step]);
    let shown: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["recipe", "show", &id])).unwrap();
    assert_eq!(shown["timers"].as_array().unwrap().len(), 1);
    assert_eq!(shown["memo"], "ice bath");
}

#[test]
fn test_stopwatch_fast_run() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_ok(dir.path(), &["stopwatch", "--for", "2", "--fast", "--json"]);
    let events = events(&stdout);
    let stopped = events
        .iter()
        .find(|e| e["type"] == "StopwatchStopped")
        .expect("stopwatch should stop");
    assert_eq!(stopped["elapsed_hundredths"], 200);
}

#[test]
fn test_stopwatch_timed_run_outlives_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_ok(dir.path(), &["stopwatch", "--for", "1", "--json"]);
    let events = events(&stdout);
    assert_eq!(events.first().unwrap()["type"], "StopwatchStarted");
    let stopped = events
        .iter()
        .find(|e| e["type"] == "StopwatchStopped")
        .expect("timed run should reach its limit");
    assert_eq!(stopped["elapsed_hundredths"], 100);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "tabata.work"]).trim(), "20");
    run_ok(dir.path(), &["config", "set", "tabata.work", "40"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "tabata.work"]).trim(), "40");

    let id = run_ok(dir.path(), &["tabata", "new"]).trim().to_string();
    let shown: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["tabata", "show", &id])).unwrap();
    assert_eq!(shown["work"], 40);

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "tabata.nope", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_delete_missing_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["recipe", "delete", "recipe_missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no recipe"));
}
