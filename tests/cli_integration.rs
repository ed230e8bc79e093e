//! Integration tests for the `aisle` CLI.
//!
//! Each test creates a temp project directory, runs `aisle` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Run `aisle -C <root> <args...>`.
fn aisle(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aisle"))
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run aisle")
}

fn stdout(out: &Output) -> String {
    assert!(
        out.status.success(),
        "aisle failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout.clone()).unwrap()
}

/// Create a project with a few to-dos, contacts and messages.
fn create_test_project(root: &Path) {
    let data = root.join("aisle");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("aisle.toml"),
        "[view]\ntodos_sort = \"deadline\"\n",
    )
    .unwrap();
    fs::write(
        data.join("todos.json"),
        r#"[
  {"id": "t1", "name": "Book venue", "category": "Venue", "deadline": "2026-10-10", "orderIndex": 0},
  {"id": "t2", "name": "Cake tasting", "category": "Baker", "deadline": "2026-10-17", "orderIndex": 1},
  {"id": "t3", "name": "Order favors", "category": "Favors", "deadline": "2026-10-20", "orderIndex": 2},
  {"id": "t4", "name": "Send invites", "category": "Stationery", "orderIndex": 3},
  {"id": "t5", "name": "Pick rings", "category": "Jewelry", "deadline": "2026-09-01", "isCompleted": true, "orderIndex": 4}
]
"#,
    )
    .unwrap();
    fs::write(
        data.join("contacts.json"),
        r#"[
  {"id": "c1", "name": "Ana Florals", "category": "Florist", "email": "ana@example.com", "orderIndex": 0},
  {"id": "c2", "name": "Ben Beats", "category": "DJ", "orderIndex": 1},
  {"id": "c3", "name": "Cara Cakes", "category": "Baker", "orderIndex": 2}
]
"#,
    )
    .unwrap();
    fs::write(
        data.join("messages.json"),
        r#"[
  {"id": "m1", "contactId": "c2", "createdAt": "2026-10-16T18:30:00"},
  {"id": "m2", "contactId": "c3", "createdAt": "2026-10-01T09:00:00"}
]
"#,
    )
    .unwrap();
}

/// Ids from `[ ] t1 Name ...` lines
fn todo_ids(out: &str) -> Vec<&str> {
    out.lines()
        .filter_map(|l| l.get(4..)?.split(' ').next())
        .collect()
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    create_test_project(tmp.path());
    tmp
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_layout() {
    let tmp = TempDir::new().unwrap();
    let out = stdout(&aisle(tmp.path(), &["init"]));
    assert!(out.contains("Initialized aisle project"));
    for file in ["aisle.toml", "contacts.json", "todos.json", "messages.json"] {
        assert!(tmp.path().join("aisle").join(file).exists(), "{file} missing");
    }

    let todos = stdout(&aisle(tmp.path(), &["todos", "--flat"]));
    assert_eq!(todos, "");
}

#[test]
fn init_refuses_existing_project() {
    let tmp = project();
    let out = aisle(tmp.path(), &["init"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--force"));
}

// ---------------------------------------------------------------------------
// todos
// ---------------------------------------------------------------------------

#[test]
fn todos_grouped_by_deadline() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["todos", "--today", "2026-10-17"]));
    assert_eq!(
        out,
        "\
== Overdue (1) ==
[ ] t1 Book venue (Venue) due 2026-10-10

== Today (1) ==
[ ] t2 Cake tasting (Baker) due 2026-10-17

== This Week (1) ==
[ ] t3 Order favors (Favors) due 2026-10-20

== No date yet (1) ==
[ ] t4 Send invites (Stationery)
"
    );
}

#[test]
fn todos_all_includes_completed() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["todos", "--flat", "--all", "--sort", "name-asc"]));
    let ids = todo_ids(&out);
    assert_eq!(ids, ["t1", "t2", "t3", "t5", "t4"]);
    assert!(out.contains("[x] t5 Pick rings"));
}

#[test]
fn todos_search_and_category_filter() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["todos", "--flat", "-q", "cake"]));
    assert_eq!(out, "[ ] t2 Cake tasting (Baker) due 2026-10-17\n");

    let out = stdout(&aisle(
        tmp.path(),
        &["todos", "--flat", "-c", "Venue", "-c", "Favors"],
    ));
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("t1") && out.contains("t3"));
}

#[test]
fn todos_json_groups() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["--json", "todos", "--today", "2026-10-17"]));
    let groups: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["group"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Overdue", "Today", "This Week", "No date yet"]);
    assert_eq!(groups[0]["todos"][0]["id"], "t1");
}

#[test]
fn todos_bad_today_is_an_error() {
    let tmp = project();
    let out = aisle(tmp.path(), &["todos", "--today", "tomorrow"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid --today"));
}

// ---------------------------------------------------------------------------
// contacts / categories
// ---------------------------------------------------------------------------

#[test]
fn contacts_by_recent_activity() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["contacts", "--sort", "recent-desc"]));
    assert_eq!(
        out,
        "\
c2 Ben Beats (DJ) last 2026-10-16 18:30
c3 Cara Cakes (Baker) last 2026-10-01 09:00
c1 Ana Florals (Florist) <ana@example.com>
"
    );
}

#[test]
fn categories_in_use_and_picker() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["categories", "contacts"]));
    assert_eq!(out, "Baker\nDJ\nFlorist\n");

    let out = stdout(&aisle(tmp.path(), &["categories", "todos", "--picker"]));
    let options: Vec<&str> = out.lines().collect();
    assert_eq!(options.last(), Some(&"Other"));
    assert!(options.contains(&"Jewelry"));
    assert!(options.contains(&"Wedding Planner"));
}

// ---------------------------------------------------------------------------
// reorder
// ---------------------------------------------------------------------------

#[test]
fn reorder_after_renumbers_densely() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["reorder", "todos", "t1", "t3", "--after"]));
    assert_eq!(
        out,
        "\
t1 after t3
t2: 1 -> 0
t3: 2 -> 1
t1: 0 -> 2
"
    );

    let out = stdout(&aisle(tmp.path(), &["todos", "--flat", "--sort", "manual"]));
    let ids = todo_ids(&out);
    assert_eq!(ids, ["t2", "t3", "t1", "t4"]);

    // Other fields survive the rewrite
    let raw = fs::read_to_string(tmp.path().join("aisle/todos.json")).unwrap();
    assert!(raw.contains("\"deadline\": \"2026-10-20\""));
}

#[test]
fn reorder_already_in_place() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["reorder", "contacts", "c1", "c2", "--before"]));
    assert_eq!(out, "already in place\n");
}

#[test]
fn reorder_json() {
    let tmp = project();
    let out = stdout(&aisle(
        tmp.path(),
        &["--json", "reorder", "contacts", "c3", "c1", "--before"],
    ));
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["source"], "c3");
    assert_eq!(v["target"], "c1");
    assert_eq!(v["side"], "before");
    assert_eq!(v["changes"].as_array().unwrap().len(), 3);
}

#[test]
fn reorder_unknown_id_fails() {
    let tmp = project();
    let out = aisle(tmp.path(), &["reorder", "todos", "t1", "t99", "--after"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no item with id 't99'"));
}

#[test]
fn reorder_onto_itself_fails() {
    let tmp = project();
    let out = aisle(tmp.path(), &["reorder", "todos", "t1", "t1", "--before"]);
    assert!(!out.status.success());
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_set_sort_persists() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["config", "set-sort", "contacts", "recent-desc"]));
    assert_eq!(out, "default sort set to recent-desc\n");

    let toml = fs::read_to_string(tmp.path().join("aisle/aisle.toml")).unwrap();
    assert!(toml.contains("contacts_sort = \"recent-desc\""));
    assert!(toml.contains("todos_sort = \"deadline\""));

    let out = stdout(&aisle(tmp.path(), &["contacts"]));
    assert!(out.starts_with("c2 Ben Beats"));
}

#[test]
fn config_show_completed_lists_done_items() {
    let tmp = project();
    let out = stdout(&aisle(tmp.path(), &["config", "show-completed", "true"]));
    assert_eq!(out, "show completed to-dos: true\n");

    let out = stdout(&aisle(tmp.path(), &["todos", "--flat"]));
    assert!(out.contains("[x] t5 Pick rings"));
}

#[test]
fn config_rejects_unknown_sort() {
    let tmp = project();
    let out = aisle(tmp.path(), &["config", "set-sort", "todos", "random"]);
    assert!(!out.status.success());
}

#[test]
fn outside_project_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let out = aisle(tmp.path(), &["todos"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("error:"));
}
