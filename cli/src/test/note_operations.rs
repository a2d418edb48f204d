#![allow(clippy::unwrap_used)]

use predicates::prelude::*;
use wool_core::BodyFormat;

use super::test_context::TestDb;

fn json_stdout(db: &TestDb, args: &[&str]) -> serde_json::Value {
    let output = db.cmd().args(args).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_note_add_simple() {
    let db = TestDb::new();

    db.cmd()
        .args(["note", "add", "my", "first", "note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note added successfully"));

    let notes = db.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].name, "Unnamed");
    assert_eq!(notes[0].folder, "inbox");
    assert_eq!(notes[0].body_format, BodyFormat::Markup);
    assert_eq!(notes[0].body, "\n\n\n\nmy first note\n\n\n\n");
    assert!(notes[0].tags.is_empty());
}

#[test]
fn test_note_add_with_fields() {
    let db = TestDb::new();

    db.cmd()
        .args([
            "note",
            "add",
            "--name",
            "Groceries",
            "--folder",
            "home",
            "--tag",
            "food,errands",
            "--due",
            "2025-01-15",
            "--format",
            "plaintext",
            "milk",
        ])
        .assert()
        .success();

    let notes = db.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].name, "Groceries");
    assert_eq!(notes[0].folder, "home");
    assert_eq!(
        notes[0].tags.iter().cloned().collect::<Vec<_>>(),
        vec!["errands", "food"]
    );
    assert_eq!(notes[0].due_date, "2025-01-15 00:00:00");
    assert_eq!(notes[0].body, "milk");
}

#[test]
fn test_note_add_default_tags() {
    let db = TestDb::with_default_tags(&["journal"]);

    db.cmd()
        .args(["note", "add", "--tag", "work", "entry"])
        .assert()
        .success();

    let tags: Vec<String> = db.notes()[0].tags.iter().cloned().collect();
    assert_eq!(tags, vec!["journal", "work"]);
}

#[test]
fn test_note_add_invalid_due_date() {
    let db = TestDb::new();

    db.cmd()
        .args(["note", "add", "--due", "someday", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid due date"));

    assert!(db.notes().is_empty());
}

#[test]
fn test_note_show_by_prefix() {
    let db = TestDb::new();
    let id = db.add("Groceries", "home", "food", "milk");

    db.cmd()
        .args(["note", "show", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries").and(predicate::str::contains("milk")));

    db.cmd()
        .args(["note", "show", &id.to_lowercase(), "--output", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(format!("TASK-ID {}", id))
                .and(predicate::str::contains("TASK-NAME Groceries")),
        );

    let json = json_stdout(&db, &["note", "show", &id, "--output", "json"]);
    assert_eq!(json["name"], "Groceries");
    assert_eq!(json["tags"][0], "food");
}

#[test]
fn test_note_show_unknown_id() {
    let db = TestDb::new();
    db.add("Groceries", "home", "", "milk");

    db.cmd()
        .args(["note", "show", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note not found: nonexistent"));
}

#[test]
fn test_note_edit() {
    let db = TestDb::new();
    let id = db.add("Groceries", "home", "food", "milk");
    let version = db.notes()[0].lamport_timestamp;

    db.cmd()
        .args([
            "note", "edit", &id, "--name", "Shopping", "--tag", "a,b", "--body", "bread",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note updated"));

    let note = &db.notes()[0];
    assert_eq!(note.name, "Shopping");
    assert_eq!(note.folder, "home");
    assert_eq!(note.tags.iter().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(note.body, "bread");
    assert!(note.lamport_timestamp > version);
}

#[test]
fn test_note_edit_interactive() {
    let db = TestDb::new();
    let id = db.add("Groceries", "home", "", "milk");

    // `true` leaves the template as written
    db.cmd()
        .env("VISUAL", "true")
        .args(["note", "edit", &id, "--folder", "errands", "--interactive"])
        .assert()
        .success();

    let note = &db.notes()[0];
    assert_eq!(note.folder, "errands");
    assert_eq!(note.body, "milk");
}

#[test]
fn test_note_list_order_and_filters() {
    let db = TestDb::new();
    let a = db.add("A", "work", "x", "one");
    let b = db.add("B", "home", "x", "two");
    let c = db.add("C", "work", "", "three");

    let json = json_stdout(&db, &["note", "list", "--output", "json"]);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![c.as_str(), b.as_str(), a.as_str()]);

    let json = json_stdout(
        &db,
        &["note", "list", "--folder", "WORK", "--tag", "x", "--output", "json"],
    );
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], a.as_str());

    let json = json_stdout(&db, &["note", "list", "--limit", "2", "--output", "json"]);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn test_note_search() {
    let db = TestDb::new();
    db.add("Quarterly report", "work", "", "numbers");
    db.add("Holiday plans", "home", "", "beach report");
    db.add("Standup", "work", "", "notes");

    db.cmd()
        .args(["note", "search", "--output", "plain", "report"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Quarterly report")
                .and(predicate::str::contains("Holiday plans"))
                .and(predicate::str::contains("Standup").not()),
        );

    db.cmd()
        .args([
            "note",
            "search",
            "--output",
            "plain",
            "(folder:work)",
            "and",
            "(\"report\")",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Quarterly report")
                .and(predicate::str::contains("Holiday plans").not()),
        );
}

#[test]
fn test_note_delete_moves_to_trash() {
    let db = TestDb::new();
    let a = db.add("A", "work", "", "one");
    let b = db.add("B", "work", "", "two");

    db.cmd()
        .args(["note", "delete", &a])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved 1 note(s) to trash"));

    let notes = db.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, b);
    assert_eq!(db.trash()[0].id, a);

    db.cmd()
        .args(["trash", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(a.as_str()));

    db.cmd()
        .args(["trash", "search", "--output", "plain", "one"])
        .assert()
        .success()
        .stdout(predicate::str::contains(a.as_str()));
}

#[test]
fn test_note_delete_unknown_keeps_everything() {
    let db = TestDb::new();
    let a = db.add("A", "work", "", "one");

    db.cmd()
        .args(["note", "delete", &a, "nonexistent"])
        .assert()
        .failure();

    assert_eq!(db.notes().len(), 1);
    assert!(db.trash().is_empty());
}

#[test]
fn test_tag_move_and_dismiss() {
    let db = TestDb::new();
    let a = db.add("A", "inbox", "", "one");
    let b = db.add("B", "inbox", "old", "two");

    db.cmd().args(["note", "tag-add", "new", &a, &b]).assert().success();
    db.cmd().args(["note", "tag-del", "old", &b]).assert().success();
    db.cmd().args(["note", "move", "archive", &a]).assert().success();
    db.cmd().args(["note", "dismiss", &b]).assert().success();

    let json = json_stdout(&db, &["tags", "--output", "json"]);
    assert_eq!(json, serde_json::json!(["new"]));

    let json = json_stdout(&db, &["folders", "--output", "json"]);
    assert_eq!(json, serde_json::json!(["archive", "inbox"]));

    let notes = db.notes();
    let b_note = notes.iter().find(|n| n.id == b).unwrap();
    assert!(b_note.due_date_reminder_dismissed);
}

#[test]
fn test_contexts() {
    let db = TestDb::new();
    db.add("Call", "inbox", "", "ring bob @phone, mail a@b.com");
    db.add("Buy", "inbox", "", "@shop then @phone");

    let json = json_stdout(&db, &["contexts", "--output", "json"]);
    assert_eq!(json, serde_json::json!(["@phone", "@shop"]));
}

#[test]
fn test_virtual_folders() {
    let db = TestDb::new();
    db.add("Weekly report", "work", "", "status");
    db.add("Lunch", "work", "", "food");

    db.cmd()
        .args(["vfolder", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work reports"));

    db.cmd()
        .args(["vfolder", "show", "Work reports", "--output", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Weekly report").and(predicate::str::contains("Lunch").not()),
        );

    db.cmd()
        .args(["vfolder", "show", "Missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Virtual folder not found: Missing"));
}
