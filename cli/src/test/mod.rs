#![allow(clippy::unwrap_used)]

use predicates::prelude::{
    predicate::str::{contains, is_empty},
    PredicateBooleanExt,
};

mod note_operations;
pub mod test_context;

use test_context::TestDb;

#[test]
fn test_profile_arg() {
    // --profile wins over WOOL_PROFILE
    let db = TestDb::new();

    db.cmd()
        .env("WOOL_PROFILE", "wrong_profile")
        .args(["--profile", "test_profile_arg"])
        .arg("config")
        .assert()
        .success()
        .stdout(
            contains(r#""profile_name": "test_profile_arg""#)
                .and(contains(r#""db_dir""#))
                .and(contains(r#""profile_exists": false"#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_profile_env() {
    let db = TestDb::new();

    db.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(
            contains(format!(r#""profile_name": "{}""#, db.profile_name))
                .and(contains(r#""profile_exists": true"#))
                .and(contains(db.db_dir.to_str().unwrap())),
        )
        .stderr(is_empty());
}

#[test]
fn test_profile_use_and_current() {
    let db = TestDb::new();

    db.cmd()
        .env_remove("WOOL_PROFILE")
        .args(["profile", "use", "work"])
        .assert()
        .success()
        .stdout(contains("Created new profile: work").and(contains("Switched to profile: work")));

    db.cmd()
        .env_remove("WOOL_PROFILE")
        .args(["profile", "current"])
        .assert()
        .success()
        .stdout(contains("Current profile: work"));

    db.cmd()
        .env_remove("WOOL_PROFILE")
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(contains("* work").and(contains("  default")));
}
