use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_data, rtt, setup_test_db, temp_out};

#[test]
fn test_init_creates_database() {
    let (_dir, db_path) = setup_test_db("init");

    rtt()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_project_add_and_duplicate() {
    let (_dir, db_path) = setup_test_db("project_dup");

    rtt()
        .args(["--db", &db_path, "--test", "project", "add", "Work"])
        .assert()
        .success()
        .stdout(contains("Project #1 'Work' created."));

    rtt()
        .args(["--db", &db_path, "--test", "project", "add", "Work"])
        .assert()
        .failure()
        .stderr(contains("A project named 'Work' already exists"));

    rtt()
        .args(["--db", &db_path, "--test", "project", "list"])
        .assert()
        .success()
        .stdout(contains("Work"));
}

#[test]
fn test_task_needs_existing_project() {
    let (_dir, db_path) = setup_test_db("task_orphan");

    rtt()
        .args(["--db", &db_path, "--test", "task", "add", "--project", "9", "Ghost"])
        .assert()
        .failure()
        .stderr(contains("Project #9 not found"));
}

#[test]
fn test_task_add_and_list() {
    let (_dir, db_path) = setup_test_db("task_list");

    rtt()
        .args(["--db", &db_path, "--test", "project", "add", "Work"])
        .assert()
        .success();
    rtt()
        .args(["--db", &db_path, "--test", "task", "add", "--project", "1", "Coding"])
        .assert()
        .success()
        .stdout(contains("Task #1 'Coding' created in project #1."));

    rtt()
        .args(["--db", &db_path, "--test", "task", "list", "--project", "1"])
        .assert()
        .success()
        .stdout(contains("Coding"));
}

#[test]
fn test_list_day_newest_first() {
    let (_dir, db_path) = setup_test_db("list_day");
    init_db_with_data(&db_path);

    let output = rtt()
        .args([
            "--db",
            &db_path,
            "--test",
            "list",
            "--period",
            "2024-01-01",
            "--project",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let afternoon = stdout.find("2024-01-01 14:00:00").unwrap();
    let morning = stdout.find("2024-01-01 09:00:00").unwrap();
    assert!(afternoon < morning);
    assert!(!stdout.contains("2024-01-02 10:00:00"));
}

#[test]
fn test_list_summary() {
    let (_dir, db_path) = setup_test_db("list_summary");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "list", "--summary"])
        .assert()
        .success()
        .stdout(contains("Summary"))
        .stdout(contains("01:25:00"))
        .stdout(contains("01:15:00"));
}

#[test]
fn test_list_rejects_bad_period() {
    let (_dir, db_path) = setup_test_db("list_bad");

    rtt()
        .args(["--db", &db_path, "--test", "list", "--period", "2024-13"])
        .assert()
        .failure()
        .stderr(contains("Invalid period"));
}

#[test]
fn test_del_session() {
    let (_dir, db_path) = setup_test_db("del");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Session #1 has been deleted."));

    rtt()
        .args(["--db", &db_path, "--test", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("not found"));

    rtt()
        .args(["--db", &db_path, "--test", "list"])
        .assert()
        .success()
        .stdout(contains("2024-01-01 09:00:00").not());
}

#[test]
fn test_del_cancelled_without_answer() {
    let (_dir, db_path) = setup_test_db("del_cancel");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));
}

#[test]
fn test_project_delete_cascades() {
    let (_dir, db_path) = setup_test_db("cascade");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "project", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    rtt()
        .args(["--db", &db_path, "--test", "list"])
        .assert()
        .success()
        .stdout(contains("No sessions found."));
}

#[test]
fn test_export_csv_and_json() {
    let (dir, db_path) = setup_test_db("export");
    init_db_with_data(&db_path);

    let csv_path = temp_out(&dir, "sessions", "csv");
    rtt()
        .args([
            "--db", &db_path, "--test", "export", "--format", "csv", "--file", &csv_path,
            "--range", "2024-01",
        ])
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("id,project,task,start_time"));
    assert_eq!(csv.lines().count(), 4);

    let json_path = temp_out(&dir, "sessions", "json");
    rtt()
        .args([
            "--db", &db_path, "--test", "export", "--format", "json", "--file", &json_path,
            "--task", "1",
        ])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[test]
fn test_export_requires_absolute_path() {
    let (_dir, db_path) = setup_test_db("export_rel");

    rtt()
        .args(["--db", &db_path, "--test", "export", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_config_interval_is_clamped() {
    let (_dir, db_path) = setup_test_db("config");

    rtt()
        .args(["--db", &db_path, "--test", "config", "--interval", "10", "--print"])
        .assert()
        .success()
        .stdout(contains("using 60s"))
        .stdout(contains("check_interval_seconds: 60"))
        .stdout(contains("not saved"));
}

#[test]
fn test_db_info_and_log() {
    let (_dir, db_path) = setup_test_db("db_info");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Time records:"))
        .stdout(contains("Integrity check passed"));

    rtt()
        .args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("project_add").and(contains("record_add")));
}

#[test]
fn test_track_unknown_task() {
    let (_dir, db_path) = setup_test_db("track_unknown");

    rtt()
        .args(["--db", &db_path, "--test", "track", "--task", "99"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(contains("Task #99 not found"));
}

#[test]
fn test_track_quits_on_closed_input() {
    let (_dir, db_path) = setup_test_db("track_eof");
    init_db_with_data(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "track", "--task", "1"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(contains("Work / Coding"));
}
