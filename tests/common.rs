#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rtasktimer::db::{DbPool, TimeStore};
use rtasktimer::models::NewTimeRecord;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn rtt() -> Command {
    cargo_bin_cmd!("rtasktimer")
}

/// Temp directory plus the path of a (not yet created) database inside it.
/// Keep the `TempDir` alive for the duration of the test.
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path: PathBuf = dir.path().join(format!("{name}_rtasktimer.sqlite"));
    (dir, path.to_string_lossy().to_string())
}

/// Output file path inside `dir`.
pub fn temp_out(dir: &TempDir, name: &str, ext: &str) -> String {
    dir.path()
        .join(format!("{name}_out.{ext}"))
        .to_string_lossy()
        .to_string()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn add_record(db: &mut DbPool, task_id: i64, start: NaiveDateTime, secs: i64, productive: bool) -> i64 {
    db.create_time_record(&NewTimeRecord {
        task_id,
        start_time: start,
        end_time: start + TimeDelta::seconds(secs),
        duration_seconds: secs,
        productive,
    })
    .expect("insert record")
    .id
}

/// Project "Work" with task "Coding" (ids returned) and two sessions on
/// 2024-01-01 and one on 2024-01-02.
pub fn init_db_with_data(db_path: &str) -> (i64, i64) {
    let mut db = DbPool::new(db_path).expect("open db");
    let p = db.create_project("Work").expect("project");
    let t = db.create_task(p.id, "Coding").expect("task");
    add_record(&mut db, t.id, at(2024, 1, 1, 9, 0, 0), 1500, true);
    add_record(&mut db, t.id, at(2024, 1, 1, 14, 0, 0), 600, false);
    add_record(&mut db, t.id, at(2024, 1, 2, 10, 0, 0), 3000, true);
    (p.id, t.id)
}
