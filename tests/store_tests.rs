use rtasktimer::clock::ManualClock;
use rtasktimer::config::CheckSettings;
use rtasktimer::core::{Catalog, CheckScheduler, Firing, SessionRecorder, Timer, Tracker};
use rtasktimer::db::{DbPool, TimeStore};
use rtasktimer::errors::AppError;
use rtasktimer::models::{Confirmation, SessionFilter, TimerState, TrackerSignal};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{add_record, at, setup_test_db};

#[test]
fn duplicate_project_leaves_one_row() {
    let (_dir, path) = setup_test_db("dup");
    let mut db = DbPool::new(&path).unwrap();

    Catalog::add_project(&mut db, "Work").unwrap();
    assert!(matches!(
        Catalog::add_project(&mut db, "Work"),
        Err(AppError::DuplicateName { .. })
    ));

    let work: Vec<_> = db
        .list_projects()
        .unwrap()
        .into_iter()
        .filter(|p| p.name == "Work")
        .collect();
    assert_eq!(work.len(), 1);
}

#[test]
fn project_cascade_survives_reopen() {
    let (_dir, path) = setup_test_db("cascade");
    let project_id = {
        let mut db = DbPool::new(&path).unwrap();
        let p = Catalog::add_project(&mut db, "Gone").unwrap();
        for name in ["A", "B"] {
            let t = Catalog::add_task(&mut db, p.id, name).unwrap();
            add_record(&mut db, t.id, at(2024, 1, 1, 9, 0, 0), 60, true);
            add_record(&mut db, t.id, at(2024, 1, 1, 10, 0, 0), 60, true);
        }
        assert!(Catalog::delete_project(&mut db, p.id).unwrap());
        p.id
    };

    let db = DbPool::new(&path).unwrap();
    assert!(db.list_projects().unwrap().iter().all(|p| p.id != project_id));
    assert!(db.list_tasks_for_project(project_id).unwrap().is_empty());
    assert!(db.list_all_time_records().unwrap().is_empty());
}

#[test]
fn filtered_query_by_project_and_day() {
    let (_dir, path) = setup_test_db("filter");
    let mut db = DbPool::new(&path).unwrap();
    let p = db.create_project("P").unwrap();
    let other = db.create_project("Other").unwrap();
    let t = db.create_task(p.id, "T").unwrap();
    let u = db.create_task(other.id, "U").unwrap();

    let early = add_record(&mut db, t.id, at(2024, 1, 1, 8, 0, 0), 60, true);
    let late = add_record(&mut db, t.id, at(2024, 1, 1, 23, 59, 59), 1, true);
    add_record(&mut db, t.id, at(2024, 1, 2, 0, 0, 0), 60, true);
    add_record(&mut db, t.id, at(2023, 12, 31, 23, 0, 0), 60, true);
    add_record(&mut db, u.id, at(2024, 1, 1, 12, 0, 0), 60, true);

    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let filter = SessionFilter::between(day, day).with_project(Some(p.id));
    let ids: Vec<i64> = db
        .list_time_records_filtered(&filter)
        .unwrap()
        .into_iter()
        .map(|e| e.record.id)
        .collect();
    assert_eq!(ids, vec![late, early]);
}

#[test]
fn record_round_trip_to_the_second() {
    let (_dir, path) = setup_test_db("roundtrip");
    let t0 = at(2024, 3, 10, 8, 30, 15);
    let created = {
        let mut db = DbPool::new(&path).unwrap();
        let p = db.create_project("P").unwrap();
        let t = db.create_task(p.id, "T").unwrap();
        add_record(&mut db, t.id, t0, 125, false);
        db.list_time_records_for_task(t.id).unwrap().remove(0)
    };

    let db = DbPool::new(&path).unwrap();
    let reloaded = db.list_time_records_for_task(created.task_id).unwrap().remove(0);
    assert_eq!(reloaded, created);
    assert_eq!(reloaded.duration_seconds, 125);
    assert!(!reloaded.productive);
    assert_eq!(reloaded.start_time, t0);
    assert_eq!((reloaded.end_time - reloaded.start_time).num_seconds(), 125);
}

#[test]
fn recorder_rejects_invalid_sessions() {
    let clock = Arc::new(ManualClock::new(at(2024, 1, 1, 9, 0, 0)));
    let recorder = SessionRecorder::new(clock);
    let mut db = DbPool::open_in_memory().unwrap();

    assert!(matches!(
        recorder.record_session(&mut db, None, 120, true),
        Err(AppError::InvalidSession(_))
    ));
    assert!(matches!(
        recorder.record_session(&mut db, Some(5), 0, true),
        Err(AppError::InvalidSession(_))
    ));
    assert!(db.list_all_time_records().unwrap().is_empty());
}

#[test]
fn scheduler_ignores_idle_timer() {
    let clock = Arc::new(ManualClock::new(at(2024, 1, 1, 9, 0, 0)));
    let mut timer = Timer::new(clock.clone());
    let mut scheduler = CheckScheduler::new(Duration::from_secs(60), Duration::ZERO);

    clock.advance_secs(60);
    assert_eq!(scheduler.on_tick(Duration::from_secs(60), &mut timer), Firing::Skipped);
    assert_eq!(timer.state(), TimerState::Idle);
    assert_eq!(scheduler.next_due(), Duration::from_secs(120));
}

#[test]
fn tracked_session_lands_in_the_file() {
    let (_dir, path) = setup_test_db("tracked");
    let clock = Arc::new(ManualClock::new(at(2024, 5, 6, 9, 0, 0)));

    let mut db = DbPool::new(&path).unwrap();
    let p = db.create_project("Work").unwrap();
    let t = db.create_task(p.id, "Coding").unwrap();

    let mut tracker = Tracker::new(db, clock.clone(), CheckSettings::new(300, true, true));
    tracker.select_task(Some(t.id)).unwrap();
    tracker.start();
    clock.advance_secs(300);

    let signals = tracker.tick();
    let request = signals
        .iter()
        .find_map(|s| match s {
            TrackerSignal::ConfirmationRequested(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap();
    tracker.resolve(request.id, Confirmation::Yes).unwrap();
    drop(tracker);

    let db = DbPool::new(&path).unwrap();
    let records = db.list_time_records_for_task(t.id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].start_time, at(2024, 5, 6, 9, 0, 0));
    assert_eq!(records[0].end_time, at(2024, 5, 6, 9, 5, 0));
}
