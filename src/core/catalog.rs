use crate::db::TimeStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Project, Task};
use tracing::info;

/// Trim a project/task name; empty names are rejected.
pub fn clean_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidName("name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Projects and tasks: creation, renaming and cascading deletion.
pub struct Catalog;

impl Catalog {
    pub fn add_project<S: TimeStore + ?Sized>(store: &mut S, name: &str) -> AppResult<Project> {
        let name = clean_name(name)?;
        store.create_project(&name)
    }

    pub fn rename_project<S: TimeStore + ?Sized>(
        store: &mut S,
        id: i64,
        new_name: &str,
    ) -> AppResult<()> {
        let name = clean_name(new_name)?;
        if !store.update_project(id, &name)? {
            return Err(AppError::not_found("Project", id));
        }
        Ok(())
    }

    /// Removes the project, its tasks and their records, or nothing at all.
    pub fn delete_project<S: TimeStore + ?Sized>(store: &mut S, id: i64) -> AppResult<bool> {
        let deleted = store.delete_project(id)?;
        if deleted {
            info!(project = id, "project deleted");
        }
        Ok(deleted)
    }

    pub fn add_task<S: TimeStore + ?Sized>(
        store: &mut S,
        project_id: i64,
        name: &str,
    ) -> AppResult<Task> {
        let name = clean_name(name)?;
        if store.get_project(project_id)?.is_none() {
            return Err(AppError::not_found("Project", project_id));
        }
        store.create_task(project_id, &name)
    }

    pub fn rename_task<S: TimeStore + ?Sized>(
        store: &mut S,
        id: i64,
        new_name: &str,
    ) -> AppResult<()> {
        let name = clean_name(new_name)?;
        if !store.update_task(id, &name)? {
            return Err(AppError::not_found("Task", id));
        }
        Ok(())
    }

    pub fn delete_task<S: TimeStore + ?Sized>(store: &mut S, id: i64) -> AppResult<bool> {
        let deleted = store.delete_task(id)?;
        if deleted {
            info!(task = id, "task deleted");
        }
        Ok(deleted)
    }

    pub fn list_projects<S: TimeStore + ?Sized>(store: &S) -> AppResult<Vec<Project>> {
        store.list_projects()
    }

    pub fn list_tasks_for_project<S: TimeStore + ?Sized>(
        store: &S,
        project_id: i64,
    ) -> AppResult<Vec<Task>> {
        store.list_tasks_for_project(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use crate::models::NewTimeRecord;
    use chrono::{NaiveDate, TimeDelta};

    fn add_record(db: &mut DbPool, task_id: i64) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        db.create_time_record(&NewTimeRecord {
            task_id,
            start_time: start,
            end_time: start + TimeDelta::seconds(60),
            duration_seconds: 60,
            productive: true,
        })
        .unwrap();
    }

    #[test]
    fn duplicate_project_is_rejected() {
        let mut db = DbPool::open_in_memory().unwrap();
        Catalog::add_project(&mut db, "Work").unwrap();
        let err = Catalog::add_project(&mut db, "  Work ").unwrap_err();
        assert!(matches!(err, AppError::DuplicateName { .. }));

        let names: Vec<_> = Catalog::list_projects(&db)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Work"]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut db = DbPool::open_in_memory().unwrap();
        assert!(matches!(
            Catalog::add_project(&mut db, "   "),
            Err(AppError::InvalidName(_))
        ));
        let p = Catalog::add_project(&mut db, "P").unwrap();
        assert!(matches!(
            Catalog::add_task(&mut db, p.id, ""),
            Err(AppError::InvalidName(_))
        ));
    }

    #[test]
    fn rename_missing_is_not_found() {
        let mut db = DbPool::open_in_memory().unwrap();
        assert!(matches!(
            Catalog::rename_project(&mut db, 5, "X"),
            Err(AppError::NotFound { entity: "Project", id: 5 })
        ));
        assert!(matches!(
            Catalog::rename_task(&mut db, 5, "X"),
            Err(AppError::NotFound { entity: "Task", id: 5 })
        ));
    }

    #[test]
    fn rename_onto_existing_name_is_duplicate() {
        let mut db = DbPool::open_in_memory().unwrap();
        Catalog::add_project(&mut db, "A").unwrap();
        let b = Catalog::add_project(&mut db, "B").unwrap();
        assert!(matches!(
            Catalog::rename_project(&mut db, b.id, "A"),
            Err(AppError::DuplicateName { .. })
        ));
        Catalog::rename_project(&mut db, b.id, "C").unwrap();
        assert_eq!(db.get_project(b.id).unwrap().unwrap().name, "C");
    }

    #[test]
    fn add_task_requires_project() {
        let mut db = DbPool::open_in_memory().unwrap();
        assert!(matches!(
            Catalog::add_task(&mut db, 77, "Orphan"),
            Err(AppError::NotFound { entity: "Project", id: 77 })
        ));
    }

    #[test]
    fn project_delete_cascades() {
        let mut db = DbPool::open_in_memory().unwrap();
        let keep = Catalog::add_project(&mut db, "Keep").unwrap();
        let kept_task = Catalog::add_task(&mut db, keep.id, "Stay").unwrap();
        add_record(&mut db, kept_task.id);

        let p = Catalog::add_project(&mut db, "Gone").unwrap();
        for name in ["One", "Two"] {
            let t = Catalog::add_task(&mut db, p.id, name).unwrap();
            add_record(&mut db, t.id);
            add_record(&mut db, t.id);
        }

        assert!(Catalog::delete_project(&mut db, p.id).unwrap());
        assert!(Catalog::list_tasks_for_project(&db, p.id).unwrap().is_empty());
        assert!(Catalog::list_projects(&db).unwrap().iter().all(|x| x.id != p.id));

        let left = db.list_all_time_records().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].project_id, keep.id);

        assert!(!Catalog::delete_project(&mut db, p.id).unwrap());
    }

    #[test]
    fn task_delete_only_touches_its_records() {
        let mut db = DbPool::open_in_memory().unwrap();
        let p = Catalog::add_project(&mut db, "P").unwrap();
        let a = Catalog::add_task(&mut db, p.id, "A").unwrap();
        let b = Catalog::add_task(&mut db, p.id, "B").unwrap();
        add_record(&mut db, a.id);
        add_record(&mut db, b.id);

        assert!(Catalog::delete_task(&mut db, a.id).unwrap());
        assert!(db.list_time_records_for_task(a.id).unwrap().is_empty());
        assert_eq!(db.list_time_records_for_task(b.id).unwrap().len(), 1);
        assert_eq!(Catalog::list_tasks_for_project(&db, p.id).unwrap(), vec![b]);
    }
}
