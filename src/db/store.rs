//! Data-access contract consumed by the catalog and the session recorder.

use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::time_record::format_timestamp;
use crate::models::{NewTimeRecord, Project, SessionEntry, SessionFilter, Task, TimeRecord};

/// Storage for projects, tasks and time records.
///
/// Mutations take `&mut self`: whoever owns the store is the single writer.
/// `delete_project` and `delete_task` remove their dependents atomically.
pub trait TimeStore {
    fn create_project(&mut self, name: &str) -> AppResult<Project>;
    fn get_project(&self, id: i64) -> AppResult<Option<Project>>;
    fn list_projects(&self) -> AppResult<Vec<Project>>;
    fn update_project(&mut self, id: i64, name: &str) -> AppResult<bool>;
    fn delete_project(&mut self, id: i64) -> AppResult<bool>;

    fn create_task(&mut self, project_id: i64, name: &str) -> AppResult<Task>;
    fn get_task(&self, id: i64) -> AppResult<Option<Task>>;
    fn list_tasks_for_project(&self, project_id: i64) -> AppResult<Vec<Task>>;
    fn update_task(&mut self, id: i64, name: &str) -> AppResult<bool>;
    fn delete_task(&mut self, id: i64) -> AppResult<bool>;

    fn create_time_record(&mut self, record: &NewTimeRecord) -> AppResult<TimeRecord>;
    /// Newest first.
    fn list_time_records_for_task(&self, task_id: i64) -> AppResult<Vec<TimeRecord>>;
    /// Newest first, joined with project and task names.
    fn list_all_time_records(&self) -> AppResult<Vec<SessionEntry>> {
        self.list_time_records_filtered(&SessionFilter::default())
    }
    /// Newest first, joined with project and task names.
    fn list_time_records_filtered(&self, filter: &SessionFilter) -> AppResult<Vec<SessionEntry>>;
    fn delete_time_record(&mut self, id: i64) -> AppResult<bool>;
}

impl TimeStore for DbPool {
    fn create_project(&mut self, name: &str) -> AppResult<Project> {
        let project = queries::insert_project(&self.conn, name)?;
        audit(
            &self.conn,
            "project_add",
            &format!("project #{}", project.id),
            &format!("Created project '{name}'"),
        );
        Ok(project)
    }

    fn get_project(&self, id: i64) -> AppResult<Option<Project>> {
        queries::find_project(&self.conn, id)
    }

    fn list_projects(&self) -> AppResult<Vec<Project>> {
        queries::load_projects(&self.conn)
    }

    fn update_project(&mut self, id: i64, name: &str) -> AppResult<bool> {
        let updated = queries::rename_project(&self.conn, id, name)?;
        if updated {
            audit(
                &self.conn,
                "project_edit",
                &format!("project #{id}"),
                &format!("Renamed project to '{name}'"),
            );
        }
        Ok(updated)
    }

    fn delete_project(&mut self, id: i64) -> AppResult<bool> {
        let deleted = queries::delete_project_cascade(&mut self.conn, id)?;
        if deleted {
            audit(
                &self.conn,
                "project_del",
                &format!("project #{id}"),
                "Deleted project with its tasks and time records",
            );
        }
        Ok(deleted)
    }

    fn create_task(&mut self, project_id: i64, name: &str) -> AppResult<Task> {
        let task = queries::insert_task(&self.conn, project_id, name)?;
        audit(
            &self.conn,
            "task_add",
            &format!("task #{}", task.id),
            &format!("Created task '{name}' in project #{project_id}"),
        );
        Ok(task)
    }

    fn get_task(&self, id: i64) -> AppResult<Option<Task>> {
        queries::find_task(&self.conn, id)
    }

    fn list_tasks_for_project(&self, project_id: i64) -> AppResult<Vec<Task>> {
        queries::load_tasks_for_project(&self.conn, project_id)
    }

    fn update_task(&mut self, id: i64, name: &str) -> AppResult<bool> {
        let updated = queries::rename_task(&self.conn, id, name)?;
        if updated {
            audit(
                &self.conn,
                "task_edit",
                &format!("task #{id}"),
                &format!("Renamed task to '{name}'"),
            );
        }
        Ok(updated)
    }

    fn delete_task(&mut self, id: i64) -> AppResult<bool> {
        let deleted = queries::delete_task_cascade(&mut self.conn, id)?;
        if deleted {
            audit(
                &self.conn,
                "task_del",
                &format!("task #{id}"),
                "Deleted task with its time records",
            );
        }
        Ok(deleted)
    }

    fn create_time_record(&mut self, record: &NewTimeRecord) -> AppResult<TimeRecord> {
        let created = queries::insert_time_record(&self.conn, record)?;
        audit(
            &self.conn,
            "record_add",
            &format!("record #{}", created.id),
            &format!(
                "{}s on task #{} ending {}",
                created.duration_seconds,
                created.task_id,
                format_timestamp(&created.end_time)
            ),
        );
        Ok(created)
    }

    fn list_time_records_for_task(&self, task_id: i64) -> AppResult<Vec<TimeRecord>> {
        queries::load_records_for_task(&self.conn, task_id)
    }

    fn list_time_records_filtered(&self, filter: &SessionFilter) -> AppResult<Vec<SessionEntry>> {
        queries::load_entries(&self.conn, filter)
    }

    fn delete_time_record(&mut self, id: i64) -> AppResult<bool> {
        let deleted = queries::delete_time_record(&self.conn, id)?;
        if deleted {
            audit(
                &self.conn,
                "record_del",
                &format!("record #{id}"),
                "Deleted time record",
            );
        }
        Ok(deleted)
    }
}
