use crate::errors::{AppError, AppResult};
use crate::models::time_record::{format_timestamp, parse_timestamp};
use crate::models::{NewTimeRecord, Project, SessionEntry, SessionFilter, Task, TimeRecord};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use tracing::debug;

const ENTRY_SELECT: &str = "SELECT tr.id, tr.task_id, tr.start_time, tr.end_time,
            tr.duration_seconds, tr.was_productive,
            t.project_id, p.name AS project_name, t.name AS task_name
       FROM time_records tr
       JOIN tasks t ON tr.task_id = t.id
       JOIN projects p ON t.project_id = p.id";

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn timestamp_column(row: &Row, column: &str) -> Result<NaiveDateTime> {
    let raw: String = row.get(column)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.clone())),
        )
    })
}

pub fn map_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub fn map_task(row: &Row) -> Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        name: row.get("name")?,
    })
}

pub fn map_record(row: &Row) -> Result<TimeRecord> {
    Ok(TimeRecord {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        start_time: timestamp_column(row, "start_time")?,
        end_time: timestamp_column(row, "end_time")?,
        duration_seconds: row.get("duration_seconds")?,
        productive: row.get::<_, i64>("was_productive")? != 0,
    })
}

fn map_entry(row: &Row) -> Result<SessionEntry> {
    Ok(SessionEntry {
        record: map_record(row)?,
        project_id: row.get("project_id")?,
        project_name: row.get("project_name")?,
        task_name: row.get("task_name")?,
    })
}

/// Translate constraint failures into catalog errors; anything else stays
/// a storage error.
fn map_constraint(err: rusqlite::Error, scope: &'static str, name: &str, parent: i64) -> AppError {
    if let rusqlite::Error::SqliteFailure(ref e, _) = err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return AppError::DuplicateName {
                scope,
                name: name.to_string(),
            };
        }
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            return AppError::not_found(if scope == "task" { "Project" } else { "Task" }, parent);
        }
    }
    AppError::Db(err)
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub fn insert_project(conn: &Connection, name: &str) -> AppResult<Project> {
    conn.execute("INSERT INTO projects (name) VALUES (?1)", [name])
        .map_err(|e| map_constraint(e, "project", name, 0))?;
    Ok(Project {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn find_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    Ok(conn
        .query_row("SELECT id, name FROM projects WHERE id = ?1", [id], map_project)
        .optional()?)
}

pub fn load_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT id, name FROM projects ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_project)?;
    collect(rows)
}

pub fn rename_project(conn: &Connection, id: i64, name: &str) -> AppResult<bool> {
    let n = conn
        .execute("UPDATE projects SET name = ?1 WHERE id = ?2", params![name, id])
        .map_err(|e| map_constraint(e, "project", name, 0))?;
    Ok(n > 0)
}

/// Delete a project together with its tasks and their records, all in one
/// transaction. Returns false (and changes nothing) if the project is absent.
pub fn delete_project_cascade(conn: &mut Connection, id: i64) -> AppResult<bool> {
    let tx = conn.transaction()?;

    let records = tx.execute(
        "DELETE FROM time_records
          WHERE task_id IN (SELECT id FROM tasks WHERE project_id = ?1)",
        [id],
    )?;
    let tasks = tx.execute("DELETE FROM tasks WHERE project_id = ?1", [id])?;
    let projects = tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;

    if projects == 0 {
        // dropping `tx` rolls back
        return Ok(false);
    }

    tx.commit()?;
    debug!(project = id, tasks, records, "project deleted with cascade");
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub fn insert_task(conn: &Connection, project_id: i64, name: &str) -> AppResult<Task> {
    conn.execute(
        "INSERT INTO tasks (project_id, name) VALUES (?1, ?2)",
        params![project_id, name],
    )
    .map_err(|e| map_constraint(e, "task", name, project_id))?;
    Ok(Task {
        id: conn.last_insert_rowid(),
        project_id,
        name: name.to_string(),
    })
}

pub fn find_task(conn: &Connection, id: i64) -> AppResult<Option<Task>> {
    Ok(conn
        .query_row(
            "SELECT id, project_id, name FROM tasks WHERE id = ?1",
            [id],
            map_task,
        )
        .optional()?)
}

pub fn load_tasks_for_project(conn: &Connection, project_id: i64) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, name FROM tasks
          WHERE project_id = ?1
          ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([project_id], map_task)?;
    collect(rows)
}

pub fn rename_task(conn: &Connection, id: i64, name: &str) -> AppResult<bool> {
    let n = conn
        .execute("UPDATE tasks SET name = ?1 WHERE id = ?2", params![name, id])
        .map_err(|e| map_constraint(e, "task", name, 0))?;
    Ok(n > 0)
}

/// Delete a task and its records in one transaction.
pub fn delete_task_cascade(conn: &mut Connection, id: i64) -> AppResult<bool> {
    let tx = conn.transaction()?;

    let records = tx.execute("DELETE FROM time_records WHERE task_id = ?1", [id])?;
    let tasks = tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;

    if tasks == 0 {
        return Ok(false);
    }

    tx.commit()?;
    debug!(task = id, records, "task deleted with cascade");
    Ok(true)
}

// ---------------------------------------------------------------------------
// Time records
// ---------------------------------------------------------------------------

pub fn insert_time_record(conn: &Connection, rec: &NewTimeRecord) -> AppResult<TimeRecord> {
    conn.execute(
        "INSERT INTO time_records
            (task_id, start_time, end_time, duration_seconds, was_productive)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rec.task_id,
            format_timestamp(&rec.start_time),
            format_timestamp(&rec.end_time),
            rec.duration_seconds,
            rec.productive,
        ],
    )
    .map_err(|e| map_constraint(e, "record", "", rec.task_id))?;

    Ok(TimeRecord {
        id: conn.last_insert_rowid(),
        task_id: rec.task_id,
        start_time: rec.start_time,
        end_time: rec.end_time,
        duration_seconds: rec.duration_seconds,
        productive: rec.productive,
    })
}

pub fn load_records_for_task(conn: &Connection, task_id: i64) -> AppResult<Vec<TimeRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, task_id, start_time, end_time, duration_seconds, was_productive
           FROM time_records
          WHERE task_id = ?1
          ORDER BY start_time DESC, id DESC",
    )?;
    let rows = stmt.query_map([task_id], map_record)?;
    collect(rows)
}

/// Build the log query for `filter`; returns SQL and positional values.
fn build_filtered_query(filter: &SessionFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(p) = filter.project_id {
        conditions.push("t.project_id = ?");
        values.push(Value::Integer(p));
    }
    if let Some(t) = filter.task_id {
        conditions.push("tr.task_id = ?");
        values.push(Value::Integer(t));
    }
    if let Some(lo) = filter.lower_bound() {
        conditions.push("tr.start_time >= ?");
        values.push(Value::Text(format_timestamp(&lo)));
    }
    if let Some(hi) = filter.upper_bound() {
        conditions.push("tr.start_time <= ?");
        values.push(Value::Text(format_timestamp(&hi)));
    }

    let mut sql = ENTRY_SELECT.to_string();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY tr.start_time DESC, tr.id DESC");

    (sql, values)
}

pub fn load_entries(conn: &Connection, filter: &SessionFilter) -> AppResult<Vec<SessionEntry>> {
    let (sql, values) = build_filtered_query(filter);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_entry)?;
    collect(rows)
}

pub fn delete_time_record(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM time_records WHERE id = ?1", [id])? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filtered_query_only_mentions_given_filters() {
        let (sql, values) = build_filtered_query(&SessionFilter::default());
        assert!(!sql.contains("WHERE"));
        assert!(values.is_empty());

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (sql, values) =
            build_filtered_query(&SessionFilter::between(day, day).with_project(Some(4)));
        assert!(sql.contains("t.project_id = ?"));
        assert!(!sql.contains("tr.task_id = ?"));
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], Value::Text("2024-01-01 23:59:59".into()));
    }
}
