use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create projects, tasks and time_records. Databases written by earlier
/// releases already have the same tables, so this is a no-op for them.
fn create_catalog_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id  INTEGER NOT NULL,
            name        TEXT NOT NULL,
            FOREIGN KEY (project_id) REFERENCES projects(id),
            UNIQUE(project_id, name)
        );

        CREATE TABLE IF NOT EXISTS time_records (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id           INTEGER NOT NULL,
            start_time        TEXT NOT NULL,
            end_time          TEXT NOT NULL,
            duration_seconds  INTEGER NOT NULL CHECK(duration_seconds >= 0),
            was_productive    INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (task_id) REFERENCES tasks(id)
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    info!(version, "migration applied: {message}");
    Ok(())
}

/// Indexes backing the per-task listing and the newest-first ordering.
fn migrate_add_record_indexes(conn: &Connection) -> Result<()> {
    let version = "20250301_0001_time_records_indexes";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_records_task ON time_records(task_id);
        CREATE INDEX IF NOT EXISTS idx_time_records_start ON time_records(start_time);
        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        "#,
    )?;

    mark_applied(conn, version, "Added indexes on time_records and tasks")
}

/// Older databases may hold timestamps with a `T` separator or a fractional
/// part; rewrite them as `YYYY-MM-DD HH:MM:SS` so text ordering is
/// chronological.
fn migrate_normalize_record_timestamps(conn: &Connection) -> Result<()> {
    let version = "20250301_0002_normalize_record_timestamps";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    let changed = conn.execute(
        "UPDATE time_records
            SET start_time = replace(substr(start_time, 1, 19), 'T', ' '),
                end_time   = replace(substr(end_time, 1, 19), 'T', ' ')
          WHERE length(start_time) <> 19 OR length(end_time) <> 19
             OR instr(start_time, 'T') > 0 OR instr(end_time, 'T') > 0",
        [],
    )?;

    mark_applied(
        conn,
        version,
        &format!("Normalized timestamps of {changed} time records"),
    )
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "projects")?;
    create_catalog_tables(conn)?;
    if fresh {
        info!("created catalog tables");
    }

    migrate_add_record_indexes(conn)?;
    migrate_normalize_record_timestamps(conn)?;

    Ok(())
}
