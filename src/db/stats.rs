use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::formatting::hms;
use rusqlite::OptionalExtension;
use std::fs;

/// Snapshot of the database shown by `db --info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbInfo {
    pub file_size: u64,
    pub projects: i64,
    pub tasks: i64,
    pub records: i64,
    pub total_seconds: i64,
    pub first_start: Option<String>,
    pub last_start: Option<String>,
}

pub fn db_info(pool: &DbPool, db_path: &str) -> AppResult<DbInfo> {
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    let count = |table: &str| -> rusqlite::Result<i64> {
        pool.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
    };

    let total_seconds: i64 = pool.conn.query_row(
        "SELECT COALESCE(SUM(duration_seconds), 0) FROM time_records",
        [],
        |row| row.get(0),
    )?;

    let first_start: Option<String> = pool
        .conn
        .query_row("SELECT MIN(start_time) FROM time_records", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_start: Option<String> = pool
        .conn
        .query_row("SELECT MAX(start_time) FROM time_records", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(DbInfo {
        file_size,
        projects: count("projects")?,
        tasks: count("tasks")?,
        records: count("time_records")?,
        total_seconds,
        first_start,
        last_start,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let info = db_info(pool, db_path)?;
    let file_mb = (info.file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Projects / tasks:{} {} / {}",
        CYAN, RESET, info.projects, info.tasks
    );
    println!(
        "{}• Time records:{} {}{}{}",
        CYAN, RESET, GREEN, info.records, RESET
    );
    println!(
        "{}• Tracked time:{} {}",
        CYAN,
        RESET,
        hms(info.total_seconds)
    );

    let dash = || format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", info.first_start.unwrap_or_else(dash));
    println!("    to:   {}", info.last_start.unwrap_or_else(dash));
    println!();
    Ok(())
}

/// Result of `PRAGMA integrity_check`: empty when the file is sound,
/// otherwise one entry per problem SQLite reports.
pub fn integrity_problems(pool: &DbPool) -> AppResult<Vec<String>> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check;")?;
    let lines = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(lines.into_iter().filter(|l| l != "ok").collect())
}

pub fn vacuum(pool: &DbPool) -> AppResult<()> {
    pool.conn.execute_batch("VACUUM;")?;
    Ok(())
}
