//! SQLite connection wrapper (one connection, one writer).

use crate::db::initialize::init_db;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database file and bring its schema up to date.
    pub fn new<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::from_connection(Connection::open(path.as_ref())?)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AppResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}
