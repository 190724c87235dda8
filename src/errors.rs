//! Unified application error type.
//! Every layer (db, core, config, cli) returns AppError so that domain
//! rejections and storage failures travel through the same `?` chain.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Catalog / session rejections
    // ---------------------------
    #[error("A {scope} named '{name}' already exists")]
    DuplicateName { scope: &'static str, name: String },

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid period: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures of the storage engine or the filesystem, as opposed
    /// to rejections of the request itself.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AppError::Io(_) | AppError::Db(_) | AppError::Migration(_) | AppError::Other(_)
        )
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_told_apart_from_rejections() {
        assert!(AppError::Io(io::Error::other("disk full")).is_storage());
        assert!(!AppError::InvalidSession("no task".into()).is_storage());
        assert!(
            !AppError::DuplicateName {
                scope: "project",
                name: "Work".into()
            }
            .is_storage()
        );
    }

    #[test]
    fn messages_name_the_offending_item() {
        let e = AppError::not_found("Task", 7);
        assert_eq!(e.to_string(), "Task #7 not found");

        let e = AppError::DuplicateName {
            scope: "project",
            name: "Work".into(),
        };
        assert_eq!(e.to_string(), "A project named 'Work' already exists");
    }
}
