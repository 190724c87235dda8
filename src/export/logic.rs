use crate::db::TimeStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::SessionExport;
use crate::models::SessionFilter;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write the sessions matching `filter` to `file` (absolute path).
    /// Returns the number of sessions written.
    pub fn export<S: TimeStore + ?Sized>(
        store: &S,
        format: ExportFormat,
        file: &str,
        filter: &SessionFilter,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows: Vec<SessionExport> = store
            .list_time_records_filtered(filter)?
            .iter()
            .map(SessionExport::from)
            .collect();

        if rows.is_empty() {
            warning("No sessions found for the selected filter.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
