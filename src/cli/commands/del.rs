use crate::cli::parser::Commands;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::core::recorder::SessionRecorder;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, success, warning};
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        if !*yes
            && !confirm(format!(
                "Delete session #{id}? This action is irreversible."
            ))?
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut pool = DbPool::new(cfg.database_path())?;
        let recorder = SessionRecorder::new(Arc::new(SystemClock::new()));

        match recorder.delete_session(&mut pool, *id) {
            Ok(()) => success(format!("Session #{id} has been deleted.")),
            Err(e @ AppError::NotFound { .. }) => warning(e),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
