use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::SessionFilter;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        project,
        task,
        force,
    } = cmd
    {
        let pool = DbPool::new(cfg.database_path())?;
        let filter = SessionFilter::from_period(range.as_deref())?
            .with_project(*project)
            .with_task(*task);
        ExportLogic::export(&pool, *format, file, &filter, *force)?;
    }
    Ok(())
}
