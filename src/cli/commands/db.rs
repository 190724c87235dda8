use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        info("Nothing to do: use --migrate, --info, --check or --vacuum.");
        return Ok(());
    }

    let db_path = cfg.database_path();
    // opening already applies pending migrations; --migrate re-runs them explicitly
    let pool = DbPool::new(&db_path)?;

    if *migrate {
        info("Running migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Migration completed.");
    }

    if *show_info {
        stats::print_db_info(&pool, &db_path.to_string_lossy())?;
    }

    if *check {
        info("Running integrity check…");
        let problems = stats::integrity_problems(&pool)?;
        if problems.is_empty() {
            success("Integrity check passed.");
        } else {
            for p in &problems {
                error(format!("Integrity check failed: {p}"));
            }
        }
    }

    if *vacuum {
        info("Running VACUUM…");
        stats::vacuum(&pool)?;
        success("Vacuum completed.");
    }

    Ok(())
}
