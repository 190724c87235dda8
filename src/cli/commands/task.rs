use crate::cli::parser::{Commands, TaskAction};
use crate::config::Config;
use crate::core::catalog::Catalog;
use crate::db::pool::DbPool;
use crate::db::TimeStore;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::formatting::readable;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Task { action } = cmd {
        let mut pool = DbPool::new(cfg.database_path())?;

        match action {
            TaskAction::Add { project, name } => {
                let task = Catalog::add_task(&mut pool, *project, name)?;
                success(format!(
                    "Task #{} '{}' created in project #{}.",
                    task.id, task.name, task.project_id
                ));
            }

            TaskAction::Rename { id, name } => {
                Catalog::rename_task(&mut pool, *id, name)?;
                success(format!("Task #{id} renamed to '{}'.", name.trim()));
            }

            TaskAction::Del { id, yes } => {
                let Some(task) = pool.get_task(*id)? else {
                    warning(format!("Task #{id} not found."));
                    return Ok(());
                };

                let question = format!(
                    "Delete task '{}' with all its sessions? This action is irreversible.",
                    task.name
                );
                if !*yes && !confirm(question)? {
                    info("Operation cancelled.");
                    return Ok(());
                }

                if Catalog::delete_task(&mut pool, *id)? {
                    success(format!("Task #{id} '{}' deleted.", task.name));
                } else {
                    warning(format!("Task #{id} not found."));
                }
            }

            TaskAction::List { project } => {
                let Some(owner) = pool.get_project(*project)? else {
                    warning(format!("Project #{project} not found."));
                    return Ok(());
                };

                let tasks = Catalog::list_tasks_for_project(&pool, owner.id)?;
                if tasks.is_empty() {
                    info(format!("Project '{}' has no tasks.", owner.name));
                    return Ok(());
                }

                println!("📁 {}\n", owner.name);
                let mut table = Table::new(vec![
                    Column::new("ID", 6),
                    Column::new("TASK", 30),
                    Column::new("SESSIONS", 8),
                    Column::new("TRACKED", 10),
                ]);
                for t in tasks {
                    let records = pool.list_time_records_for_task(t.id)?;
                    let total: i64 = records.iter().map(|r| r.duration_seconds).sum();
                    table.add_row(vec![
                        t.id.to_string(),
                        t.name,
                        records.len().to_string(),
                        readable(total),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
