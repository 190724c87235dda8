use crate::cli::parser::{Commands, ProjectAction};
use crate::config::Config;
use crate::core::catalog::Catalog;
use crate::db::pool::DbPool;
use crate::db::TimeStore;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Project { action } = cmd {
        let mut pool = DbPool::new(cfg.database_path())?;

        match action {
            ProjectAction::Add { name } => {
                let project = Catalog::add_project(&mut pool, name)?;
                success(format!("Project #{} '{}' created.", project.id, project.name));
            }

            ProjectAction::Rename { id, name } => {
                Catalog::rename_project(&mut pool, *id, name)?;
                success(format!("Project #{id} renamed to '{}'.", name.trim()));
            }

            ProjectAction::Del { id, yes } => {
                let Some(project) = pool.get_project(*id)? else {
                    warning(format!("Project #{id} not found."));
                    return Ok(());
                };

                let question = format!(
                    "Delete project '{}' with all its tasks and sessions? This action is irreversible.",
                    project.name
                );
                if !*yes && !confirm(question)? {
                    info("Operation cancelled.");
                    return Ok(());
                }

                if Catalog::delete_project(&mut pool, *id)? {
                    success(format!("Project #{id} '{}' deleted.", project.name));
                } else {
                    warning(format!("Project #{id} not found."));
                }
            }

            ProjectAction::List => {
                let projects = Catalog::list_projects(&pool)?;
                if projects.is_empty() {
                    info("No projects yet. Create one with `project add <name>`.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 6),
                    Column::new("PROJECT", 30),
                    Column::new("TASKS", 5),
                ]);
                for p in projects {
                    let tasks = Catalog::list_tasks_for_project(&pool, p.id)?.len();
                    table.add_row(vec![p.id.to_string(), p.name, tasks.to_string()]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
