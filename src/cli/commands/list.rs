use crate::cli::parser::Commands;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::core::recorder::SessionRecorder;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::time_record::format_timestamp;
use crate::models::{SessionEntry, SessionFilter, SessionSummary};
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::{bold, hms, productive_label};
use crate::utils::table::{Column, Table};
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        period,
        project,
        task,
        summary,
    } = cmd
    {
        let pool = DbPool::new(cfg.database_path())?;
        let recorder = SessionRecorder::new(Arc::new(SystemClock::new()));

        let filter = SessionFilter::from_period(period.as_deref())?
            .with_project(*project)
            .with_task(*task);
        let entries = recorder.list_sessions_filtered(&pool, &filter)?;

        if entries.is_empty() {
            info("No sessions found.");
            return Ok(());
        }

        print!("{}", render(&entries));

        if *summary {
            print_summary(&SessionSummary::from_entries(&entries));
        }
    }
    Ok(())
}

fn render(entries: &[SessionEntry]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 5),
        Column::new("START", 19),
        Column::new("END", 19),
        Column::new("DURATION", 9),
        Column::new("PROJECT", 18),
        Column::new("TASK", 18),
        Column::new("PRODUCTIVE", 10),
    ]);

    for e in entries {
        table.add_row(vec![
            e.record.id.to_string(),
            format_timestamp(&e.record.start_time),
            format_timestamp(&e.record.end_time),
            hms(e.record.duration_seconds),
            e.project_name.clone(),
            e.task_name.clone(),
            productive_label(e.record.productive),
        ]);
    }
    table.render()
}

fn print_summary(s: &SessionSummary) {
    println!();
    println!("{}", bold("Summary"));
    println!("{CYAN}• Sessions:{RESET}   {}", s.sessions);
    println!("{CYAN}• Total:{RESET}      {}", hms(s.total_seconds));
    println!(
        "{CYAN}• Productive:{RESET} {GREEN}{}{RESET}",
        hms(s.productive_seconds)
    );
}
