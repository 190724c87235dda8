use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rTaskTimer
/// Track time on tasks grouped in projects, with periodic productivity checks
#[derive(Parser)]
#[command(
    name = "rtasktimer",
    version = env!("CARGO_PKG_VERSION"),
    about = "A task timer CLI: track time per project/task with periodic productivity checks, stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print diagnostic logs on stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or change the periodic check settings
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "interval",
            value_name = "SECONDS",
            help = "Seconds between productivity checks (60-7200)"
        )]
        interval: Option<i64>,

        #[arg(long = "sound", value_enum, help = "Play a sound with each check")]
        sound: Option<Switch>,

        #[arg(long = "loop", value_enum, help = "Repeat the sound until answered")]
        loop_sound: Option<Switch>,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// List recorded sessions, newest first
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range, or 'all'")]
        period: Option<String>,

        #[arg(long, help = "Only sessions of this project id")]
        project: Option<i64>,

        #[arg(long, help = "Only sessions of this task id")]
        task: Option<i64>,

        #[arg(long = "summary", help = "Print totals after the list")]
        summary: bool,
    },

    /// Delete a recorded session by id
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Track time on a task interactively
    Track {
        #[arg(long, help = "Task id to track")]
        task: i64,
    },

    /// Export recorded sessions
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long)]
        project: Option<i64>,

        #[arg(long)]
        task: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add { name: String },

    /// Rename a project
    Rename { id: i64, name: String },

    /// Delete a project with all its tasks and sessions
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List projects
    List,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task under a project
    Add {
        #[arg(long)]
        project: i64,

        name: String,
    },

    /// Rename a task
    Rename { id: i64, name: String },

    /// Delete a task with all its sessions
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List the tasks of a project
    List {
        #[arg(long)]
        project: i64,
    },
}
