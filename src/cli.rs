use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Track your tasks by week and calendar month")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: ~/.config/taskdeck/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the week dashboard (default)
    Week {
        /// Any date inside the week to show (default: today)
        #[arg(long)]
        anchor: Option<NaiveDate>,

        /// Narrow the list to a single day
        #[arg(long)]
        day: Option<NaiveDate>,
    },

    /// Show the month calendar with task markers
    Calendar {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Show the task list for this date
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Search tasks by title and notes
    Search {
        /// Search text (case-insensitive substring)
        query: Vec<String>,
    },

    /// Add a task
    Add {
        /// Task title
        title: Vec<String>,

        /// Scheduled date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time of day as HH:MM
        #[arg(long)]
        time: Option<String>,

        /// Priority: high, medium, low
        #[arg(long, default_value = "low")]
        priority: String,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit a task's fields
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Toggle a task's completion
    Toggle { id: String },

    /// Delete a task
    Rm { id: String },

    /// List all tasks (for scripting)
    List {
        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the active config (resolved, with defaults)
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
