use std::process::ExitCode;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{CommandFactory, Parser};
use tracing::info;

mod cli;
mod config;
mod dates;
mod error;
mod model;
mod repo;
mod store;
mod views;

use cli::{Cli, Command};
use config::Config;
use error::{Result, TaskdeckError};
use model::{Task, TaskDraft};
use repo::TaskRepository;
use views::search::SearchOutcome;

const WELCOME_MSG: &str = "Welcome! Add tasks, mark them done, and watch your week stats rise.\n\nStart with:  taskdeck add Pay rent --date 2024-03-05 --priority high";

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting taskdeck");

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(1);
        }
    };

    let command = cli.command.unwrap_or(Command::Week {
        anchor: None,
        day: None,
    });

    match run(command, config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn open_repo(config: &Config) -> Result<TaskRepository> {
    let store = store::from_config(config)?;
    let mut repo = TaskRepository::new(store);
    repo.load().await;
    Ok(repo)
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| TaskdeckError::Validation(format!("Invalid time '{}' (expected HH:MM)", s)))
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| TaskdeckError::Validation(format!("Invalid month '{}' (expected YYYY-MM)", s)))
}

async fn run(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Week { anchor, day } => {
            let repo = open_repo(&config).await?;
            let anchor = anchor.unwrap_or_else(|| Local::now().date_naive());
            let dashboard = views::week::build(repo.tasks(), anchor, day);
            print_week(&dashboard, repo.tasks().is_empty());
        }
        Command::Calendar { month, date } => {
            let repo = open_repo(&config).await?;
            let anchor = match month {
                Some(ref m) => parse_month(m)?,
                None => Local::now().date_naive(),
            };
            let overview = views::calendar::build(repo.tasks(), anchor);
            print_calendar(&overview);
            println!(
                "\n{} tasks in {}",
                views::calendar::month_total(repo.tasks(), anchor),
                anchor.format("%B")
            );

            if let Some(date) = date {
                let detail = views::calendar::tasks_on(repo.tasks(), date);
                println!("\nTasks on {}:", date.format("%b %-d, %Y"));
                if detail.is_empty() {
                    println!("  No tasks for this date.");
                }
                for task in &detail {
                    print_task_line(task);
                }
            }
        }
        Command::Search { query } => {
            let repo = open_repo(&config).await?;
            match views::search::search(repo.tasks(), &query.join(" ")) {
                SearchOutcome::NoQuery => println!("Type to search tasks."),
                SearchOutcome::Matches { pending, completed } => {
                    if pending.is_empty() && completed.is_empty() {
                        println!("No matching tasks found.");
                    }
                    if !pending.is_empty() {
                        println!("Pending:");
                        for task in &pending {
                            print_task_line(task);
                        }
                    }
                    if !completed.is_empty() {
                        println!("Completed:");
                        for task in &completed {
                            print_task_line(task);
                        }
                    }
                }
            }
        }
        Command::Add {
            title,
            date,
            time,
            priority,
            notes,
        } => {
            let mut repo = open_repo(&config).await?;
            let draft = TaskDraft {
                title: title.join(" "),
                notes,
                date,
                time: time.as_deref().map(parse_time).transpose()?,
                priority: priority.parse()?,
            };
            let task = repo.add(draft).await?;
            println!("✓ Created task: {} (ID: {})", task.title, task.id);
        }
        Command::Edit {
            id,
            title,
            date,
            time,
            priority,
            notes,
        } => {
            let mut repo = open_repo(&config).await?;
            let mut task = repo
                .get(&id)
                .cloned()
                .ok_or_else(|| TaskdeckError::NotFound(id.clone()))?;

            if let Some(title) = title {
                task.title = title;
            }
            if let Some(date) = date {
                task.date = date;
            }
            if let Some(ref time) = time {
                task.time = Some(parse_time(time)?);
            }
            if let Some(ref priority) = priority {
                task.priority = priority.parse()?;
            }
            if let Some(notes) = notes {
                task.notes = Some(notes);
            }

            let saved = repo.update(task).await?;
            println!("✓ Updated task: {}", saved.title);
        }
        Command::Toggle { id } => {
            let mut repo = open_repo(&config).await?;
            let task = repo.toggle_completion(&id).await?;
            println!("✓ {}: {}", task.status_label(), task.title);
        }
        Command::Rm { id } => {
            let mut repo = open_repo(&config).await?;
            repo.remove(&id).await?;
            println!("✓ Deleted task {}", id);
        }
        Command::List { format } => {
            let repo = open_repo(&config).await?;

            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(repo.tasks())?;
                    println!("{}", json);
                }
                _ => {
                    if repo.tasks().is_empty() {
                        println!("No tasks found.");
                    } else {
                        for task in repo.tasks() {
                            print_task_line(task);
                        }
                    }
                }
            }
        }
        Command::Config => {
            let config_toml = toml::to_string_pretty(&config)
                .map_err(|e| TaskdeckError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", config_toml);
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn print_task_line(task: &Task) {
    let icon = if task.completed { "✓" } else { "☐" };
    let time_str = task
        .time
        .map(|t| format!(" {}", t.format("%H:%M")))
        .unwrap_or_default();
    println!(
        "{} [{}] {}  {}{} ({})",
        icon,
        task.id,
        task.title,
        task.date,
        time_str,
        task.priority.label()
    );
}

fn print_week(dashboard: &views::week::WeekDashboard, collection_empty: bool) {
    let start = dashboard.days[0];
    let end = dashboard.days[6];
    println!(
        "Week of {} – {}  ({})",
        start,
        end,
        dashboard.anchor.format("%B %Y")
    );
    println!();

    let today = Local::now().date_naive();
    let labels: Vec<String> = dashboard
        .days
        .iter()
        .map(|d| {
            let marker = if *d == today { "*" } else { " " };
            format!("{}{:>2}", marker, d.format("%-d"))
        })
        .collect();
    println!(" Mon Tue Wed Thu Fri Sat Sun");
    println!(" {}", labels.join(" "));
    println!();

    let stats = &dashboard.stats;
    println!("Completed: {}   Pending: {}", stats.completed, stats.pending);
    println!("{}% completed this week", stats.percent);

    let filled = (stats.percent as usize * 20) / 100;
    println!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled));
    println!();

    if collection_empty {
        println!("{}", WELCOME_MSG);
        return;
    }

    if dashboard.tasks.is_empty() {
        println!("No tasks in this range.");
    }
    for task in &dashboard.tasks {
        print_task_line(task);
    }
}

fn print_calendar(overview: &views::calendar::MonthOverview) {
    println!("{}", overview.anchor.format("%B %Y"));
    println!(" Mon  Tue  Wed  Thu  Fri  Sat  Sun");

    for row in overview.cells.chunks(7) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let day = cell.date.format("%-d").to_string();
                let marker = if cell.task_count > 0 { "•" } else { " " };
                if cell.in_month {
                    format!("{:>3}{}", day, marker)
                } else {
                    format!("{:>3} ", "·")
                }
            })
            .collect();
        println!(" {}", line.join(" "));
    }
}
