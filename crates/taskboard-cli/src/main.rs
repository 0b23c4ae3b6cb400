//! Taskboard CLI
//!
//! Command-line front end for the task, staff and production views.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::timeline::{date_range, timeline};
use taskboard_core::{
    Action, Board, BoardConfig, Dispatched, LoadReport, NewTask, Opened, ProductionPlan,
    RecordStore, Stage, Staff, TaskPatch, TaskStatus,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard - tasks, staff and production estimates over CSV files")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.taskboard/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the collection files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the overview metrics
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage staff
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },

    /// Show the project calendar
    Gantt {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate production time for an order
    Plan {
        /// Number of units to produce
        #[arg(long)]
        orders: Option<u32>,

        /// Stage as NAME=MINUTES, repeatable, in flow order
        #[arg(long = "stage", value_parser = parse_stage)]
        stages: Vec<Stage>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List all tasks
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a task
    Add {
        /// Task name
        #[arg(long)]
        name: String,

        /// Staff name (default: first staff member)
        #[arg(long)]
        assignee: Option<String>,

        /// Start date, YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        /// Duration in days
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },

    /// Edit fields of a task
    Set {
        /// Task id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        assignee: Option<String>,

        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,

        /// pending, in-progress, done, cancelled (or the stored labels)
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: Option<u8>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
}

#[derive(Subcommand)]
enum StaffCommands {
    /// List staff
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a staff member
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        role: String,

        #[arg(long, default_value = "")]
        skills: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BoardConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BoardConfig::load(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let board = Board::new(RecordStore::from_config(&config));

    match cli.command {
        Commands::Dashboard { json } => cmd_dashboard(&board, json),
        Commands::Tasks { command } => match command {
            TaskCommands::List { json } => cmd_tasks_list(&board, json),
            TaskCommands::Add {
                name,
                assignee,
                start,
                days,
            } => cmd_tasks_add(&board, name, assignee, start, days),
            TaskCommands::Set {
                id,
                name,
                assignee,
                start,
                end,
                status,
                percent,
            } => {
                let patch = TaskPatch {
                    name,
                    assignee,
                    start,
                    end,
                    status,
                    percent,
                };
                cmd_tasks_set(&board, id, patch)
            }
            TaskCommands::Rm { id } => apply(&board, Action::RemoveTask(id), "Task removed"),
        },
        Commands::Staff { command } => match command {
            StaffCommands::List { json } => cmd_staff_list(&board, json),
            StaffCommands::Add { name, role, skills } => apply(
                &board,
                Action::AddStaff(Staff::new(name, role, skills)),
                "Staff member added",
            ),
        },
        Commands::Gantt { json } => cmd_gantt(&board, json),
        Commands::Plan {
            orders,
            stages,
            json,
        } => {
            let orders = orders.unwrap_or(config.production.orders);
            let stages = if stages.is_empty() {
                config.production.stages.clone()
            } else {
                stages
            };
            cmd_plan(orders, &stages, json)
        }
    }
}

/// Load both collections and print anything the user should know about.
fn open(board: &Board) -> Result<Opened> {
    let opened = board.open().context("Failed to load collections")?;
    report_load(&opened.tasks_report);
    report_load(&opened.staff_report);
    Ok(opened)
}

fn report_load(report: &LoadReport) {
    if !report.persisted {
        eprintln!(
            "! {} could not be written; working from defaults in memory",
            report.collection
        );
    }
    if report.skipped() > 0 {
        eprintln!(
            "! {} row(s) skipped in {}:",
            report.skipped(),
            report.collection
        );
        for row in &report.skipped {
            eprintln!("    line {}: {}", row.line, row.reason);
        }
    }
}

fn report_dispatch(done: &Dispatched) {
    report_load(&done.report);
    if done.report.skipped() > 0 {
        eprintln!("  skipped rows were kept on disk unchanged");
    }
    match &done.other {
        Ok(report) => report_load(report),
        Err(e) => eprintln!("! Could not load {}: {}", done.changed.other(), e),
    }
}

/// Dispatch an action; a failure is shown, not raised.
fn apply(board: &Board, action: Action, done: &str) -> Result<()> {
    match board.dispatch(action) {
        Ok(dispatched) => {
            report_dispatch(&dispatched);
            println!("✓ {}", done);
        }
        Err(e) => println!("✗ Not saved: {}", e),
    }
    Ok(())
}

fn cmd_dashboard(board: &Board, json: bool) -> Result<()> {
    let opened = open(board)?;
    let summary = opened.snapshot.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("System Overview");
    println!();
    println!("  Tasks:      {}", summary.total_tasks);
    println!("  Completed:  %{}", summary.completion_rate);
    println!("  Staff:      {}", summary.staff_count);
    println!("  Pending:    {}", summary.pending_tasks);
    println!();

    if summary.total_tasks == 0 {
        println!("No tasks yet.");
        return Ok(());
    }

    println!("Workload");
    for load in &summary.workload {
        println!("  {:<24} {}", load.assignee, load.tasks);
    }
    println!();
    println!("Status");
    for count in &summary.statuses {
        println!("  {:<24} {}", count.status.label(), count.tasks);
    }

    let orphans = opened.snapshot.unassigned_tasks();
    if !orphans.is_empty() {
        println!();
        println!("{} task(s) assigned to unknown staff", orphans.len());
    }

    Ok(())
}

fn cmd_tasks_list(board: &Board, json: bool) -> Result<()> {
    let tasks = open(board)?.snapshot.tasks;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks yet. Add one with: taskboard tasks add --name <NAME>");
        return Ok(());
    }

    for task in &tasks {
        println!(
            "{:<10} {:<28} {:<20} {} → {}  {:<13} {:>3}%",
            task.id,
            task.name,
            task.assignee,
            task.start,
            task.end,
            task.status.label(),
            task.percent
        );
    }

    Ok(())
}

fn cmd_tasks_add(
    board: &Board,
    name: String,
    assignee: Option<String>,
    start: Option<NaiveDate>,
    days: u32,
) -> Result<()> {
    let snapshot = open(board)?.snapshot;
    let assignee = assignee.unwrap_or_else(|| snapshot.default_assignee().to_string());

    if !snapshot.staff.iter().any(|s| s.name == assignee) {
        tracing::warn!(assignee = %assignee, "Assignee does not match any staff member");
    }

    let new_task = NewTask {
        name,
        assignee,
        start: start.unwrap_or_else(|| Local::now().date_naive()),
        duration_days: days,
    };

    match board.dispatch(Action::AddTask(new_task)) {
        // Load problems were already shown by `open`
        Ok(dispatched) => {
            if let Some(task) = dispatched.snapshot.tasks.last() {
                println!("✓ Task {} saved ({} → {})", task.id, task.start, task.end);
            }
        }
        Err(e) => println!("✗ Not saved: {}", e),
    }

    Ok(())
}

fn cmd_tasks_set(board: &Board, id: String, patch: TaskPatch) -> Result<()> {
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    apply(board, Action::UpdateTask { id, patch }, "Changes saved")
}

fn cmd_staff_list(board: &Board, json: bool) -> Result<()> {
    let staff = open(board)?.snapshot.staff;

    if json {
        println!("{}", serde_json::to_string_pretty(&staff)?);
        return Ok(());
    }

    for member in &staff {
        println!("{:<24} {:<20} {}", member.name, member.role, member.skills);
    }

    Ok(())
}

fn cmd_gantt(board: &Board, json: bool) -> Result<()> {
    let tasks = open(board)?.snapshot.tasks;
    let bars = timeline(&tasks);

    if json {
        println!("{}", serde_json::to_string_pretty(&bars)?);
        return Ok(());
    }

    let Some((first, last)) = date_range(&tasks) else {
        println!("Add tasks to see the calendar.");
        return Ok(());
    };

    let span = (last - first).num_days();
    println!("Project Calendar ({} → {})", first, last);
    println!();
    for bar in &bars {
        let offset = bar_columns((bar.start - first).num_days(), span);
        let width = bar_columns(bar.days, span).max(1);
        println!(
            "{:<28} {}{} {}",
            bar.name,
            " ".repeat(offset),
            "█".repeat(width),
            bar.status.label()
        );
    }

    Ok(())
}

/// Widest calendar bar, in characters.
const GANTT_COLUMNS: u64 = 60;

/// Characters for `days` on a calendar covering `span` days. Long projects
/// are scaled down to [`GANTT_COLUMNS`].
fn bar_columns(days: i64, span: i64) -> usize {
    let span = span.max(1) as u64;
    let days = (days.max(0) as u64).min(span);
    if span <= GANTT_COLUMNS {
        days as usize
    } else {
        (days * GANTT_COLUMNS / span) as usize
    }
}

fn cmd_plan(orders: u32, stages: &[Stage], json: bool) -> Result<()> {
    let plan = ProductionPlan::estimate(orders, stages);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Production Estimate");
    println!();
    println!("  Orders:     {}", plan.orders);
    println!(
        "  Total:      {} min ({:.1} h)",
        plan.total_minutes as i64,
        plan.total_hours()
    );
    if let Some(bottleneck) = &plan.bottleneck {
        println!("  Bottleneck: {}", bottleneck);
    }
    println!();
    for load in &plan.stage_loads {
        println!("  {:<16} {} min", load.name, load.total_minutes);
    }

    Ok(())
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    taskboard_core::parse_date("date", value).map_err(|e| e.to_string())
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    value.parse::<TaskStatus>().map_err(|e| e.to_string())
}

fn parse_stage(value: &str) -> Result<Stage, String> {
    let (name, minutes) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MINUTES, got {:?}", value))?;
    let minutes: f64 = minutes
        .trim()
        .parse()
        .map_err(|_| format!("invalid minutes in {:?}", value))?;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(format!("minutes must be a non-negative number in {:?}", value));
    }
    Ok(Stage::new(name.trim(), minutes))
}
