mod domain;
mod notifications;
mod persistence;
mod report;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use domain::{field_is_empty, now_ts, EditableField, FieldEdit, SortOption, Task};
use report::{export_all, export_task, format_clock};
use std::collections::HashMap;
use store::{StoreEvent, TaskStore};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A personal task tracker with per-task time tracking and countdown timers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tally directory in the current directory
    Init,
    /// Add a new task
    Add {
        /// Task title
        title: Vec<String>,
    },
    /// List tasks
    List {
        /// Only show tasks matching this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Sort order: newest, oldest, played, due (needs --advanced)
        #[arg(short, long)]
        sort: Option<String>,
        /// Enable advanced mode so the sort option takes effect
        #[arg(short, long)]
        advanced: bool,
    },
    /// Toggle a task's completion
    Done {
        /// Task position as shown by `list`
        pos: usize,
    },
    /// Delete a task
    Rm {
        pos: usize,
    },
    /// Start the timer for a task (stops any other running timer)
    Start {
        pos: usize,
    },
    /// Stop the currently running timer
    Stop,
    /// Toggle the timer for a task
    Toggle {
        pos: usize,
    },
    /// Move a task to a new position
    Move {
        from: usize,
        to: usize,
    },
    /// Set or clear a countdown timer on a task
    Countdown {
        #[command(subcommand)]
        action: CountdownAction,
    },
    /// Manage subtasks
    Sub {
        #[command(subcommand)]
        action: SubAction,
    },
    /// Assign one field across all incomplete tasks (mass edit)
    Assign {
        /// Field: title, description, notes, from, adhoc, estimate, due
        field: String,
        /// New value. Estimates are H:MM; due dates are epoch seconds or "none";
        /// adhoc is true/false
        value: String,
        /// Only touch tasks where the field is currently empty
        #[arg(long)]
        fill: bool,
    },
    /// Export one task (or all tasks) as formatted text
    Export {
        /// Task position; exports everything when omitted
        pos: Option<usize>,
    },
}

#[derive(Subcommand)]
enum CountdownAction {
    /// Configure a countdown of the given number of minutes
    Set { pos: usize, minutes: u32 },
    /// Remove the countdown
    Clear { pos: usize },
}

#[derive(Subcommand)]
enum SubAction {
    /// Add a subtask to a task
    Add { pos: usize, title: Vec<String> },
    /// Toggle a subtask's completion (1-based subtask number)
    Done { pos: usize, number: usize },
    /// Delete a subtask (1-based subtask number)
    Rm { pos: usize, number: usize },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        let tally_dir = persistence::init_local_tally()?;
        println!("Initialized tally directory: {}", tally_dir.display());
        println!();
        println!("Tally will now use this local directory for task storage.");
        return Ok(());
    }

    let path = persistence::tasks_file()?;
    let mut store = TaskStore::open(path);

    // Forward change events to desktop notifications: completions, plus
    // timers stopped as a side effect of starting a different task
    let titles: HashMap<Uuid, String> = store
        .tasks()
        .iter()
        .map(|t| (t.id, t.title.clone()))
        .collect();
    let timer_target = match &cli.command {
        Commands::Start { pos } | Commands::Toggle { pos } => {
            store.tasks().get(*pos).map(|t| t.id)
        }
        _ => None,
    };
    store.subscribe(move |event| match event {
        StoreEvent::TaskCompleted(id) => {
            if let Some(title) = titles.get(id) {
                notifications::notify_task_done(title);
            }
        }
        StoreEvent::TimerStopped(id) if timer_target.is_some() && Some(*id) != timer_target => {
            if let Some(title) = titles.get(id) {
                notifications::notify_timer_stopped(title);
            }
        }
        _ => {}
    });

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Add { title } => {
            let title = title.join(" ");
            match store.add_task(&title) {
                Some(_) => println!("Added: {}", title.trim()),
                None => println!("Nothing added: title is empty"),
            }
        }
        Commands::List {
            filter,
            sort,
            advanced,
        } => {
            let option = match sort.as_deref() {
                Some(name) => SortOption::from_name(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown sort option: {}", name))?,
                None => SortOption::default(),
            };
            if store.is_empty() {
                println!("No tasks yet");
                return Ok(());
            }
            let query = filter.unwrap_or_default();
            let filtered: Vec<Task> = store.filter(&query).into_iter().cloned().collect();
            let sorted = domain::sort_tasks(filtered.iter().collect(), option, advanced);
            if advanced {
                println!("Sorted by: {}", option.name());
            }
            print_list(&sorted);
        }
        Commands::Done { pos } => {
            let id = task_id_at(&store, pos)?;
            store.toggle_completed(id);
            if let Some(task) = store.task(id) {
                let state = if task.is_completed { "completed" } else { "reopened" };
                println!("{}: {}", state, task.title);
            }
        }
        Commands::Rm { pos } => {
            let id = task_id_at(&store, pos)?;
            let title = store.tasks()[pos].title.clone();
            store.delete_task(id);
            println!("Deleted: {}", title);
        }
        Commands::Start { pos } => {
            let id = task_id_at(&store, pos)?;
            store.start_timer(id);
            match store.task(id) {
                Some(task) if task.is_running() => println!("Started: {}", task.title),
                Some(task) => println!("Not started (completed): {}", task.title),
                None => {}
            }
        }
        Commands::Stop => match store.running_task().map(|t| t.id) {
            Some(id) => {
                store.stop_timer(id);
                if let Some(task) = store.task(id) {
                    println!(
                        "Stopped: {} (total {})",
                        task.title,
                        format_clock(task.total_time_spent)
                    );
                }
            }
            None => println!("No timer running"),
        },
        Commands::Toggle { pos } => {
            let id = task_id_at(&store, pos)?;
            store.toggle_timer(id);
            if let Some(task) = store.task(id) {
                let state = if task.is_running() { "running" } else { "stopped" };
                println!("{}: {}", state, task.title);
            }
        }
        Commands::Move { from, to } => {
            if from >= store.tasks().len() || to >= store.tasks().len() {
                anyhow::bail!("Position out of range");
            }
            store.move_task(from, to);
        }
        Commands::Countdown { action } => match action {
            CountdownAction::Set { pos, minutes } => {
                let id = task_id_at(&store, pos)?;
                store.set_countdown(id, f64::from(minutes) * 60.0);
                println!("Countdown set: {} minutes", minutes);
            }
            CountdownAction::Clear { pos } => {
                let id = task_id_at(&store, pos)?;
                store.clear_countdown(id);
                println!("Countdown cleared");
            }
        },
        Commands::Sub { action } => match action {
            SubAction::Add { pos, title } => {
                let id = task_id_at(&store, pos)?;
                let title = title.join(" ");
                match store.add_subtask(id, &title) {
                    Some(_) => println!("Added subtask: {}", title.trim()),
                    None => println!("Nothing added: title is empty"),
                }
            }
            SubAction::Done { pos, number } => {
                let (task_id, subtask_id) = subtask_id_at(&store, pos, number)?;
                store.toggle_subtask(task_id, subtask_id);
            }
            SubAction::Rm { pos, number } => {
                let (task_id, subtask_id) = subtask_id_at(&store, pos, number)?;
                store.delete_subtask(task_id, subtask_id);
            }
        },
        Commands::Assign { field, value, fill } => {
            let field = parse_field(&field)?;
            let edit = parse_edit(field, &value)?;
            let targets: Vec<(Uuid, FieldEdit)> = store
                .tasks()
                .iter()
                .filter(|t| !t.is_completed)
                .filter(|t| !fill || field_is_empty(t, field))
                .map(|t| (t.id, edit.clone()))
                .collect();
            let count = targets.len();
            store.batch_assign(&targets);
            println!("Updated {} task(s)", count);
        }
        Commands::Export { pos } => {
            let now = now_ts();
            match pos {
                Some(pos) => {
                    task_id_at(&store, pos)?;
                    print!("{}", export_task(&store.tasks()[pos], now));
                }
                None => print!("{}", export_all(store.tasks(), now)),
            }
        }
    }

    Ok(())
}

/// Map a CLI field name to an editable field
fn parse_field(name: &str) -> Result<EditableField> {
    match name.to_lowercase().as_str() {
        "title" => Ok(EditableField::Title),
        "description" | "desc" => Ok(EditableField::Description),
        "notes" => Ok(EditableField::Notes),
        "from" | "fromwho" => Ok(EditableField::FromWho),
        "adhoc" => Ok(EditableField::Adhoc),
        "estimate" => Ok(EditableField::Estimate),
        "due" => Ok(EditableField::DueDate),
        _ => anyhow::bail!("Unknown field: {}", name),
    }
}

/// Build the edit value for a field from its CLI string form
fn parse_edit(field: EditableField, value: &str) -> Result<FieldEdit> {
    Ok(match field {
        EditableField::Title => FieldEdit::Title(value.to_string()),
        EditableField::Description => FieldEdit::Description(value.to_string()),
        EditableField::Notes => FieldEdit::Notes(value.to_string()),
        EditableField::FromWho => FieldEdit::FromWho(value.to_string()),
        EditableField::Adhoc => {
            let flag = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Expected true or false, got {}", value))?;
            FieldEdit::Adhoc(flag)
        }
        EditableField::Estimate => {
            let (hours, minutes) = match value.split_once(':') {
                Some((h, m)) => (h.parse()?, m.parse()?),
                None => (value.parse()?, 0),
            };
            FieldEdit::Estimate { hours, minutes }
        }
        EditableField::DueDate => {
            if value.eq_ignore_ascii_case("none") {
                FieldEdit::DueDate(None)
            } else {
                FieldEdit::DueDate(Some(value.parse()?))
            }
        }
    })
}

/// Resolve a display position (as printed by `list`) to a task id
fn task_id_at(store: &TaskStore, pos: usize) -> Result<Uuid> {
    store
        .tasks()
        .get(pos)
        .map(|t| t.id)
        .ok_or_else(|| anyhow::anyhow!("No task at position {}", pos))
}

/// Resolve a task position plus 1-based subtask number
fn subtask_id_at(store: &TaskStore, pos: usize, number: usize) -> Result<(Uuid, Uuid)> {
    let task = store
        .tasks()
        .get(pos)
        .ok_or_else(|| anyhow::anyhow!("No task at position {}", pos))?;
    let subtask = number
        .checked_sub(1)
        .and_then(|i| task.subtasks.get(i))
        .ok_or_else(|| anyhow::anyhow!("No subtask {} on task {}", number, pos))?;
    Ok((task.id, subtask.id))
}

fn print_list(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }

    let now = now_ts();
    for task in tasks {
        let mark = if task.is_completed { "[x]" } else { "[ ]" };
        let running = if task.is_running() { " ▶" } else { "" };
        let mut line = format!(
            "{} {:>2}. {}{} ({})",
            mark,
            task.index,
            task.title,
            running,
            format_clock(task.current_time_spent(now))
        );
        if !task.subtasks.is_empty() {
            let done = task.subtasks.iter().filter(|st| st.is_completed).count();
            line.push_str(&format!(" [{}/{}]", done, task.subtasks.len()));
        }
        println!("{}", line);
    }
}
