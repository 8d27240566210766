use crate::domain::{partition, Task};
use chrono::{Local, TimeZone};

/// Format seconds as a running-clock value, "h:mm:ss" or "m:ss"
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = total / 60 % 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a time span as "Xd Yh", "Xh Ym", or "Xm" for due-date distances
pub fn format_span(seconds: f64) -> String {
    let total = seconds.abs() as u64;
    let days = total / 86400;
    let hours = total / 3600 % 24;
    let minutes = total / 60 % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format an epoch-seconds timestamp as a local date and time
fn format_timestamp(ts: f64) -> String {
    match Local.timestamp_opt(ts as i64, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%b %e, %Y %H:%M").to_string(),
        _ => format!("epoch {}", ts),
    }
}

/// Render one task as a human-readable text block
pub fn export_task(task: &Task, now: f64) -> String {
    let mut text = String::new();

    // Title header
    text.push_str(&format!("TASK: {}\n", task.title));
    text.push_str(&"=".repeat(task.title.chars().count() + 6));
    text.push_str("\n\n");

    // Status
    let status = if task.is_completed { "Completed" } else { "In Progress" };
    text.push_str(&format!("Status: {}\n", status));
    if task.is_running() {
        text.push_str("Currently Running: Yes\n");
    }
    text.push('\n');

    if !task.description.is_empty() {
        text.push_str("Description:\n");
        text.push_str(&task.description);
        text.push_str("\n\n");
    }

    if task.is_adhoc || !task.from_who.is_empty() {
        text.push_str("Task Info:\n");
        if task.is_adhoc {
            text.push_str("   Type: Adhoc Task\n");
        }
        if !task.from_who.is_empty() {
            text.push_str(&format!("   From: {}\n", task.from_who));
        }
        text.push('\n');
    }

    // Time tracking
    let spent = task.current_time_spent(now);
    text.push_str("Time Tracking:\n");
    text.push_str(&format!("   Time Spent: {}\n", format_clock(spent)));
    if task.estimated_time > 0.0 {
        text.push_str(&format!("   Estimated: {}\n", format_clock(task.estimated_time)));
        let progress = spent / task.estimated_time * 100.0;
        text.push_str(&format!("   Progress: {:.1}%\n", progress));
        if spent > task.estimated_time {
            text.push_str(&format!("   Over by: {}\n", format_clock(spent - task.estimated_time)));
        }
    }
    if task.countdown_time > 0.0 {
        text.push_str(&format!("   Countdown: {}\n", format_clock(task.countdown_time)));
        text.push_str(&format!(
            "   Countdown Elapsed: {}\n",
            format_clock(task.countdown_elapsed(now))
        ));
    }
    text.push('\n');

    // Dates
    text.push_str("Important Dates:\n");
    text.push_str(&format!("   Created: {}\n", format_timestamp(task.created_at)));
    if let Some(started_at) = task.started_at {
        text.push_str(&format!("   First Started: {}\n", format_timestamp(started_at)));
    }
    if let Some(last_played_at) = task.last_played_at {
        text.push_str(&format!("   Last Played: {}\n", format_timestamp(last_played_at)));
    }
    if let Some(due_date) = task.due_date {
        text.push_str(&format!("   Due: {}\n", format_timestamp(due_date)));
        if now > due_date {
            text.push_str(&format!("   Status: Overdue by {}\n", format_span(now - due_date)));
        } else {
            text.push_str(&format!("   Time Remaining: {}\n", format_span(due_date - now)));
        }
    }
    if let Some(completed_at) = task.completed_at {
        text.push_str(&format!("   Completed: {}\n", format_timestamp(completed_at)));
    }
    text.push('\n');

    // Subtasks
    if !task.subtasks.is_empty() {
        let completed_count = task.subtasks.iter().filter(|st| st.is_completed).count();
        text.push_str(&format!(
            "Subtasks ({}/{} completed):\n",
            completed_count,
            task.subtasks.len()
        ));
        for (i, subtask) in task.subtasks.iter().enumerate() {
            let mark = if subtask.is_completed { "[x]" } else { "[ ]" };
            text.push_str(&format!("  {}. {} {}\n", i + 1, mark, subtask.title));
            if !subtask.description.is_empty() {
                text.push_str(&format!("     {}\n", subtask.description));
            }
        }
        text.push('\n');
    }

    if !task.notes.is_empty() {
        text.push_str("Notes:\n");
        text.push_str(&task.notes);
        text.push_str("\n\n");
    }

    text
}

/// Render the whole collection: a report header with totals, then
/// incomplete tasks before completed tasks, each numbered within its group
pub fn export_all(tasks: &[Task], now: f64) -> String {
    let banner = "=".repeat(80);
    let rule = "-".repeat(80);
    let mut text = String::new();

    text.push_str(&banner);
    text.push_str("\nTALLY - ALL TASKS EXPORT\n");
    text.push_str(&banner);
    text.push_str("\n\n");

    let exported_at = match Local.timestamp_opt(now as i64, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%A, %B %e, %Y %H:%M:%S").to_string(),
        _ => format!("epoch {}", now),
    };
    text.push_str(&format!("Exported on: {}\n", exported_at));
    text.push_str(&format!("Total tasks: {}\n", tasks.len()));

    let (incomplete, completed) = partition(tasks);
    text.push_str(&format!("Completed: {}\n", completed.len()));
    text.push_str(&format!("In progress: {}\n", incomplete.len()));

    let total_spent: f64 = tasks.iter().map(|t| t.current_time_spent(now)).sum();
    text.push_str(&format!("Total time spent: {}\n\n", format_clock(total_spent)));

    text.push_str(&banner);
    text.push_str("\n\n");

    if !incomplete.is_empty() {
        text.push_str(&format!("INCOMPLETE TASKS ({})\n", incomplete.len()));
        text.push_str(&rule);
        text.push_str("\n\n");
        for (i, task) in incomplete.iter().enumerate() {
            text.push_str(&format!("[{}/{}]\n\n", i + 1, incomplete.len()));
            text.push_str(&export_task(task, now));
            text.push_str(&rule);
            text.push_str("\n\n");
        }
    }

    if !completed.is_empty() {
        text.push_str(&format!("COMPLETED TASKS ({})\n", completed.len()));
        text.push_str(&rule);
        text.push_str("\n\n");
        for (i, task) in completed.iter().enumerate() {
            text.push_str(&format!("[{}/{}]\n\n", i + 1, completed.len()));
            text.push_str(&export_task(task, now));
            text.push_str(&rule);
            text.push_str("\n\n");
        }
    }

    text.push_str(&banner);
    text.push_str("\nEND OF EXPORT\n");
    text.push_str(&banner);
    text.push('\n');

    text
}
