use crate::domain::{now_ts, Subtask, Task};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

use super::files::{atomic_write, read_file};

/// Top-level shape of tasks.json: one object keyed by task id.
///
/// Keyed-by-id rather than an array, matching the original file format; a
/// file written by hand with duplicate ids simply cannot express them.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    tasks: BTreeMap<String, Value>,
}

/// On-disk record for a single task. Field names are fixed by the file
/// format. Timer-in-progress state (lastStartTime, the countdown fields,
/// lastPlayedAt) is deliberately absent: it must never survive a save/load
/// round trip.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    title: String,
    index: usize,
    #[serde(default)]
    is_completed: bool,
    #[serde(default)]
    total_time_spent: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_adhoc: bool,
    #[serde(default)]
    from_who: String,
    #[serde(default)]
    estimated_time: f64,
    #[serde(default)]
    created_at: Option<f64>,
    #[serde(default)]
    notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<f64>,
    #[serde(default)]
    subtasks: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubtaskRecord {
    id: Uuid,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_completed: bool,
}

impl From<&Subtask> for SubtaskRecord {
    fn from(st: &Subtask) -> Self {
        Self {
            id: st.id,
            title: st.title.clone(),
            description: st.description.clone(),
            is_completed: st.is_completed,
        }
    }
}

impl From<SubtaskRecord> for Subtask {
    fn from(rec: SubtaskRecord) -> Self {
        Self {
            id: rec.id,
            title: rec.title,
            description: rec.description,
            is_completed: rec.is_completed,
        }
    }
}

fn task_to_record(task: &Task) -> Result<Value> {
    let subtasks = task
        .subtasks
        .iter()
        .map(|st| serde_json::to_value(SubtaskRecord::from(st)))
        .collect::<Result<Vec<_>, _>>()?;

    let record = TaskRecord {
        title: task.title.clone(),
        index: task.index,
        is_completed: task.is_completed,
        total_time_spent: task.total_time_spent,
        description: task.description.clone(),
        is_adhoc: task.is_adhoc,
        from_who: task.from_who.clone(),
        estimated_time: task.estimated_time,
        created_at: Some(task.created_at),
        notes: task.notes.clone(),
        due_date: task.due_date,
        started_at: task.started_at,
        completed_at: task.completed_at,
        subtasks,
    };

    Ok(serde_json::to_value(record)?)
}

fn record_to_task(id: Uuid, record: TaskRecord) -> Task {
    let subtasks = record
        .subtasks
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<SubtaskRecord>(value) {
            Ok(rec) => Some(Subtask::from(rec)),
            Err(e) => {
                eprintln!("Warning: Skipping malformed subtask: {}", e);
                None
            }
        })
        .collect();

    Task {
        id,
        title: record.title,
        is_completed: record.is_completed,
        index: record.index,
        total_time_spent: record.total_time_spent,
        last_start_time: None,
        description: record.description,
        due_date: record.due_date,
        is_adhoc: record.is_adhoc,
        from_who: record.from_who,
        estimated_time: record.estimated_time,
        subtasks,
        created_at: record.created_at.unwrap_or_else(now_ts),
        started_at: record.started_at,
        completed_at: record.completed_at,
        notes: record.notes,
        countdown_time: 0.0,
        countdown_start_time: None,
        countdown_elapsed_at_pause: 0.0,
        last_played_at: None,
    }
}

/// Serialize the full collection as a pretty-printed JSON document
pub fn serialize_tasks(tasks: &[Task]) -> Result<String> {
    let mut file = StoreFile::default();
    for task in tasks {
        file.tasks.insert(task.id.to_string(), task_to_record(task)?);
    }
    serde_json::to_string_pretty(&file).context("Failed to serialize tasks")
}

/// Parse a JSON document back into tasks, sorted by index.
///
/// Tolerant by design: a malformed document yields an empty list, and
/// individual entries missing a valid id, title, or index are skipped.
pub fn deserialize_tasks(content: &str) -> Vec<Task> {
    let file: StoreFile = match serde_json::from_str(content) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Could not parse task file, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut tasks = Vec::new();
    for (id_string, value) in file.tasks {
        let Ok(id) = Uuid::parse_str(&id_string) else {
            eprintln!("Warning: Skipping task with invalid id: {}", id_string);
            continue;
        };
        match serde_json::from_value::<TaskRecord>(value) {
            Ok(record) => tasks.push(record_to_task(id, record)),
            Err(e) => {
                eprintln!("Warning: Skipping malformed task {}: {}", id_string, e);
            }
        }
    }

    // The on-disk map has no meaningful order
    tasks.sort_by_key(|t| t.index);
    tasks
}

/// Save the full collection, overwriting any existing file
pub fn save_tasks<P: AsRef<Path>>(path: P, tasks: &[Task]) -> Result<()> {
    let json = serialize_tasks(tasks)?;
    atomic_write(path, &json)
}

/// Load tasks from the given path.
///
/// A missing file, an unreadable file, and a malformed document all yield an
/// empty list; load never fails to its caller.
pub fn load_tasks<P: AsRef<Path>>(path: P) -> Vec<Task> {
    let path = path.as_ref();
    if !path.exists() {
        return Vec::new();
    }
    match read_file(path) {
        Ok(content) => deserialize_tasks(&content),
        Err(e) => {
            eprintln!("Warning: Could not read task file, starting empty: {}", e);
            Vec::new()
        }
    }
}
