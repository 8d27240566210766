use super::enums::SortOption;
use super::task::Task;
use std::cmp::Ordering;

/// Filter tasks by a case-insensitive substring query.
///
/// Matches against title, description, notes, from-who, subtask titles and
/// descriptions. Adhoc tasks also match when the query is a substring of the
/// literal word "adhoc". An empty or whitespace-only query returns everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return tasks.iter().collect();
    }

    tasks
        .iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&query)
                || task.description.to_lowercase().contains(&query)
                || task.notes.to_lowercase().contains(&query)
                || task.from_who.to_lowercase().contains(&query)
                || (task.is_adhoc && "adhoc".contains(&query))
                || task
                    .subtasks
                    .iter()
                    .any(|st| st.title.to_lowercase().contains(&query))
                || task
                    .subtasks
                    .iter()
                    .any(|st| st.description.to_lowercase().contains(&query))
        })
        .collect()
}

/// Sort tasks for display.
///
/// When advanced mode is off the selected option is ignored and tasks always
/// come back in index order; the sort options only take effect in advanced
/// mode.
pub fn sort_tasks(mut tasks: Vec<&Task>, option: SortOption, advanced_mode: bool) -> Vec<&Task> {
    if !advanced_mode {
        tasks.sort_by_key(|t| t.index);
        return tasks;
    }

    match option {
        SortOption::CreatedNewest => {
            tasks.sort_by(|a, b| cmp_f64(b.created_at, a.created_at));
        }
        SortOption::CreatedOldest => {
            tasks.sort_by(|a, b| cmp_f64(a.created_at, b.created_at));
        }
        SortOption::RecentlyPlayed => {
            tasks.sort_by(|a, b| match (a.last_played_at, b.last_played_at) {
                (Some(pa), Some(pb)) => cmp_f64(pb, pa),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => cmp_f64(b.created_at, a.created_at),
            });
        }
        SortOption::DueDateNearest => {
            tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
                (Some(da), Some(db)) => cmp_f64(da, db),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => cmp_f64(b.created_at, a.created_at),
            });
        }
    }

    tasks
}

/// Split tasks into (incomplete, completed), each in collection order
pub fn partition(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    tasks.iter().partition(|t| !t.is_completed)
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
