use crate::domain::{filter_tasks, now_ts, partition, sort_tasks, FieldEdit, SortOption, Subtask, Task};
use crate::persistence::{load_tasks, save_tasks};
use std::path::PathBuf;
use uuid::Uuid;

/// Change notifications for collaborators holding a store reference
/// (list views, the floating current-task window, notification shims)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    TaskAdded(Uuid),
    TaskDeleted(Uuid),
    TaskCompleted(Uuid),
    TaskReopened(Uuid),
    TimerStarted(Uuid),
    TimerStopped(Uuid),
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the ordered task collection and all mutating operations.
///
/// Every mutation is followed synchronously by a full-collection save; a
/// failed save is logged and discarded, leaving the in-memory state
/// authoritative. Two invariants are maintained here: task indices stay
/// dense and 0-based after any structural change, and at most one task is
/// running at a time (the sweep inside `start_timer`).
pub struct TaskStore {
    tasks: Vec<Task>,
    path: PathBuf,
    listeners: Vec<Listener>,
}

impl TaskStore {
    /// Open a store backed by the given file, seeding it from disk.
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: PathBuf) -> Self {
        let tasks = load_tasks(&path);
        Self {
            tasks,
            path,
            listeners: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Register a callback invoked after every emitted change event
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: StoreEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn persist(&self) {
        if let Err(e) = save_tasks(&self.path, &self.tasks) {
            eprintln!("Warning: Failed to save tasks: {}", e);
        }
    }

    /// Reassign indices 0..N-1 in current relative order
    fn reindex(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.index = i;
        }
    }

    /// Add a task at the end of the list. A whitespace-only title is
    /// rejected and nothing changes.
    pub fn add_task(&mut self, title: &str) -> Option<Uuid> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }

        let task = Task::new(trimmed.to_string(), self.tasks.len());
        let id = task.id;
        self.tasks.push(task);
        self.persist();
        self.emit(StoreEvent::TaskAdded(id));
        Some(id)
    }

    /// Remove a task and renumber the remainder. Unknown ids are ignored.
    pub fn delete_task(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        self.reindex();
        self.persist();
        self.emit(StoreEvent::TaskDeleted(id));
    }

    /// Flip completion. Completing a running task stops its timer first;
    /// un-completing clears the completion timestamp but leaves accumulated
    /// time untouched.
    pub fn toggle_completed(&mut self, id: Uuid) {
        let now = now_ts();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.is_completed = !task.is_completed;
        let mut stopped = false;
        let completed = task.is_completed;

        if completed {
            task.completed_at = Some(now);
            if task.is_running() {
                task.stop(now);
                stopped = true;
            }
        } else {
            task.completed_at = None;
        }

        self.persist();
        if stopped {
            self.emit(StoreEvent::TimerStopped(id));
        }
        if completed {
            self.emit(StoreEvent::TaskCompleted(id));
        } else {
            self.emit(StoreEvent::TaskReopened(id));
        }
    }

    /// Start the timer for a task, stopping every other running task first
    /// so that at most one task is ever running. Completed tasks never
    /// start; the stop-others sweep still applies.
    pub fn start_timer(&mut self, id: Uuid) {
        if self.task(id).is_none() {
            return;
        }
        let now = now_ts();

        let mut swept = Vec::new();
        for task in self.tasks.iter_mut().filter(|t| t.id != id) {
            if task.is_running() {
                task.stop(now);
                swept.push(task.id);
            }
        }

        let mut started = false;
        // Already checked present above
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            if !task.is_completed && !task.is_running() {
                task.start(now);
                started = true;
            }
        }

        self.persist();
        for other in swept {
            self.emit(StoreEvent::TimerStopped(other));
        }
        if started {
            self.emit(StoreEvent::TimerStarted(id));
        }
    }

    /// Stop the timer for a task, folding the session into its totals
    pub fn stop_timer(&mut self, id: Uuid) {
        let now = now_ts();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if !task.is_running() {
            return;
        }

        task.stop(now);
        self.persist();
        self.emit(StoreEvent::TimerStopped(id));
    }

    pub fn toggle_timer(&mut self, id: Uuid) {
        let running = match self.task(id) {
            Some(task) => task.is_running(),
            None => return,
        };
        if running {
            self.stop_timer(id);
        } else {
            self.start_timer(id);
        }
    }

    /// Move a task from one position to another, shifting the tasks in
    /// between, then renumber. Equal or out-of-range indices are a no-op.
    pub fn move_task(&mut self, from: usize, to: usize) {
        if from == to || from >= self.tasks.len() || to >= self.tasks.len() {
            return;
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        self.reindex();
        self.persist();
    }

    /// Configure a countdown of `duration` seconds. Elapsed countdown time
    /// resets; the countdown segment starts ticking immediately when the
    /// task is running, otherwise at the next timer start.
    pub fn set_countdown(&mut self, id: Uuid, duration: f64) {
        let now = now_ts();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.countdown_time = duration;
        task.countdown_elapsed_at_pause = 0.0;
        task.countdown_start_time = if task.is_running() { Some(now) } else { None };
        self.persist();
    }

    pub fn clear_countdown(&mut self, id: Uuid) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.countdown_time = 0.0;
        task.countdown_start_time = None;
        task.countdown_elapsed_at_pause = 0.0;
        self.persist();
    }

    /// Append a subtask. A whitespace-only title is rejected.
    pub fn add_subtask(&mut self, task_id: Uuid, title: &str) -> Option<Uuid> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;

        let subtask = Subtask::new(trimmed.to_string());
        let id = subtask.id;
        task.subtasks.push(subtask);
        self.persist();
        Some(id)
    }

    pub fn toggle_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        let Some(subtask) = task.subtasks.iter_mut().find(|st| st.id == subtask_id) else {
            return;
        };

        subtask.is_completed = !subtask.is_completed;
        self.persist();
    }

    pub fn delete_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        let before = task.subtasks.len();
        task.subtasks.retain(|st| st.id != subtask_id);
        if task.subtasks.len() == before {
            return;
        }
        self.persist();
    }

    /// Apply one field edit per task, restricted to incomplete tasks.
    /// Fill-vs-edit semantics are the caller's pre-filtering concern; the
    /// store assigns unconditionally.
    pub fn batch_assign(&mut self, edits: &[(Uuid, FieldEdit)]) {
        let mut changed = false;
        for (id, edit) in edits {
            let Some(task) = self
                .tasks
                .iter_mut()
                .find(|t| t.id == *id && !t.is_completed)
            else {
                continue;
            };

            match edit {
                FieldEdit::Title(value) => task.title = value.clone(),
                FieldEdit::Description(value) => task.description = value.clone(),
                FieldEdit::Notes(value) => task.notes = value.clone(),
                FieldEdit::FromWho(value) => task.from_who = value.clone(),
                FieldEdit::Adhoc(value) => task.is_adhoc = *value,
                FieldEdit::Estimate { hours, minutes } => {
                    task.estimated_time = FieldEdit::estimate_seconds(*hours, *minutes);
                }
                FieldEdit::DueDate(value) => task.due_date = *value,
            }
            changed = true;
        }

        if changed {
            self.persist();
        }
    }

    // Derived views

    pub fn filter(&self, query: &str) -> Vec<&Task> {
        filter_tasks(&self.tasks, query)
    }

    pub fn sorted(&self, option: SortOption, advanced_mode: bool) -> Vec<&Task> {
        sort_tasks(self.tasks.iter().collect(), option, advanced_mode)
    }

    pub fn partition(&self) -> (Vec<&Task>, Vec<&Task>) {
        partition(&self.tasks)
    }

    /// The running task, if any
    pub fn running_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_store() -> (TaskStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json"));
        (store, dir)
    }

    fn assert_indices_dense(store: &TaskStore) {
        let mut indices: Vec<usize> = store.tasks().iter().map(|t| t.index).collect();
        indices.sort_unstable();
        let expected: Vec<usize> = (0..store.tasks().len()).collect();
        assert_eq!(indices, expected);
    }

    fn running_count(store: &TaskStore) -> usize {
        store.tasks().iter().filter(|t| t.is_running()).count()
    }

    #[test]
    fn test_add_task_appends_with_dense_index() {
        let (mut store, _dir) = test_store();

        store.add_task("First");
        store.add_task("  Second  ");
        store.add_task("Third");

        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.tasks()[1].title, "Second");
        assert_indices_dense(&store);
    }

    #[test]
    fn test_add_task_rejects_blank_title() {
        let (mut store, _dir) = test_store();
        assert!(store.add_task("").is_none());
        assert!(store.add_task("   ").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_task_renumbers() {
        let (mut store, _dir) = test_store();
        store.add_task("A");
        let b = store.add_task("B").unwrap();
        store.add_task("C");

        store.delete_task(b);

        assert_eq!(store.tasks().len(), 2);
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_indices_dense(&store);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let (mut store, _dir) = test_store();
        store.add_task("A");
        store.delete_task(Uuid::new_v4());
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_move_task_reorders_and_renumbers() {
        let (mut store, _dir) = test_store();
        store.add_task("A");
        store.add_task("B");
        store.add_task("C");

        store.move_task(0, 2);

        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
        assert_indices_dense(&store);
    }

    #[test]
    fn test_move_task_equal_or_out_of_range_is_noop() {
        let (mut store, _dir) = test_store();
        store.add_task("A");
        store.add_task("B");

        store.move_task(1, 1);
        store.move_task(5, 0);
        store.move_task(0, 5);

        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_indices_dense(&store);
    }

    #[test]
    fn test_index_density_after_mixed_mutations() {
        let (mut store, _dir) = test_store();
        let ids: Vec<Uuid> = (0..6)
            .map(|i| store.add_task(&format!("T{i}")).unwrap())
            .collect();

        store.delete_task(ids[2]);
        store.move_task(0, 3);
        store.delete_task(ids[5]);
        store.move_task(3, 0);
        store.add_task("Extra");

        assert_indices_dense(&store);
    }

    #[test]
    fn test_start_timer_sets_timestamps() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("Write report").unwrap();

        store.start_timer(id);

        let task = store.task(id).unwrap();
        assert!(task.is_running());
        assert!(task.started_at.is_some());
        assert!(task.last_played_at.is_some());
    }

    #[test]
    fn test_single_runner_invariant() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();
        let c = store.add_task("C").unwrap();

        store.start_timer(a);
        store.start_timer(b);
        store.start_timer(c);
        assert_eq!(running_count(&store), 1);
        assert!(store.task(c).unwrap().is_running());

        store.toggle_timer(b);
        assert_eq!(running_count(&store), 1);
        assert!(store.task(b).unwrap().is_running());

        store.stop_timer(b);
        assert_eq!(running_count(&store), 0);
    }

    #[test]
    fn test_sweep_accumulates_time_for_stopped_task() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();

        store.start_timer(a);
        // Backdate the running session to simulate 90 seconds of work
        store.tasks[0].last_start_time = Some(now_ts() - 90.0);

        store.start_timer(b);

        let swept = store.task(a).unwrap();
        assert!(!swept.is_running());
        assert!(
            (swept.total_time_spent - 90.0).abs() < 1.0,
            "expected ~90s, got {}",
            swept.total_time_spent
        );
    }

    #[test]
    fn test_stop_timer_accumulates_elapsed() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.start_timer(id);
        store.tasks[0].last_start_time = Some(now_ts() - 90.0);
        store.stop_timer(id);

        let task = store.task(id).unwrap();
        assert!(task.last_start_time.is_none());
        assert!((task.total_time_spent - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_completed_task_never_starts() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.toggle_completed(id);
        store.start_timer(id);

        assert!(!store.task(id).unwrap().is_running());
    }

    #[test]
    fn test_start_timer_on_completed_still_sweeps_others() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();

        store.start_timer(a);
        store.toggle_completed(b);
        store.start_timer(b);

        assert_eq!(running_count(&store), 0);
        assert!(!store.task(a).unwrap().is_running());
    }

    #[test]
    fn test_completion_stops_running_timer() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.start_timer(id);
        store.tasks[0].last_start_time = Some(now_ts() - 50.0);
        store.toggle_completed(id);

        let task = store.task(id).unwrap();
        assert!(task.is_completed);
        assert!(task.completed_at.is_some());
        assert!(!task.is_running());
        assert!((task.total_time_spent - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_uncomplete_clears_completed_at_keeps_time() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.tasks[0].total_time_spent = 120.0;
        store.toggle_completed(id);
        store.toggle_completed(id);

        let task = store.task(id).unwrap();
        assert!(!task.is_completed);
        assert!(task.completed_at.is_none());
        assert_eq!(task.total_time_spent, 120.0);
    }

    #[test]
    fn test_set_countdown_on_running_task() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.start_timer(id);
        store.set_countdown(id, 1500.0);

        let task = store.task(id).unwrap();
        assert_eq!(task.countdown_time, 1500.0);
        assert_eq!(task.countdown_elapsed_at_pause, 0.0);
        assert!(task.countdown_start_time.is_some());
    }

    #[test]
    fn test_set_countdown_on_paused_task_waits_for_start() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.set_countdown(id, 600.0);
        let task = store.task(id).unwrap();
        assert_eq!(task.countdown_time, 600.0);
        assert!(task.countdown_start_time.is_none());

        store.start_timer(id);
        assert!(store.task(id).unwrap().countdown_start_time.is_some());
    }

    #[test]
    fn test_clear_countdown_resets_all_fields() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.start_timer(id);
        store.set_countdown(id, 600.0);
        store.clear_countdown(id);

        let task = store.task(id).unwrap();
        assert_eq!(task.countdown_time, 0.0);
        assert!(task.countdown_start_time.is_none());
        assert_eq!(task.countdown_elapsed_at_pause, 0.0);
    }

    #[test]
    fn test_countdown_folds_into_pause_on_sweep() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();

        store.start_timer(a);
        store.set_countdown(a, 1500.0);
        store.tasks[0].countdown_start_time = Some(now_ts() - 60.0);

        store.start_timer(b);

        let swept = store.task(a).unwrap();
        assert!(swept.countdown_start_time.is_none());
        assert!((swept.countdown_elapsed_at_pause - 60.0).abs() < 1.0);
    }

    #[test]
    fn test_subtask_crud() {
        let (mut store, _dir) = test_store();
        let task_id = store.add_task("Parent").unwrap();

        assert!(store.add_subtask(task_id, "   ").is_none());
        let st1 = store.add_subtask(task_id, "One").unwrap();
        let st2 = store.add_subtask(task_id, "  Two ").unwrap();

        let task = store.task(task_id).unwrap();
        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(task.subtasks[1].title, "Two");

        store.toggle_subtask(task_id, st1);
        assert!(store.task(task_id).unwrap().subtasks[0].is_completed);
        store.toggle_subtask(task_id, st1);
        assert!(!store.task(task_id).unwrap().subtasks[0].is_completed);

        store.delete_subtask(task_id, st1);
        let task = store.task(task_id).unwrap();
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].id, st2);

        // Unknown ids are silently ignored
        store.toggle_subtask(task_id, Uuid::new_v4());
        store.delete_subtask(Uuid::new_v4(), st2);
        assert_eq!(store.task(task_id).unwrap().subtasks.len(), 1);
    }

    #[test]
    fn test_batch_assign_skips_completed_tasks() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();
        store.toggle_completed(b);

        store.batch_assign(&[
            (a, FieldEdit::FromWho("Alice".to_string())),
            (b, FieldEdit::FromWho("Alice".to_string())),
        ]);

        assert_eq!(store.task(a).unwrap().from_who, "Alice");
        assert_eq!(store.task(b).unwrap().from_who, "");
    }

    #[test]
    fn test_batch_assign_field_variants() {
        let (mut store, _dir) = test_store();
        let id = store.add_task("A").unwrap();

        store.batch_assign(&[
            (id, FieldEdit::Description("desc".to_string())),
            (id, FieldEdit::Notes("note".to_string())),
            (id, FieldEdit::Adhoc(true)),
            (id, FieldEdit::Estimate { hours: 2, minutes: 30 }),
            (id, FieldEdit::DueDate(Some(1_750_000_000.0))),
        ]);

        let task = store.task(id).unwrap();
        assert_eq!(task.description, "desc");
        assert_eq!(task.notes, "note");
        assert!(task.is_adhoc);
        assert_eq!(task.estimated_time, 9000.0);
        assert_eq!(task.due_date, Some(1_750_000_000.0));

        store.batch_assign(&[(id, FieldEdit::DueDate(None))]);
        assert!(store.task(id).unwrap().due_date.is_none());
    }

    #[test]
    fn test_events_are_delivered() {
        let (mut store, _dir) = test_store();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event| sink.borrow_mut().push(*event));

        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();
        store.start_timer(a);
        store.start_timer(b); // sweeps a
        store.toggle_completed(b); // stops b, completes b

        let log = events.borrow();
        assert_eq!(
            *log,
            vec![
                StoreEvent::TaskAdded(a),
                StoreEvent::TaskAdded(b),
                StoreEvent::TimerStarted(a),
                StoreEvent::TimerStopped(a),
                StoreEvent::TimerStarted(b),
                StoreEvent::TimerStopped(b),
                StoreEvent::TaskCompleted(b),
            ]
        );
    }

    #[test]
    fn test_mutations_are_durable_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::open(path.clone());
        let id = store.add_task("Durable").unwrap();
        store.add_subtask(id, "Child");

        // A fresh store sees the mutation without any explicit save call
        let reopened = TaskStore::open(path);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "Durable");
        assert_eq!(reopened.tasks()[0].subtasks.len(), 1);
    }

    #[test]
    fn test_running_state_does_not_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::open(path.clone());
        let id = store.add_task("Mid-flight").unwrap();
        store.start_timer(id);
        store.set_countdown(id, 900.0);

        let reopened = TaskStore::open(path);
        let task = &reopened.tasks()[0];
        assert!(!task.is_running());
        assert_eq!(task.countdown_time, 0.0);
        assert!(task.last_played_at.is_none());
    }

    #[test]
    fn test_basic_lifecycle_scenario() {
        let (mut store, _dir) = test_store();

        let id = store.add_task("Write report").unwrap();
        {
            let task = store.task(id).unwrap();
            assert_eq!(task.index, 0);
            assert!(!task.is_completed);
            assert_eq!(task.total_time_spent, 0.0);
        }

        store.start_timer(id);
        assert!(store.task(id).unwrap().is_running());
        assert!(store.task(id).unwrap().started_at.is_some());

        // Simulate 90 seconds of work
        store.tasks[0].last_start_time = Some(now_ts() - 90.0);
        store.stop_timer(id);
        {
            let task = store.task(id).unwrap();
            assert!(!task.is_running());
            assert!((task.total_time_spent - 90.0).abs() < 1.0);
        }

        store.toggle_completed(id);
        let task = store.task(id).unwrap();
        assert!(task.is_completed);
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn test_persistence_round_trip_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::open(path.clone());
        let id = store.add_task("Release prep").unwrap();
        let st1 = store.add_subtask(id, "Write changelog").unwrap();
        store.add_subtask(id, "Tag build").unwrap();
        store.toggle_subtask(id, st1);
        store.batch_assign(&[
            (id, FieldEdit::Notes("double-check artifacts".to_string())),
            (id, FieldEdit::Estimate { hours: 2, minutes: 0 }),
            (id, FieldEdit::DueDate(Some(1_760_000_000.0))),
        ]);
        store.start_timer(id);

        let original = store.task(id).unwrap().clone();
        let reopened = TaskStore::open(path);
        let loaded = &reopened.tasks()[0];

        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.title, original.title);
        assert_eq!(loaded.notes, original.notes);
        assert_eq!(loaded.estimated_time, 7200.0);
        assert_eq!(loaded.due_date, Some(1_760_000_000.0));
        assert_eq!(loaded.subtasks, original.subtasks);
        assert_eq!(loaded.started_at, original.started_at);
        // Timer-in-progress state resets
        assert!(loaded.last_start_time.is_none());
        assert!(loaded.last_played_at.is_none());
    }

    #[test]
    fn test_view_delegation() {
        let (mut store, _dir) = test_store();
        let a = store.add_task("Alpha").unwrap();
        let b = store.add_task("Beta").unwrap();
        store.toggle_completed(b);

        assert_eq!(store.filter("alp").len(), 1);
        let (incomplete, completed) = store.partition();
        assert_eq!(incomplete[0].id, a);
        assert_eq!(completed[0].id, b);

        let sorted = store.sorted(SortOption::CreatedNewest, false);
        assert_eq!(sorted[0].id, a);
    }
}
