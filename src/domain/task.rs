use chrono::Local;
use uuid::Uuid;

/// Current wall-clock time as epoch seconds.
///
/// Timestamps are kept as `f64` epoch seconds throughout the model so they
/// serialize to the task file unchanged.
pub fn now_ts() -> f64 {
    let now = Local::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_millis()) / 1000.0
}

/// A lightweight checklist item owned by exactly one task
#[derive(Debug, Clone, PartialEq)]
pub struct Subtask {
    /// Unique ID, assigned at creation
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Completion flag
    pub is_completed: bool,
}

impl Subtask {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: String::new(),
            is_completed: false,
        }
    }
}

/// A trackable to-do item with time tracking, optional due date, an optional
/// countdown timer, and subtasks
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique ID, immutable after creation
    pub id: Uuid,
    /// Task title
    pub title: String,
    /// Completion flag
    pub is_completed: bool,
    /// Dense 0-based display position among siblings
    pub index: usize,
    /// Accumulated seconds from completed timer sessions
    pub total_time_spent: f64,
    /// Epoch seconds of the current session start; Some iff the timer is running.
    /// Not persisted.
    pub last_start_time: Option<f64>,
    /// Free-text description
    pub description: String,
    /// Due date as epoch seconds
    pub due_date: Option<f64>,
    /// Whether this is an adhoc task
    pub is_adhoc: bool,
    /// Who the task came from
    pub from_who: String,
    /// Estimated seconds to complete; 0 means no estimate
    pub estimated_time: f64,
    /// Subtasks in display order
    pub subtasks: Vec<Subtask>,
    /// Epoch seconds when the task was created
    pub created_at: f64,
    /// Epoch seconds when the timer was first ever started; never reset
    pub started_at: Option<f64>,
    /// Epoch seconds when the task was marked completed; cleared on un-complete
    pub completed_at: Option<f64>,
    /// Notes taken while working on the task
    pub notes: String,
    /// Countdown duration in seconds; 0 means no countdown configured.
    /// Not persisted.
    pub countdown_time: f64,
    /// Epoch seconds when the current countdown segment started; Some only
    /// while running with a countdown configured. Not persisted.
    pub countdown_start_time: Option<f64>,
    /// Countdown seconds accumulated from prior segments. Not persisted.
    pub countdown_elapsed_at_pause: f64,
    /// Epoch seconds of the most recent timer start; drives "recently played"
    /// ordering. Not persisted.
    pub last_played_at: Option<f64>,
}

impl Task {
    pub fn new(title: String, index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            is_completed: false,
            index,
            total_time_spent: 0.0,
            last_start_time: None,
            description: String::new(),
            due_date: None,
            is_adhoc: false,
            from_who: String::new(),
            estimated_time: 0.0,
            subtasks: Vec::new(),
            created_at: now_ts(),
            started_at: None,
            completed_at: None,
            notes: String::new(),
            countdown_time: 0.0,
            countdown_start_time: None,
            countdown_elapsed_at_pause: 0.0,
            last_played_at: None,
        }
    }

    /// A task is running iff it has an active session start timestamp
    pub fn is_running(&self) -> bool {
        self.last_start_time.is_some()
    }

    /// Accumulated time plus the in-flight session, if any
    pub fn current_time_spent(&self, now: f64) -> f64 {
        match self.last_start_time {
            Some(start) => self.total_time_spent + (now - start),
            None => self.total_time_spent,
        }
    }

    /// Elapsed countdown seconds, clamped to the configured duration.
    /// Zero when no countdown is configured or none has ever started.
    pub fn countdown_elapsed(&self, now: f64) -> f64 {
        if self.countdown_time <= 0.0 {
            return 0.0;
        }
        let Some(start) = self.countdown_start_time else {
            return self.countdown_elapsed_at_pause.min(self.countdown_time);
        };
        if self.is_running() {
            (self.countdown_elapsed_at_pause + (now - start)).min(self.countdown_time)
        } else {
            self.countdown_elapsed_at_pause.min(self.countdown_time)
        }
    }

    /// Begin a timer session at `now`. Sets first-start and last-played
    /// timestamps and resumes the countdown if one is configured and not
    /// yet finished. Caller is responsible for stopping other running tasks
    /// first (the single-runner sweep lives in the store).
    pub fn start(&mut self, now: f64) {
        self.last_start_time = Some(now);
        if self.countdown_time > 0.0 && self.countdown_elapsed_at_pause < self.countdown_time {
            self.countdown_start_time = Some(now);
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.last_played_at = Some(now);
    }

    /// End the current timer session at `now`, folding elapsed time into
    /// `total_time_spent` and any active countdown segment into
    /// `countdown_elapsed_at_pause`. No-op if not running.
    pub fn stop(&mut self, now: f64) {
        if let Some(start) = self.last_start_time.take() {
            self.total_time_spent += now - start;
        }
        if self.countdown_time > 0.0 {
            if let Some(start) = self.countdown_start_time.take() {
                self.countdown_elapsed_at_pause += now - start;
            }
        }
    }
}
