use super::task::Task;

/// Sort order for task list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// By creation date, newest first
    #[default]
    CreatedNewest,
    /// By creation date, oldest first
    CreatedOldest,
    /// Most recently started tasks first; never-played tasks last
    RecentlyPlayed,
    /// Nearest due date first; undated tasks last
    DueDateNearest,
}

impl SortOption {
    /// Parse a sort option from a CLI name like "newest" or "due"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "newest" => Some(Self::CreatedNewest),
            "oldest" => Some(Self::CreatedOldest),
            "played" | "recent" => Some(Self::RecentlyPlayed),
            "due" => Some(Self::DueDateNearest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatedNewest => "newest",
            Self::CreatedOldest => "oldest",
            Self::RecentlyPlayed => "played",
            Self::DueDateNearest => "due",
        }
    }
}

/// A single-field value for mass operations. One edit targets one task;
/// the store applies a batch of them to incomplete tasks only.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Title(String),
    Description(String),
    Notes(String),
    FromWho(String),
    Adhoc(bool),
    /// Estimate entered as hours and minutes, stored as seconds
    Estimate { hours: u32, minutes: u32 },
    /// Due date toggled present/absent
    DueDate(Option<f64>),
}

impl FieldEdit {
    /// Seconds for an estimate edit, with minutes clamped to 0..=59
    pub fn estimate_seconds(hours: u32, minutes: u32) -> f64 {
        f64::from(hours * 3600 + minutes.min(59) * 60)
    }
}

/// The fields a mass operation can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Title,
    Description,
    Notes,
    FromWho,
    Adhoc,
    Estimate,
    DueDate,
}

/// Whether a task's field counts as empty for fill-style mass operations.
/// Zero is treated as "no estimate"; false is treated as "not adhoc".
pub fn field_is_empty(task: &Task, field: EditableField) -> bool {
    match field {
        EditableField::Title => task.title.trim().is_empty(),
        EditableField::Description => task.description.is_empty(),
        EditableField::Notes => task.notes.is_empty(),
        EditableField::FromWho => task.from_who.is_empty(),
        EditableField::Adhoc => !task.is_adhoc,
        EditableField::Estimate => task.estimated_time == 0.0,
        EditableField::DueDate => task.due_date.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_option_from_name() {
        assert_eq!(SortOption::from_name("newest"), Some(SortOption::CreatedNewest));
        assert_eq!(SortOption::from_name("OLDEST"), Some(SortOption::CreatedOldest));
        assert_eq!(SortOption::from_name("played"), Some(SortOption::RecentlyPlayed));
        assert_eq!(SortOption::from_name("due"), Some(SortOption::DueDateNearest));
        assert_eq!(SortOption::from_name("invalid"), None);
    }

    #[test]
    fn test_estimate_seconds_clamps_minutes() {
        assert_eq!(FieldEdit::estimate_seconds(2, 0), 7200.0);
        assert_eq!(FieldEdit::estimate_seconds(0, 90), 59.0 * 60.0);
    }

    #[test]
    fn test_field_is_empty() {
        let mut task = Task::new("Test".to_string(), 0);
        assert!(field_is_empty(&task, EditableField::Description));
        assert!(field_is_empty(&task, EditableField::Estimate));
        assert!(field_is_empty(&task, EditableField::DueDate));
        assert!(field_is_empty(&task, EditableField::Adhoc));

        task.description = "x".to_string();
        task.estimated_time = 60.0;
        task.due_date = Some(1_700_000_000.0);
        task.is_adhoc = true;

        assert!(!field_is_empty(&task, EditableField::Description));
        assert!(!field_is_empty(&task, EditableField::Estimate));
        assert!(!field_is_empty(&task, EditableField::DueDate));
        assert!(!field_is_empty(&task, EditableField::Adhoc));
    }
}
