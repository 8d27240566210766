pub mod enums;
pub mod task;
pub mod views;

pub use enums::{field_is_empty, EditableField, FieldEdit, SortOption};
pub use task::{now_ts, Subtask, Task};
pub use views::{filter_tasks, partition, sort_tasks};
