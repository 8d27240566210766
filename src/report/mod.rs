pub mod export;

pub use export::{export_all, export_task, format_clock, format_span};
