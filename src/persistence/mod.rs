pub mod codec;
pub mod files;

pub use codec::{deserialize_tasks, load_tasks, save_tasks, serialize_tasks};
pub use files::{
    atomic_write, ensure_tally_dir, get_tally_dir, init_local_tally, read_file, tasks_file,
};
