//! Process-level inspection: the process directory, threads and modules
//!
//! Every call resolves the pid afresh; nothing is cached between calls.

pub mod enumerator;
pub mod modules;
pub mod probe;
pub mod threads;

pub use enumerator::{find_processes_by_name, list_processes, ProcessEntry, ProcessEnumerator};
pub use modules::list_modules;
pub use probe::ensure_alive;
pub use threads::list_threads;
