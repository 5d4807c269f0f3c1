//! Common utilities over loosely-typed host documents.
//!
//! Host documents (actors, items) and their pending updates are plain JSON
//! records. These helpers are pure functions: no side effects, no I/O.

pub mod merge;
pub mod path;

pub use merge::{fill_defaults, merge_values};
pub use path::{get_path, remove_path, set_path};
