//! File I/O for the JSON file backend.
//!
//! This module handles:
//! - Writing files atomically
//! - Reading and decoding JSON files
//! - Content hashing for foreign-write detection

mod hash;
mod load;
mod save;

pub use hash::content_hash;
pub(crate) use hash::file_hash;
pub use load::read_json_file;
pub use save::write_json_atomic;
