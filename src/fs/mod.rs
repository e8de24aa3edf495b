//! Filesystem helpers.
//!
//! The ledger and agent documents are the corpus's only state, so writes go
//! through a temp file and a rename, and moves never leave half a file behind.

mod atomic;
mod move_file;

pub use atomic::{atomic_write, atomic_write_file};
pub use move_file::{move_file, move_file_no_clobber};
