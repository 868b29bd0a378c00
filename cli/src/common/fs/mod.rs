//! # HepChat Filesystem Utilities
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Import from the submodule, e.g. `use crate::common::fs::io::ensure_dir_exists;`
//!

/// Basic file I/O (`ensure_dir_exists`, `read_file_to_string`, `write_string_to_file`).
pub mod io;
