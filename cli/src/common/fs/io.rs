//! # HepChat Filesystem I/O
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` that attach the path to every error:
//! - `ensure_dir_exists`: create a directory tree, or confirm it is one
//! - `read_file_to_string`: read a UTF-8 data file
//! - `write_string_to_file`: write a file, creating its parent directories
//!
//! The data loaders read through `read_file_to_string`; the evaluation
//! report is written through `write_string_to_file`.
//!
use crate::core::error::{ChatError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// # Ensure Directory Exists (`ensure_dir_exists`)
///
/// Creates `path` and any missing parents. Succeeds without doing anything
/// if `path` is already a directory.
///
/// ## Errors
///
/// Fails if the directory cannot be created or if `path` exists but is not
/// a directory.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        info!("Created directory: {}", path.display());
    } else if !path.is_dir() {
        anyhow::bail!(ChatError::FileSystem(format!(
            "Path exists but is not a directory: {}",
            path.display()
        )));
    } else {
        debug!("Directory already exists: {}", path.display());
    }
    Ok(())
}

/// Reads `path` into a string, naming the file on failure.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Writes `content` to `path`, creating parent directories first.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        // A bare file name has an empty parent, meaning the current directory.
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write file {}", path.display()))?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
