// src/lookup.rs

//! Entry-file lookup within the project tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// File name `go run` needs when `--main` is not given.
pub const ENTRY_FILE_NAME: &str = "main.go";

/// Depth-first search for [`ENTRY_FILE_NAME`] under `root`.
///
/// Returns the first match in directory-listing order, or `None` when the
/// tree has no entry file at any depth.
pub fn find_entry_file(root: &Path) -> Result<Option<PathBuf>> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_file() && entry.file_name() == ENTRY_FILE_NAME {
            return Ok(Some(path));
        }
        if file_type.is_dir() {
            if let Some(found) = find_entry_file(&path)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}
