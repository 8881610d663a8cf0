//! Local results directory housekeeping

use std::fs;
use std::path::Path;

/// Remove every entry inside `dir`, keeping `dir` itself.
///
/// Returns the number of top-level entries removed.
pub fn delete_dir_contents(dir: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    Ok(removed)
}

/// Empty `dir` if it exists, create it otherwise
pub fn reset_dir(dir: &Path) -> std::io::Result<usize> {
    if dir.is_dir() {
        delete_dir_contents(dir)
    } else {
        fs::create_dir_all(dir)?;
        Ok(0)
    }
}
