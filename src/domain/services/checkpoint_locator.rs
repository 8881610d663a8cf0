//! Checkpoint root locator
//!
//! Checkpoint directories are relocated between machines, so they are
//! identified structurally: a checkpoint root is a directory that holds the
//! zero-byte [`CHECKPOINT_MARKER`] file. Lookups walk upward from a file or
//! directory until the first marked directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::services::PathTranslator;
use crate::domain::value_objects::Platform;
use crate::error::{SyncError, SyncResult};

/// Sentinel file present in, and only in, checkpoint root directories
pub const CHECKPOINT_MARKER: &str = ".is_checkpoint";

/// Resolves checkpoint roots on the local machine
#[derive(Debug, Clone)]
pub struct CheckpointRootLocator {
    platform: Platform,
    home: Option<PathBuf>,
}

impl CheckpointRootLocator {
    /// Locator for a host of the given platform
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            home: dirs::home_dir(),
        }
    }

    /// Locator for the running process's platform
    pub fn for_current_platform() -> Self {
        Self::new(Platform::current())
    }

    /// Override the directory `~` expands to
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Find the checkpoint root enclosing `path`.
    ///
    /// `path` may carry another platform's home prefix; it is rewritten to
    /// this locator's platform first. The result is absolute and free of
    /// `.`/`..` segments.
    pub fn find_checkpoint_root(&self, path: &str) -> SyncResult<PathBuf> {
        let start = resolve_start(&self.localize(path)?)?;

        let metadata = fs::metadata(&start).map_err(|e| not_found(e, &start))?;

        let mut dir = if metadata.is_dir() {
            start.as_path()
        } else {
            start.parent().ok_or_else(|| SyncError::CheckpointRootNotFound {
                path: start.clone(),
            })?
        };

        // One step per ancestor; `parent()` is None at the root.
        loop {
            if dir.join(CHECKPOINT_MARKER).is_file() {
                return Ok(dir.to_path_buf());
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(SyncError::CheckpointRootNotFound {
                        path: start.clone(),
                    })
                }
            }
        }
    }

    /// Rewrite foreign prefixes, expand `~` and make the path absolute
    fn localize(&self, path: &str) -> SyncResult<PathBuf> {
        let rewritten = PathTranslator::rewrite_foreign_prefix(path, self.platform)
            .unwrap_or_else(|| path.to_string());

        let expanded = match (rewritten.strip_prefix('~'), &self.home) {
            (Some(""), Some(home)) => home.clone(),
            (Some(rest), Some(home)) if rest.starts_with('/') => {
                home.join(rest.trim_start_matches('/'))
            }
            _ => PathBuf::from(&rewritten),
        };

        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(std::env::current_dir()?.join(expanded))
        }
    }
}

/// Mark `dir` as a checkpoint root by writing the zero-byte marker
pub fn mark_checkpoint(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let marker = dir.join(CHECKPOINT_MARKER);
    fs::File::create(&marker)?;
    Ok(marker)
}

/// `path` without `.` segments. Paths with `..` segments are resolved by
/// the filesystem, so `link/..` means the parent of the link's target.
fn resolve_start(path: &Path) -> SyncResult<PathBuf> {
    if path.components().any(|c| c == Component::ParentDir) {
        fs::canonicalize(path).map_err(|e| not_found(e, path))
    } else {
        Ok(path.components().collect())
    }
}

fn not_found(e: std::io::Error, path: &Path) -> SyncError {
    match e.kind() {
        std::io::ErrorKind::NotFound => SyncError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => SyncError::Io(e),
    }
}
