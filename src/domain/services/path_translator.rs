//! Path translator
//!
//! Maps a logical path to the concrete path valid on a given platform.
//! Home-relative paths (`~/...`) are expanded for the target user, and
//! paths written under another platform's home root are moved to the
//! target platform's home root with the remainder kept verbatim.

use crate::domain::value_objects::Platform;

const HOME_MARKER: &str = "~";
const FILE_SCHEME: &str = "file://";

/// Pure, total translation between platform path conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTranslator;

impl PathTranslator {
    /// Translate `path` into `platform`'s convention for `user`.
    ///
    /// Returns the path unchanged when it is neither home-relative nor
    /// rooted in a foreign home directory.
    pub fn normalize(path: &str, user: &str, platform: Platform) -> String {
        if let Some(expanded) = Self::expand_home(path, user, platform) {
            return expanded;
        }
        if let Some(rewritten) = Self::rewrite_foreign_prefix(path, platform) {
            return rewritten;
        }
        path.to_string()
    }

    /// Expand a leading `~` or `~/` to the platform's home for `user`
    pub fn expand_home(path: &str, user: &str, platform: Platform) -> Option<String> {
        let rest = path.strip_prefix(HOME_MARKER)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            // `~bob/...` names another user's home; leave it alone
            return None;
        }
        Some(format!("{}{}", platform.rule().home_for(user), rest))
    }

    /// Move a path rooted in another platform's home root to `platform`'s
    pub fn rewrite_foreign_prefix(path: &str, platform: Platform) -> Option<String> {
        let target = platform.rule();
        if target.strip_home_root(path).is_some() {
            return None;
        }
        Platform::ALL
            .iter()
            .filter(|other| **other != platform)
            .find_map(|other| other.rule().strip_home_root(path))
            .map(|rest| format!("{}{}", target.home_root, rest))
    }

    /// Platform whose home root `path` lives under, if any
    pub fn detect_platform(path: &str) -> Option<Platform> {
        Platform::ALL
            .into_iter()
            .find(|p| p.rule().strip_home_root(path).is_some())
    }
}

/// Drop a leading `file://` scheme from a directory argument
pub fn strip_file_scheme(path: &str) -> &str {
    path.strip_prefix(FILE_SCHEME).unwrap_or(path)
}
