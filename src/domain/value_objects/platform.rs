//! Platform value object - the operating-system family of a host
//!
//! Each platform owns exactly one home-directory rule. All path rewriting
//! goes through [`Platform::rule`] so there is a single lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Operating-system family of a driver or worker host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Platform {
    /// macOS (`/Users/{user}`)
    #[serde(rename = "darwin", alias = "macos", alias = "mac")]
    #[value(name = "darwin", alias = "macos", alias = "mac")]
    MacOs,
    /// Linux (`/home/{user}`)
    #[serde(rename = "linux", alias = "linux2")]
    #[value(name = "linux", alias = "linux2")]
    Linux,
    /// Windows (`C:/Users/{user}`)
    #[serde(rename = "windows", alias = "win32")]
    #[value(name = "windows", alias = "win32")]
    Windows,
}

/// Home-directory convention of one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPathRule {
    /// Directory holding every user's home, without trailing slash
    pub home_root: &'static str,
}

const MACOS_RULE: PlatformPathRule = PlatformPathRule {
    home_root: "/Users",
};
const LINUX_RULE: PlatformPathRule = PlatformPathRule {
    home_root: "/home",
};
const WINDOWS_RULE: PlatformPathRule = PlatformPathRule {
    home_root: "C:/Users",
};

impl PlatformPathRule {
    /// Home prefix instantiated for `user`, e.g. `/home/alice`
    pub fn home_for(&self, user: &str) -> String {
        format!("{}/{}", self.home_root, user)
    }

    /// Remainder of `path` after this rule's home root, including the
    /// leading `/`, if `path` lives under the root.
    pub fn strip_home_root<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.home_root)?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

impl Platform {
    /// Every supported platform
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Linux, Platform::Windows];

    /// Platform of the running process
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Home-directory rule for this platform
    pub fn rule(&self) -> &'static PlatformPathRule {
        match self {
            Platform::MacOs => &MACOS_RULE,
            Platform::Linux => &LINUX_RULE,
            Platform::Windows => &WINDOWS_RULE,
        }
    }

    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "darwin" | "macos" | "mac" => Ok(Platform::MacOs),
            "linux" | "linux2" => Ok(Platform::Linux),
            "windows" | "win32" => Ok(Platform::Windows),
            _ => Err(SyncError::UnknownPlatform {
                value: s.to_string(),
            }),
        }
    }
}
