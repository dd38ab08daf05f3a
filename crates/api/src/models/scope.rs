use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scan breadth, ordered from the narrowest to the widest.
///
/// A wider scope includes everything a narrower one does. Inclusion is decided
/// by comparing [`rank`](ScopeLevel::rank) and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Project-local record directories
    Local = 1,
    /// Dependency archives
    Dependencies = 2,
    /// Platform extension libraries
    PlatformLibraries = 3,
    /// The runtime base image itself
    RuntimeBase = 4,
}

impl ScopeLevel {
    pub const ALL: [ScopeLevel; 4] = [
        ScopeLevel::Local,
        ScopeLevel::Dependencies,
        ScopeLevel::PlatformLibraries,
        ScopeLevel::RuntimeBase,
    ];

    pub const MAX: ScopeLevel = ScopeLevel::RuntimeBase;

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// True if a scan at `self` covers everything a scan at `other` covers.
    pub fn includes(self, other: ScopeLevel) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeLevel::Local => "local",
            ScopeLevel::Dependencies => "dependencies",
            ScopeLevel::PlatformLibraries => "platform",
            ScopeLevel::RuntimeBase => "runtime",
        }
    }
}

impl PartialOrd for ScopeLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScopeLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "project" | "1" => Ok(ScopeLevel::Local),
            "dependencies" | "deps" | "2" => Ok(ScopeLevel::Dependencies),
            "platform" | "platform_libraries" | "system" | "3" => {
                Ok(ScopeLevel::PlatformLibraries)
            }
            "runtime" | "runtime_base" | "jre" | "4" => Ok(ScopeLevel::RuntimeBase),
            other => Err(format!(
                "unknown scope '{other}', expected one of: local, dependencies, platform, runtime"
            )),
        }
    }
}
