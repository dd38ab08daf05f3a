use super::scope::ScopeLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One source location produced by an enumeration pass.
///
/// Entries are rebuilt on every rescan from the current providers and are
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub is_archive: bool,
    pub is_system: bool,
}

impl SourceEntry {
    pub fn new(path: impl Into<PathBuf>, is_archive: bool, is_system: bool) -> Self {
        Self {
            path: path.into(),
            is_archive,
            is_system,
        }
    }

    /// Narrowest scope whose scans include this source.
    pub fn required_scope(&self) -> ScopeLevel {
        if self.is_system {
            ScopeLevel::PlatformLibraries
        } else if self.is_archive {
            ScopeLevel::Dependencies
        } else {
            ScopeLevel::Local
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_archive { "archive" } else { "directory" }
    }
}
