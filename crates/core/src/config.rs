//! Catalog configuration.
//!
//! Defaults match a conventional JVM layout. A configuration can be loaded from
//! a JSON file and then overlaid with `CLASSCOPE_*` environment variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PRELOAD_LIMIT: &str = "CLASSCOPE_PRELOAD_LIMIT";
pub const ENV_RUNTIME_BASE: &str = "CLASSCOPE_RUNTIME_BASE";
pub const ENV_SYSTEM_MARKERS: &str = "CLASSCOPE_SYSTEM_MARKERS";
pub const ENV_ARCHIVE_SUFFIXES: &str = "CLASSCOPE_ARCHIVE_SUFFIXES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Records pulled eagerly from each source before draining it
    pub preload_limit: usize,
    /// Path fragments marking a platform library
    pub system_markers: Vec<String>,
    /// File-name suffixes marking an archive source
    pub archive_suffixes: Vec<String>,
    /// Suffix of entries that hold a compiled record
    pub record_suffix: String,
    /// Entries whose name contains this marker are nested/synthetic and skipped
    pub synthetic_marker: String,
    /// Explicit runtime-base source, checked before any locator
    pub runtime_base: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            preload_limit: 500,
            system_markers: vec!["/lib/ext".to_string()],
            archive_suffixes: vec![".jar".to_string()],
            record_suffix: ".class".to_string(),
            synthetic_marker: "$".to_string(),
            runtime_base: None,
        }
    }
}

impl CatalogConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, keyed by the `CLASSCOPE_*` variable names.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_PRELOAD_LIMIT) {
            self.preload_limit = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PRELOAD_LIMIT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_RUNTIME_BASE) {
            if !value.trim().is_empty() {
                self.runtime_base = Some(PathBuf::from(value.trim()));
            }
        }
        if let Some(value) = lookup(ENV_SYSTEM_MARKERS) {
            self.system_markers = split_list(&value);
        }
        if let Some(value) = lookup(ENV_ARCHIVE_SUFFIXES) {
            self.archive_suffixes = split_list(&value);
        }
        Ok(self)
    }

    /// Suffixes match case-insensitively, so `Dep.JAR` is an archive too.
    pub fn is_archive(&self, path: &Path) -> bool {
        let name = path.to_string_lossy().to_ascii_lowercase();
        self.archive_suffixes
            .iter()
            .any(|suffix| name.ends_with(&suffix.to_ascii_lowercase()))
    }

    pub fn is_system(&self, path: &Path) -> bool {
        let name = path.to_string_lossy().replace('\\', "/");
        self.system_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }

    /// True if an entry name denotes a top-level compiled record.
    pub fn is_record_entry(&self, name: &str) -> bool {
        let Some(stem) = name.strip_suffix(self.record_suffix.as_str()) else {
            return false;
        };
        if !self.synthetic_marker.is_empty() && stem.contains(self.synthetic_marker.as_str()) {
            return false;
        }
        // module-info / package-info and other non-identifier stems
        let simple = stem.rsplit(['/', '\\']).next().unwrap_or(stem);
        !simple.is_empty() && !simple.contains('-')
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
