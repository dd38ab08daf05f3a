//! Source enumeration.
//!
//! Walks the parent chains of the registered providers and turns their declared
//! paths into a deduplicated set of [`SourceEntry`] values.

use crate::config::CatalogConfig;
use classcope_api::{DiagnosticSink, RuntimeLocator, ScopeLevel, SourceEntry, SourceProvider};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

const TAG: &str = "SourceEnumerator";

/// Provider backed by a fixed list of paths.
pub struct PathProvider {
    name: String,
    paths: Option<Vec<PathBuf>>,
    parent: Option<Arc<dyn SourceProvider>>,
}

impl PathProvider {
    pub fn new(name: impl Into<String>, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            name: name.into(),
            paths: Some(paths.into_iter().map(Into::into).collect()),
            parent: None,
        }
    }

    /// A provider that declares no paths of its own, only a parent link.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: None,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Arc<dyn SourceProvider>) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl SourceProvider for PathProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_paths(&self) -> Option<Vec<PathBuf>> {
        self.paths.clone()
    }

    fn parent(&self) -> Option<Arc<dyn SourceProvider>> {
        self.parent.clone()
    }
}

pub struct SourceEnumerator<'a> {
    config: &'a CatalogConfig,
    runtime_locator: Option<&'a dyn RuntimeLocator>,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> SourceEnumerator<'a> {
    pub fn new(
        config: &'a CatalogConfig,
        runtime_locator: Option<&'a dyn RuntimeLocator>,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            config,
            runtime_locator,
            sink,
        }
    }

    /// Collect the sources visible from `providers` for a scan at `scope`.
    ///
    /// Never fails: a missing runtime base is simply absent from the result.
    pub fn enumerate(
        &self,
        providers: &[Arc<dyn SourceProvider>],
        scope: ScopeLevel,
    ) -> IndexSet<SourceEntry> {
        self.sink.debug(TAG, "Parsing source providers");
        let mut entries = IndexSet::new();

        for provider in flatten_chains(providers) {
            let Some(paths) = provider.source_paths() else {
                self.sink
                    .debug(TAG, &format!("Provider {} declares no paths", provider.name()));
                continue;
            };
            self.sink.debug(
                TAG,
                &format!("Found {} paths in {}", paths.len(), provider.name()),
            );
            for path in paths {
                entries.insert(self.classify(path));
            }
        }

        if scope == ScopeLevel::MAX {
            match self.runtime_base() {
                Some(path) => {
                    self.sink
                        .debug(TAG, &format!("Runtime base located at {}", path.display()));
                    entries.insert(self.classify(path));
                }
                None => self.sink.debug(TAG, "Runtime base not found, omitting"),
            }
        }

        self.sink
            .info(TAG, &format!("Final source list: {} entries", entries.len()));
        entries
    }

    fn classify(&self, path: PathBuf) -> SourceEntry {
        // Drops trailing separators and `.` segments so spellings of one path dedupe
        let path: PathBuf = path.components().collect();
        let is_archive = self.config.is_archive(&path);
        let is_system = self.config.is_system(&path);
        SourceEntry::new(path, is_archive, is_system)
    }

    fn runtime_base(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config.runtime_base {
            if path.exists() {
                return Some(path.clone());
            }
            self.sink.debug(
                TAG,
                &format!("Configured runtime base {} does not exist", path.display()),
            );
        }
        self.runtime_locator.and_then(|locator| locator.locate())
    }
}

/// Flatten every provider's parent chain into one ordered list.
///
/// A provider reachable from several chains (or from itself) is visited once.
fn flatten_chains(providers: &[Arc<dyn SourceProvider>]) -> Vec<Arc<dyn SourceProvider>> {
    let mut visited = HashSet::new();
    let mut ordered = Vec::new();

    for provider in providers {
        let mut current = Some(provider.clone());
        while let Some(node) = current {
            if !visited.insert(Arc::as_ptr(&node) as *const () as usize) {
                break;
            }
            current = node.parent();
            ordered.push(node);
        }
    }

    ordered
}
