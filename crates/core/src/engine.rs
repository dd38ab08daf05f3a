//! Discovery engine façade.
//!
//! Every query first makes sure the catalog covers the engine's scope, then
//! answers from the published snapshot without holding any lock.

use crate::catalog::{Catalog, CatalogSnapshot};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::scanner::{ScanReport, Scanner};
use crate::source::SourceEnumerator;
use classcope_api::{
    DiagnosticSink, Record, ResolutionContext, RuntimeLocator, ScopeLevel, SourceProvider,
    TracingSink,
};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

const TAG: &str = "DiscoveryEngine";

/// Result of [`DiscoveryEngine::ensure_scanned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The published catalog already covered the requested scope.
    Cached,
    Rescanned(ScanReport),
}

impl ScanOutcome {
    pub fn is_rescan(&self) -> bool {
        matches!(self, ScanOutcome::Rescanned(_))
    }
}

pub struct DiscoveryEngineBuilder {
    scope: ScopeLevel,
    catalog: Option<Arc<Catalog>>,
    config: CatalogConfig,
    providers: Vec<Arc<dyn SourceProvider>>,
    contexts: Vec<Arc<dyn ResolutionContext>>,
    runtime_locator: Option<Arc<dyn RuntimeLocator>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl DiscoveryEngineBuilder {
    pub fn new(scope: ScopeLevel) -> Self {
        Self {
            scope,
            catalog: None,
            config: CatalogConfig::default(),
            providers: Vec::new(),
            contexts: Vec::new(),
            runtime_locator: None,
            sink: Arc::new(TracingSink),
        }
    }

    /// Share a catalog between engines. Without it the engine gets its own.
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn SourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_providers(
        mut self,
        providers: impl IntoIterator<Item = Arc<dyn SourceProvider>>,
    ) -> Self {
        self.providers.extend(providers);
        self
    }

    pub fn with_context(mut self, context: Arc<dyn ResolutionContext>) -> Self {
        self.contexts.push(context);
        self
    }

    pub fn with_runtime_locator(mut self, locator: Arc<dyn RuntimeLocator>) -> Self {
        self.runtime_locator = Some(locator);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fails with [`CatalogError::DuplicateContext`] if two contexts share an id.
    pub fn build(self) -> Result<DiscoveryEngine> {
        let engine = DiscoveryEngine {
            scope: self.scope,
            catalog: self.catalog.unwrap_or_default(),
            config: self.config,
            providers: self.providers,
            contexts: RwLock::new(Vec::new()),
            runtime_locator: self.runtime_locator,
            sink: self.sink,
            scanning: AtomicBool::new(false),
        };
        for context in self.contexts {
            engine.add_context(context)?;
        }
        Ok(engine)
    }
}

pub struct DiscoveryEngine {
    /// Scope every query is answered at
    scope: ScopeLevel,
    catalog: Arc<Catalog>,
    config: CatalogConfig,
    providers: Vec<Arc<dyn SourceProvider>>,
    /// Resolution contexts in registration order
    contexts: RwLock<Vec<Arc<dyn ResolutionContext>>>,
    runtime_locator: Option<Arc<dyn RuntimeLocator>>,
    sink: Arc<dyn DiagnosticSink>,
    scanning: AtomicBool,
}

/// Marks a rescan as running; cleared on drop, including on unwind.
struct ScanGuard<'a> {
    engine: &'a DiscoveryEngine,
}

impl<'a> ScanGuard<'a> {
    fn start(engine: &'a DiscoveryEngine) -> Self {
        engine.scanning.store(true, AtomicOrdering::SeqCst);
        Self { engine }
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.engine.scanning.store(false, AtomicOrdering::SeqCst);
    }
}

impl DiscoveryEngine {
    pub fn builder(scope: ScopeLevel) -> DiscoveryEngineBuilder {
        DiscoveryEngineBuilder::new(scope)
    }

    pub fn scope(&self) -> ScopeLevel {
        self.scope
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn cached_scope(&self) -> Option<ScopeLevel> {
        self.catalog.cached_scope()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(AtomicOrdering::SeqCst)
    }

    /// Rescan unless the published catalog already covers `scope`.
    ///
    /// Concurrent callers serialise on the catalog lock and re-check after
    /// acquiring it, so a burst of identical requests triggers one rescan. A
    /// call made from inside a running rescan of the same catalog (e.g. by a
    /// resolution context, through this or any engine sharing the catalog) is
    /// answered from the current snapshot.
    pub fn ensure_scanned(&self, scope: ScopeLevel) -> ScanOutcome {
        if !self.catalog.needs_scan(scope) {
            return ScanOutcome::Cached;
        }
        if self.catalog.is_scan_owner() {
            self.sink
                .debug(TAG, "Re-entrant scan request ignored, serving current catalog");
            return ScanOutcome::Cached;
        }

        let _lock = self.catalog.lock();
        if !self.catalog.needs_scan(scope) {
            return ScanOutcome::Cached;
        }

        let _guard = ScanGuard::start(self);
        self.sink.info(
            TAG,
            &format!(
                "Rescanning at scope {scope} (cached: {})",
                self.cached_scope()
                    .map_or_else(|| "none".to_string(), |s| s.to_string())
            ),
        );

        let contexts = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let sources = SourceEnumerator::new(
            &self.config,
            self.runtime_locator.as_deref(),
            self.sink.as_ref(),
        )
        .enumerate(&self.providers, scope);

        let (records, report) =
            Scanner::new(&self.config, self.sink.clone(), contexts).scan(&sources, scope);
        let snapshot = self.catalog.publish(records, scope);

        self.sink.info(
            TAG,
            &format!(
                "Published {} records at scope {scope} in {:?}",
                snapshot.repository.len(),
                report.elapsed
            ),
        );
        ScanOutcome::Rescanned(report)
    }

    pub fn add_context(&self, context: Arc<dyn ResolutionContext>) -> Result<()> {
        let mut contexts = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_scanning() {
            return Err(CatalogError::InvalidState(format!(
                "cannot add context {} while a scan is in progress",
                context.id()
            )));
        }
        if contexts.iter().any(|c| c.id() == context.id()) {
            return Err(CatalogError::DuplicateContext(context.id().to_string()));
        }
        self.sink
            .debug(TAG, &format!("Registered resolution context {}", context.id()));
        contexts.push(context);
        Ok(())
    }

    pub fn remove_context(&self, id: &str) -> Result<Arc<dyn ResolutionContext>> {
        let mut contexts = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_scanning() {
            return Err(CatalogError::InvalidState(format!(
                "cannot remove context {id} while a scan is in progress"
            )));
        }
        let idx = contexts
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| CatalogError::ContextNotFound(id.to_string()))?;
        Ok(contexts.remove(idx))
    }

    pub fn context_ids(&self) -> Vec<String> {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    // ---- Queries ----

    /// Current snapshot, scanned to at least the engine's scope.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.ensure_scanned(self.scope);
        self.catalog.snapshot()
    }

    /// Every record, in discovery order.
    pub fn all(&self) -> Vec<Arc<Record>> {
        self.snapshot().repository.records().to_vec()
    }

    pub fn all_sorted_by<F>(&self, mut compare: F) -> Vec<Arc<Record>>
    where
        F: FnMut(&Record, &Record) -> Ordering,
    {
        let mut records = self.all();
        records.sort_by(|a, b| compare(a, b));
        records
    }

    pub fn annotated_by(&self, marker: &str) -> Vec<Arc<Record>> {
        self.snapshot().repository.records_annotated_with(marker)
    }

    pub fn subtypes_of(&self, type_name: &str) -> Vec<Arc<Record>> {
        self.snapshot().repository.subtypes_of(type_name)
    }

    pub fn supertype_of(&self, type_name: &str) -> Option<Arc<Record>> {
        self.snapshot().repository.direct_supertype_of(type_name)
    }

    pub fn interfaces(&self) -> Vec<Arc<Record>> {
        self.snapshot().repository.all_interfaces()
    }

    pub fn abstract_types(&self) -> Vec<Arc<Record>> {
        self.snapshot().repository.all_abstract()
    }

    pub fn find(&self, qualified_name: &str) -> Option<Arc<Record>> {
        self.snapshot().repository.lookup_by_full_name(qualified_name)
    }

    pub fn find_by_simple_name(&self, simple_name: &str) -> Vec<Arc<Record>> {
        self.snapshot().repository.lookup_by_simple_name(simple_name)
    }

    pub fn in_namespace(&self, namespace: &str) -> Result<Vec<Arc<Record>>> {
        self.snapshot().namespaces.records_directly_in(namespace)
    }

    pub fn in_namespace_tree(&self, namespace: &str) -> Result<Vec<Arc<Record>>> {
        self.snapshot().namespaces.records_in_subtree(namespace)
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.snapshot().namespaces.namespaces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StaticContext;
    use crate::source::PathProvider;
    use classcope_api::SilentSink;
    use std::path::Path;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn engine(root: &Path, scope: ScopeLevel) -> DiscoveryEngine {
        touch(root, "a/Base.class");
        touch(root, "a/Impl.class");
        let context = StaticContext::new("static").with_records([
            Record::new("a.Base").as_abstract(),
            Record::new("a.Impl").with_supertype("a.Base"),
        ]);
        DiscoveryEngine::builder(scope)
            .with_provider(Arc::new(PathProvider::new("app", [root])))
            .with_context(Arc::new(context))
            .with_sink(Arc::new(SilentSink))
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_query_triggers_scan() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), ScopeLevel::Local);

        assert_eq!(engine.cached_scope(), None);
        assert_eq!(engine.all().len(), 2);
        assert_eq!(engine.cached_scope(), Some(ScopeLevel::Local));
        assert_eq!(engine.supertype_of("a.Impl").unwrap().qualified_name, "a.Base");
        assert_eq!(engine.abstract_types().len(), 1);
        assert!(!engine.is_scanning());
    }

    #[test]
    fn test_scope_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), ScopeLevel::Local);

        assert!(engine.ensure_scanned(ScopeLevel::Dependencies).is_rescan());
        assert_eq!(engine.ensure_scanned(ScopeLevel::Local), ScanOutcome::Cached);
        assert_eq!(engine.ensure_scanned(ScopeLevel::Dependencies), ScanOutcome::Cached);
        assert_eq!(engine.cached_scope(), Some(ScopeLevel::Dependencies));

        assert!(engine.ensure_scanned(ScopeLevel::RuntimeBase).is_rescan());
        assert_eq!(engine.cached_scope(), Some(ScopeLevel::RuntimeBase));
    }

    #[test]
    fn test_context_registration_misuse() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), ScopeLevel::Local);

        let err = engine
            .add_context(Arc::new(StaticContext::new("static")))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateContext(ref id) if id == "static"));

        assert!(matches!(
            engine.remove_context("missing"),
            Err(CatalogError::ContextNotFound(_))
        ));

        engine.add_context(Arc::new(StaticContext::new("extra"))).unwrap();
        assert_eq!(engine.context_ids(), vec!["static", "extra"]);
        engine.remove_context("static").unwrap();
        assert_eq!(engine.context_ids(), vec!["extra"]);
    }

    #[test]
    fn test_builder_rejects_duplicate_contexts() {
        let result = DiscoveryEngine::builder(ScopeLevel::Local)
            .with_context(Arc::new(StaticContext::new("dup")))
            .with_context(Arc::new(StaticContext::new("dup")))
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicateContext(_))));
    }

    #[test]
    fn test_engines_sharing_a_catalog_share_its_scope() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(Catalog::new());
        touch(dir.path(), "a/Base.class");
        let build = || {
            DiscoveryEngine::builder(ScopeLevel::Local)
                .with_catalog(catalog.clone())
                .with_provider(Arc::new(PathProvider::new("app", [dir.path()])))
                .with_context(Arc::new(
                    StaticContext::new("static").with_record(Record::new("a.Base")),
                ))
                .with_sink(Arc::new(SilentSink))
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();

        assert!(first.ensure_scanned(ScopeLevel::Local).is_rescan());
        assert_eq!(second.ensure_scanned(ScopeLevel::Local), ScanOutcome::Cached);
        assert!(second.find("a.Base").is_some());
    }
}
