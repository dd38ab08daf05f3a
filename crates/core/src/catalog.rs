//! Published catalog state.
//!
//! Readers take cheap snapshots (an `Arc` clone); a rescan builds the next
//! repository and namespace graph off to the side and swaps them in together
//! with the scope they were built for.

use crate::namespace::NamespaceGraph;
use crate::repository::Repository;
use classcope_api::{Record, ScopeLevel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

/// One published version of the catalog.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    /// Deepest scope covered, `None` before the first scan
    pub scope: Option<ScopeLevel>,
    pub repository: Repository,
    pub namespaces: NamespaceGraph,
}

impl CatalogSnapshot {
    pub fn build(records: Vec<Record>, scope: ScopeLevel) -> Self {
        let repository = Repository::build(records);
        let namespaces = NamespaceGraph::build(repository.records());
        Self {
            scope: Some(scope),
            repository,
            namespaces,
        }
    }

    /// True if this snapshot does not cover `scope`.
    pub fn needs_scan(&self, scope: ScopeLevel) -> bool {
        self.scope.is_none_or(|cached| !cached.includes(scope))
    }
}

/// Shared catalog: the current snapshot plus the lock serialising rescans.
#[derive(Debug, Default)]
pub struct Catalog {
    current: RwLock<Arc<CatalogSnapshot>>,
    scan_lock: Mutex<()>,
    /// Thread holding `scan_lock`, shared by every engine on this catalog
    scan_owner: Mutex<Option<ThreadId>>,
}

/// Exclusive right to rescan a [`Catalog`]. Records the holding thread so
/// nested requests from that thread can be told apart from real contention.
pub struct ScanLock<'a> {
    catalog: &'a Catalog,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for ScanLock<'_> {
    fn drop(&mut self) {
        // Runs before `_guard` is released
        *self
            .catalog
            .scan_owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cached_scope(&self) -> Option<ScopeLevel> {
        self.snapshot().scope
    }

    pub fn needs_scan(&self, scope: ScopeLevel) -> bool {
        self.snapshot().needs_scan(scope)
    }

    /// Build indices over `records` and make them current in one step.
    pub fn publish(&self, records: Vec<Record>, scope: ScopeLevel) -> Arc<CatalogSnapshot> {
        let next = Arc::new(CatalogSnapshot::build(records, scope));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }

    /// Held for the whole duration of a rescan.
    ///
    /// Not re-entrant: callers check [`Catalog::is_scan_owner`] first, since
    /// locking again from the owning thread blocks forever.
    pub fn lock(&self) -> ScanLock<'_> {
        let guard = self.scan_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self
            .scan_owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
        ScanLock {
            catalog: self,
            _guard: guard,
        }
    }

    /// True if the calling thread currently holds the scan lock.
    pub fn is_scan_owner(&self) -> bool {
        *self
            .scan_owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }
}
