use std::path::PathBuf;
use std::sync::Arc;

/// Supplier of raw source paths, chained to an optional parent.
pub trait SourceProvider: Send + Sync {
    /// Name for diagnostics
    fn name(&self) -> &str;

    /// Declared source paths, or `None` if this provider is not path-bearing.
    fn source_paths(&self) -> Option<Vec<PathBuf>>;

    fn parent(&self) -> Option<Arc<dyn SourceProvider>>;
}

/// Locates the runtime base source added at the widest scope.
pub trait RuntimeLocator: Send + Sync {
    fn locate(&self) -> Option<PathBuf>;
}
