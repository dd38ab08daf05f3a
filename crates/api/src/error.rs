use std::path::PathBuf;

/// Errors raised by the catalog.
///
/// `SourceUnavailable` and `NotResolvable` are absorbed inside a scan and only
/// reach the diagnostic sink; the remaining variants are caller misuse and are
/// returned directly.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Source unavailable: {}: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("Not resolvable: {name}: {reason}")]
    NotResolvable { name: String, reason: String },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),
    #[error("Resolution context already registered: {0}")]
    DuplicateContext(String),
    #[error("Resolution context not found: {0}")]
    ContextNotFound(String),
}

impl CatalogError {
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CatalogError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_resolvable(name: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::NotResolvable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
