//! Record-resolution contexts.
//!
//! A context turns one raw source entry into a [`Record`]. Extractors try every
//! registered context in registration order and keep the first success.

use crate::error::Result;
use crate::models::Record;
use std::path::Path;

/// A raw entry handed to resolution contexts by an extractor.
#[derive(Debug, Clone, Copy)]
pub struct RawEntry<'a> {
    /// Qualified name derived from the entry's location
    pub qualified_name: &'a str,
    /// Source the entry was read from (archive file or directory root)
    pub origin: &'a Path,
    /// Entry contents
    pub bytes: &'a [u8],
}

pub trait ResolutionContext: Send + Sync {
    /// Stable identifier, used to detect duplicate registration.
    fn id(&self) -> &str;

    /// Resolve the entry, failing with [`CatalogError::NotResolvable`](crate::CatalogError::NotResolvable).
    fn resolve(&self, entry: &RawEntry<'_>) -> Result<Record>;
}
