pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod logging;
pub mod namespace;
pub mod repository;
pub mod scanner;
pub mod source;

pub use catalog::{Catalog, CatalogSnapshot, ScanLock};
pub use config::CatalogConfig;
pub use engine::{DiscoveryEngine, DiscoveryEngineBuilder, ScanOutcome};
pub use error::{CatalogError, Result};
pub use extract::{Extracted, RecordExtractor, StaticContext};
pub use namespace::NamespaceGraph;
pub use repository::Repository;
pub use scanner::ScanReport;
pub use source::{PathProvider, SourceEnumerator};
