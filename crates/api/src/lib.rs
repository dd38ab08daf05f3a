pub mod context;
pub mod error;
pub mod models;
pub mod provider;
pub mod sink;

// Re-export commonly used types
pub use context::{RawEntry, ResolutionContext};
pub use error::{CatalogError, Result};
pub use models::*;
pub use provider::{RuntimeLocator, SourceProvider};
pub use sink::{DiagnosticSink, SilentSink, TracingSink};
