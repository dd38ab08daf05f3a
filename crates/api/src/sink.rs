//! Diagnostic sinks.
//!
//! The engine reports scan progress through a [`DiagnosticSink`] rather than
//! calling a logger directly, so embedders can redirect or drop diagnostics.

use std::error::Error;

pub trait DiagnosticSink: Send + Sync {
    fn info(&self, tag: &str, message: &str);
    fn debug(&self, tag: &str, message: &str);
    fn error(&self, tag: &str, message: &str, cause: &dyn Error);
}

/// Forwards diagnostics to `tracing`, with the tag as a structured field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, tag: &str, message: &str) {
        tracing::info!(tag, "{}", message);
    }

    fn debug(&self, tag: &str, message: &str) {
        tracing::debug!(tag, "{}", message);
    }

    fn error(&self, tag: &str, message: &str, cause: &dyn Error) {
        tracing::error!(tag, error = %cause, "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn info(&self, _tag: &str, _message: &str) {}

    fn debug(&self, _tag: &str, _message: &str) {}

    fn error(&self, _tag: &str, _message: &str, _cause: &dyn Error) {}
}
