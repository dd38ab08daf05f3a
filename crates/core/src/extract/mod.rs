//! Record extraction.
//!
//! An extractor walks the entries of one source and resolves each through the
//! registered [`ResolutionContext`]s. Entry enumeration is backend specific
//! ([`DirectorySource`], [`ArchiveSource`]); buffering and resolution are shared
//! by [`Extractor`].

mod archive;
mod context;
mod directory;

pub use archive::ArchiveSource;
pub use context::StaticContext;
pub use directory::DirectorySource;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use classcope_api::{DiagnosticSink, RawEntry, Record, ResolutionContext};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of one pull from an extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Record(Record),
    /// The entry could not be turned into a record; callers move on.
    Skipped { entry: String, reason: String },
    /// The source is exhausted.
    End,
}

/// Common contract of the record extractors.
pub trait RecordExtractor: Send {
    /// Replace the resolution contexts used for subsequent entries.
    fn use_contexts(&mut self, contexts: Vec<Arc<dyn ResolutionContext>>);

    /// Open `path`, discarding any state from a previous source.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Buffer up to `max` records ahead of iteration; returns how many were buffered.
    fn preload(&mut self, max: usize) -> usize;

    /// Buffered records first, then lazily pulled ones.
    fn next(&mut self) -> Extracted;

    /// Release the underlying handles. Idempotent.
    fn close(&mut self);

    /// True once at least one resolution context is available.
    fn ready(&self) -> bool;

    /// Entries skipped since the last `open`, including those passed over by `preload`.
    fn skipped(&self) -> usize;
}

/// Entry produced by a backend before resolution.
#[derive(Debug)]
pub enum RawItem {
    Entry { qualified_name: String, bytes: Vec<u8> },
    Skipped { entry: String, reason: String },
    End,
}

/// Backend enumerating the record entries of one source.
pub trait EntrySource: Send + Sized {
    const KIND: &'static str;

    fn open(path: &Path, config: &CatalogConfig) -> Result<Self>;

    /// Next record entry; non-record entries are passed over silently.
    fn next_raw(&mut self, config: &CatalogConfig) -> RawItem;
}

pub type DirectoryExtractor = Extractor<DirectorySource>;
pub type ArchiveExtractor = Extractor<ArchiveSource>;

pub struct Extractor<S: EntrySource> {
    config: CatalogConfig,
    contexts: Vec<Arc<dyn ResolutionContext>>,
    sink: Arc<dyn DiagnosticSink>,
    origin: PathBuf,
    source: Option<S>,
    preloaded: VecDeque<Record>,
    skipped: usize,
}

impl<S: EntrySource> Extractor<S> {
    pub fn new(config: CatalogConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            config,
            contexts: Vec::new(),
            sink,
            origin: PathBuf::new(),
            source: None,
            preloaded: VecDeque::new(),
            skipped: 0,
        }
    }

    fn pull(&mut self) -> Extracted {
        let Some(source) = self.source.as_mut() else {
            return Extracted::End;
        };

        match source.next_raw(&self.config) {
            RawItem::End => Extracted::End,
            RawItem::Skipped { entry, reason } => {
                self.skipped += 1;
                self.sink
                    .debug(S::KIND, &format!("Skipping unreadable entry {entry}: {reason}"));
                Extracted::Skipped { entry, reason }
            }
            RawItem::Entry {
                qualified_name,
                bytes,
            } => {
                let raw = RawEntry {
                    qualified_name: &qualified_name,
                    origin: &self.origin,
                    bytes: &bytes,
                };
                match resolve_with(&self.contexts, &raw) {
                    Ok(record) => Extracted::Record(record),
                    Err(err) => {
                        self.skipped += 1;
                        self.sink.error(S::KIND, "Record not resolvable", &err);
                        Extracted::Skipped {
                            entry: qualified_name,
                            reason: err.to_string(),
                        }
                    }
                }
            }
        }
    }
}

impl<S: EntrySource> RecordExtractor for Extractor<S> {
    fn use_contexts(&mut self, contexts: Vec<Arc<dyn ResolutionContext>>) {
        self.sink.debug(
            S::KIND,
            &format!("Will be used {} resolution contexts", contexts.len()),
        );
        self.contexts = contexts;
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        self.close();
        self.sink
            .debug(S::KIND, &format!("Opening {}", path.display()));
        self.source = Some(S::open(path, &self.config)?);
        self.origin = path.to_path_buf();
        self.skipped = 0;
        Ok(())
    }

    fn preload(&mut self, max: usize) -> usize {
        let mut loaded = 0;
        while loaded < max {
            match self.pull() {
                Extracted::Record(record) => {
                    self.preloaded.push_back(record);
                    loaded += 1;
                }
                Extracted::Skipped { .. } => continue,
                Extracted::End => break,
            }
        }
        loaded
    }

    fn next(&mut self) -> Extracted {
        if let Some(record) = self.preloaded.pop_front() {
            return Extracted::Record(record);
        }
        self.pull()
    }

    fn close(&mut self) {
        self.source = None;
        self.preloaded.clear();
    }

    fn ready(&self) -> bool {
        !self.contexts.is_empty()
    }

    fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Try each context in order and keep the first record produced.
pub(crate) fn resolve_with(
    contexts: &[Arc<dyn ResolutionContext>],
    entry: &RawEntry<'_>,
) -> Result<Record> {
    let mut reasons = Vec::new();
    for context in contexts {
        match context.resolve(entry) {
            Ok(record) => return Ok(record),
            Err(err) => reasons.push(format!("{}: {}", context.id(), err)),
        }
    }
    if reasons.is_empty() {
        reasons.push("no resolution contexts registered".to_string());
    }
    Err(CatalogError::not_resolvable(
        entry.qualified_name,
        reasons.join("; "),
    ))
}

/// `a/b/C.class` → `a.b.C`
pub(crate) fn qualified_name_from_entry(name: &str, suffix: &str) -> String {
    let stem = name.strip_suffix(suffix).unwrap_or(name);
    stem.trim_start_matches(['/', '\\'])
        .replace(['/', '\\'], ".")
}
