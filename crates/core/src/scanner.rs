//! Per-source scan loop.
//!
//! Drives one extractor per enumerated source and collects the records in
//! source order. Failures stay local to the source (or entry) that caused them.

use crate::config::CatalogConfig;
use crate::extract::{ArchiveExtractor, DirectoryExtractor, Extracted, RecordExtractor};
use classcope_api::{DiagnosticSink, Record, ResolutionContext, ScopeLevel, SourceEntry};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TAG: &str = "Scanner";

/// Summary of one rescan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Scope the scan was run for
    pub scope: Option<ScopeLevel>,
    /// Sources produced by enumeration
    pub sources: usize,
    /// Sources opened and drained
    pub scanned: usize,
    /// Sources outside the requested scope
    pub excluded: usize,
    /// Sources that could not be opened
    pub failed: usize,
    /// Records extracted, before duplicate names collapse
    pub records: usize,
    /// Entries that could not be read or resolved
    pub skipped_entries: usize,
    pub elapsed: Duration,
}

pub struct Scanner<'a> {
    config: &'a CatalogConfig,
    sink: Arc<dyn DiagnosticSink>,
    contexts: Vec<Arc<dyn ResolutionContext>>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        config: &'a CatalogConfig,
        sink: Arc<dyn DiagnosticSink>,
        contexts: Vec<Arc<dyn ResolutionContext>>,
    ) -> Self {
        Self {
            config,
            sink,
            contexts,
        }
    }

    /// Extract every record from the `sources` that `scope` covers.
    pub fn scan<'s>(
        &self,
        sources: impl IntoIterator<Item = &'s SourceEntry>,
        scope: ScopeLevel,
    ) -> (Vec<Record>, ScanReport) {
        let start = Instant::now();
        let mut report = ScanReport {
            scope: Some(scope),
            ..Default::default()
        };
        let mut records = Vec::new();

        let mut directories = DirectoryExtractor::new(self.config.clone(), self.sink.clone());
        let mut archives = ArchiveExtractor::new(self.config.clone(), self.sink.clone());
        directories.use_contexts(self.contexts.clone());
        archives.use_contexts(self.contexts.clone());

        for source in sources {
            report.sources += 1;

            if !scope.includes(source.required_scope()) {
                self.sink.debug(
                    TAG,
                    &format!(
                        "Excluding {} {} (needs scope {})",
                        source.kind(),
                        source.path.display(),
                        source.required_scope()
                    ),
                );
                report.excluded += 1;
                continue;
            }

            let extractor: &mut dyn RecordExtractor = if source.is_archive {
                &mut archives
            } else {
                &mut directories
            };

            if let Err(err) = extractor.open(&source.path) {
                self.sink.error(TAG, "Failed to open source", &err);
                report.failed += 1;
                continue;
            }

            let before = records.len();
            extractor.preload(self.config.preload_limit);
            loop {
                match extractor.next() {
                    Extracted::Record(record) => records.push(record),
                    Extracted::Skipped { .. } => {}
                    Extracted::End => break,
                }
            }
            report.skipped_entries += extractor.skipped();
            extractor.close();

            report.scanned += 1;
            self.sink.debug(
                TAG,
                &format!(
                    "Extracted {} records from {}",
                    records.len() - before,
                    source.path.display()
                ),
            );
        }

        report.records = records.len();
        report.elapsed = start.elapsed();
        self.sink.info(
            TAG,
            &format!(
                "Scan complete: {} sources, {} scanned, {} excluded, {} failed, {} records in {:?}",
                report.sources,
                report.scanned,
                report.excluded,
                report.failed,
                report.records,
                report.elapsed
            ),
        );

        (records, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StaticContext;
    use classcope_api::SilentSink;
    use std::path::Path;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn scanner<'a>(config: &'a CatalogConfig, names: &[&str]) -> Scanner<'a> {
        let context = StaticContext::new("static")
            .with_records(names.iter().copied().map(Record::new));
        Scanner::new(config, Arc::new(SilentSink), vec![Arc::new(context)])
    }

    #[test]
    fn test_failing_source_does_not_abort_scan() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let third = dir.path().join("third");
        touch(&first, "a/One.class");
        touch(&third, "c/Three.class");

        let sources = [
            SourceEntry::new(&first, false, false),
            SourceEntry::new(dir.path().join("missing"), false, false),
            SourceEntry::new(&third, false, false),
        ];
        let config = CatalogConfig::default();
        let (records, report) = scanner(&config, &["a.One", "c.Three"]).scan(&sources, ScopeLevel::Local);

        let names: Vec<_> = records.iter().map(|r| r.qualified_name.as_str()).collect();
        assert_eq!(names, vec!["a.One", "c.Three"]);
        assert_eq!(report.sources, 3);
        assert_eq!(report.scanned, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.records, 2);
    }

    #[test]
    fn test_sources_outside_scope_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/One.class");

        let sources = [
            SourceEntry::new(dir.path(), false, false),
            SourceEntry::new("/jdk/lib/ext/nashorn.jar", true, true),
            SourceEntry::new("/repo/dep.jar", true, false),
        ];
        let config = CatalogConfig::default();
        let (records, report) = scanner(&config, &["a.One"]).scan(&sources, ScopeLevel::Local);

        assert_eq!(records.len(), 1);
        assert_eq!(report.excluded, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_unresolvable_entries_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/One.class");
        touch(dir.path(), "a/Two.class");

        let sources = [SourceEntry::new(dir.path(), false, false)];
        let config = CatalogConfig {
            preload_limit: 1,
            ..Default::default()
        };
        let (records, report) = scanner(&config, &["a.Two"]).scan(&sources, ScopeLevel::Local);

        assert_eq!(records.len(), 1);
        assert_eq!(report.skipped_entries, 1);
        assert_eq!(report.scope, Some(ScopeLevel::Local));
    }
}
