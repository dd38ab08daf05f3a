use super::{EntrySource, RawItem, qualified_name_from_entry};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Upper bound on the buffer reserved up front for one entry. The declared
/// size comes from the archive header and is not trusted beyond this.
const MAX_PREALLOCATION: u64 = 1 << 20;

fn initial_capacity(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOCATION) as usize
}

/// Entries of a zip-format archive, visited in stored order.
pub struct ArchiveSource {
    archive: ZipArchive<File>,
    cursor: usize,
}

impl EntrySource for ArchiveSource {
    const KIND: &'static str = "ArchiveExtractor";

    fn open(path: &Path, _config: &CatalogConfig) -> Result<Self> {
        let file = File::open(path).map_err(|e| CatalogError::source_unavailable(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| CatalogError::source_unavailable(path, e))?;
        Ok(Self { archive, cursor: 0 })
    }

    fn next_raw(&mut self, config: &CatalogConfig) -> RawItem {
        while self.cursor < self.archive.len() {
            let index = self.cursor;
            self.cursor += 1;

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    return RawItem::Skipped {
                        entry: format!("#{index}"),
                        reason: e.to_string(),
                    };
                }
            };

            if entry.is_dir() || !config.is_record_entry(entry.name()) {
                continue;
            }

            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
            if let Err(e) = entry.read_to_end(&mut bytes) {
                return RawItem::Skipped {
                    entry: name,
                    reason: e.to_string(),
                };
            }

            return RawItem::Entry {
                qualified_name: qualified_name_from_entry(&name, &config.record_suffix),
                bytes,
            };
        }

        RawItem::End
    }
}
