use super::{EntrySource, RawItem, qualified_name_from_entry};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Record files below a root directory, collected at open time.
pub struct DirectorySource {
    files: std::vec::IntoIter<(String, PathBuf)>,
}

impl EntrySource for DirectorySource {
    const KIND: &'static str = "DirectoryExtractor";

    fn open(root: &Path, config: &CatalogConfig) -> Result<Self> {
        // Surface an unreadable or non-directory root before walking it
        std::fs::read_dir(root).map_err(|e| CatalogError::source_unavailable(root, e))?;

        let files: Vec<(String, PathBuf)> = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let relative = e.path().strip_prefix(root).ok()?;
                let relative = relative.to_string_lossy().replace('\\', "/");
                if !config.is_record_entry(&relative) {
                    return None;
                }
                Some((relative, e.into_path()))
            })
            .collect();

        Ok(Self {
            files: files.into_iter(),
        })
    }

    fn next_raw(&mut self, config: &CatalogConfig) -> RawItem {
        let Some((relative, path)) = self.files.next() else {
            return RawItem::End;
        };

        match std::fs::read(&path) {
            Ok(bytes) => RawItem::Entry {
                qualified_name: qualified_name_from_entry(&relative, &config.record_suffix),
                bytes,
            },
            Err(e) => RawItem::Skipped {
                entry: path.display().to_string(),
                reason: e.to_string(),
            },
        }
    }
}
