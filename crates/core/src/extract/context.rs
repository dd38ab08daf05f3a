use crate::error::{CatalogError, Result};
use classcope_api::{RawEntry, Record, ResolutionContext};
use std::collections::HashMap;

/// Resolution context backed by an in-memory table of known records.
///
/// Entry bytes are ignored; an entry resolves iff its qualified name is known.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    id: String,
    records: HashMap<String, Record>,
}

impl StaticContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: HashMap::new(),
        }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.insert(record);
        self
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        for record in records {
            self.insert(record);
        }
        self
    }

    pub fn insert(&mut self, record: Record) {
        self.records.insert(record.qualified_name.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResolutionContext for StaticContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn resolve(&self, entry: &RawEntry<'_>) -> Result<Record> {
        self.records
            .get(entry.qualified_name)
            .cloned()
            .ok_or_else(|| CatalogError::not_resolvable(entry.qualified_name, "unknown name"))
    }
}
