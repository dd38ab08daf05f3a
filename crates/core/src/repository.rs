//! Record repository and its derived indices.
//!
//! A [`Repository`] is built in one pass from the records of a scan and is
//! never patched afterwards: a rescan builds a new one and the
//! [`Catalog`](crate::catalog::Catalog) swaps it in. Annotation and subtype
//! lookups are answered by a linear scan on first use and memoised per key for
//! the lifetime of the repository.

use classcope_api::Record;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Position of a record in the repository's ordered sequence.
pub type RecordRef = usize;

#[derive(Debug, Default)]
pub struct Repository {
    /// All records in discovery order
    records: Vec<Arc<Record>>,
    full_name_index: HashMap<String, RecordRef>,
    simple_name_index: HashMap<String, Vec<RecordRef>>,
    interface_index: BTreeSet<RecordRef>,
    abstract_index: BTreeSet<RecordRef>,
    /// Annotation marker -> annotated records (lazy)
    annotation_index: DashMap<String, Arc<[RecordRef]>>,
    /// Supertype name -> transitive subtypes (lazy)
    subtype_index: DashMap<String, Arc<[RecordRef]>>,
}

impl Repository {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a fresh index set from `records`.
    ///
    /// A later record with an already-seen qualified name replaces the earlier
    /// one in place, so the last source to declare a name wins.
    pub fn build(records: impl IntoIterator<Item = Record>) -> Self {
        let mut ordered: Vec<Arc<Record>> = Vec::new();
        let mut full_name_index: HashMap<String, RecordRef> = HashMap::new();

        for record in records {
            match full_name_index.get(&record.qualified_name) {
                Some(&idx) => ordered[idx] = Arc::new(record),
                None => {
                    full_name_index.insert(record.qualified_name.clone(), ordered.len());
                    ordered.push(Arc::new(record));
                }
            }
        }

        let mut simple_name_index: HashMap<String, Vec<RecordRef>> = HashMap::new();
        let mut interface_index = BTreeSet::new();
        let mut abstract_index = BTreeSet::new();

        for (idx, record) in ordered.iter().enumerate() {
            simple_name_index
                .entry(record.simple_name.clone())
                .or_default()
                .push(idx);
            if record.is_interface {
                interface_index.insert(idx);
            }
            if record.is_abstract {
                abstract_index.insert(idx);
            }
        }

        Self {
            records: ordered,
            full_name_index,
            simple_name_index,
            interface_index,
            abstract_index,
            annotation_index: DashMap::new(),
            subtype_index: DashMap::new(),
        }
    }

    // ---- Read-only accessors ----

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn get(&self, idx: RecordRef) -> Option<&Arc<Record>> {
        self.records.get(idx)
    }

    pub fn lookup_by_full_name(&self, qualified_name: &str) -> Option<Arc<Record>> {
        self.full_name_index
            .get(qualified_name)
            .map(|&idx| self.records[idx].clone())
    }

    pub fn lookup_by_simple_name(&self, simple_name: &str) -> Vec<Arc<Record>> {
        self.simple_name_index
            .get(simple_name)
            .map(|refs| self.materialize(refs))
            .unwrap_or_default()
    }

    pub fn all_interfaces(&self) -> Vec<Arc<Record>> {
        self.interface_index
            .iter()
            .map(|&idx| self.records[idx].clone())
            .collect()
    }

    pub fn all_abstract(&self) -> Vec<Arc<Record>> {
        self.abstract_index
            .iter()
            .map(|&idx| self.records[idx].clone())
            .collect()
    }

    /// Records carrying `marker`, excluding the marker type itself.
    pub fn records_annotated_with(&self, marker: &str) -> Vec<Arc<Record>> {
        if let Some(refs) = self.annotation_index.get(marker) {
            return self.materialize(refs.value());
        }

        let refs: Arc<[RecordRef]> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.qualified_name != marker && r.is_annotated_with(marker))
            .map(|(idx, _)| idx)
            .collect();
        let result = self.materialize(&refs);
        self.annotation_index.insert(marker.to_string(), refs);
        result
    }

    /// Every record that extends or implements `type_name`, directly or not.
    pub fn subtypes_of(&self, type_name: &str) -> Vec<Arc<Record>> {
        self.materialize(&self.subtype_refs(type_name))
    }

    fn subtype_refs(&self, type_name: &str) -> Arc<[RecordRef]> {
        if let Some(refs) = self.subtype_index.get(type_name) {
            return refs.value().clone();
        }

        let refs: Arc<[RecordRef]> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.qualified_name != type_name && self.is_subtype(r, type_name))
            .map(|(idx, _)| idx)
            .collect();
        self.subtype_index
            .insert(type_name.to_string(), refs.clone());
        refs
    }

    /// The non-interface record that `type_name` directly extends.
    ///
    /// Memoised subtype lists are consulted first; otherwise every record is
    /// tested and the parent's subtype list is memoised as a side effect.
    /// Returns `None` when the type is unknown, has no indexed class parent, or
    /// only extends interfaces: with several super-interfaces there is no single
    /// answer, so none is guessed.
    pub fn direct_supertype_of(&self, type_name: &str) -> Option<Arc<Record>> {
        let &idx = self.full_name_index.get(type_name)?;
        let record = &self.records[idx];

        let cached = self.subtype_index.iter().find_map(|entry| {
            if !entry.value().contains(&idx) || !record.directly_extends(entry.key()) {
                return None;
            }
            self.lookup_by_full_name(entry.key())
                .filter(|parent| !parent.is_interface)
        });
        if cached.is_some() {
            return cached;
        }

        let parent = self
            .records
            .iter()
            .find(|candidate| {
                candidate.qualified_name != type_name
                    && !candidate.is_interface
                    && record.directly_extends(&candidate.qualified_name)
            })?
            .clone();
        self.subtype_refs(&parent.qualified_name);
        Some(parent)
    }

    /// Walk declared supertypes and interfaces breadth-first looking for `ancestor`.
    fn is_subtype(&self, record: &Record, ancestor: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = record.direct_supertypes().collect();

        while let Some(name) = queue.pop_front() {
            if name == ancestor {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            if let Some(&idx) = self.full_name_index.get(name) {
                queue.extend(self.records[idx].direct_supertypes());
            }
        }
        false
    }

    fn materialize(&self, refs: &[RecordRef]) -> Vec<Arc<Record>> {
        refs.iter().map(|&idx| self.records[idx].clone()).collect()
    }
}
