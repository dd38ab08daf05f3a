//! Namespace tree over the records of one scan.

use crate::error::{CatalogError, Result};
use classcope_api::{NAMESPACE_SEPARATOR, Record};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct NamespaceNode {
    segment: String,
    children: BTreeMap<String, NamespaceNode>,
    records: Vec<Arc<Record>>,
}

impl NamespaceNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            ..Default::default()
        }
    }

    fn collect_subtree(&self, out: &mut Vec<Arc<Record>>) {
        out.extend(self.records.iter().cloned());
        for child in self.children.values() {
            child.collect_subtree(out);
        }
    }

    fn collect_names(&self, prefix: &str, out: &mut Vec<String>) {
        for child in self.children.values() {
            let name = if prefix.is_empty() {
                child.segment.clone()
            } else {
                format!("{prefix}{NAMESPACE_SEPARATOR}{}", child.segment)
            };
            out.push(name.clone());
            child.collect_names(&name, out);
        }
    }
}

/// Tree of dotted namespaces; the root (empty name) is the default namespace.
#[derive(Debug, Default)]
pub struct NamespaceGraph {
    root: NamespaceNode,
}

impl NamespaceGraph {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Arc<Record>>) -> Self {
        let mut root = NamespaceNode::new("");
        for record in records {
            let mut node = &mut root;
            let namespace = record.namespace();
            if !namespace.is_empty() {
                for segment in namespace.split(NAMESPACE_SEPARATOR) {
                    node = node
                        .children
                        .entry(segment.to_string())
                        .or_insert_with(|| NamespaceNode::new(segment));
                }
            }
            node.records.push(record.clone());
        }
        Self { root }
    }

    /// Records declared exactly in `namespace`.
    pub fn records_directly_in(&self, namespace: &str) -> Result<Vec<Arc<Record>>> {
        Ok(self.node(namespace)?.records.clone())
    }

    /// Records of `namespace` followed by those of its descendants, children
    /// visited in name order.
    pub fn records_in_subtree(&self, namespace: &str) -> Result<Vec<Arc<Record>>> {
        let mut out = Vec::new();
        self.node(namespace)?.collect_subtree(&mut out);
        Ok(out)
    }

    /// Every non-root namespace, pre-order.
    pub fn namespaces(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_names("", &mut out);
        out
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.node(namespace).is_ok()
    }

    fn node(&self, namespace: &str) -> Result<&NamespaceNode> {
        if namespace.is_empty() {
            return Ok(&self.root);
        }
        let mut node = &self.root;
        for segment in namespace.split(NAMESPACE_SEPARATOR) {
            node = node
                .children
                .get(segment)
                .ok_or_else(|| CatalogError::NamespaceNotFound(namespace.to_string()))?;
        }
        Ok(node)
    }
}
