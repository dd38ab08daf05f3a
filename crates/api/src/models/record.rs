use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator between namespace segments in a qualified name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Metadata of one discovered type.
///
/// Records are immutable once extracted; identity is the qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub qualified_name: String,
    pub simple_name: String,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub annotations: BTreeSet<String>,
    pub declared_supertype: Option<String>,
    /// Declared super-interfaces, in declaration order
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl Record {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = simple_name_of(&qualified_name).to_string();
        Self {
            qualified_name,
            simple_name,
            is_interface: false,
            is_abstract: false,
            annotations: BTreeSet::new(),
            declared_supertype: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.declared_supertype = Some(supertype.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_annotation(mut self, marker: impl Into<String>) -> Self {
        self.annotations.insert(marker.into());
        self
    }

    /// Marks the record as an interface. Interfaces are abstract as well.
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self.is_abstract = true;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Namespace part of the qualified name; empty for the default namespace.
    pub fn namespace(&self) -> &str {
        match self.qualified_name.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.qualified_name[..idx],
            None => "",
        }
    }

    pub fn is_annotated_with(&self, marker: &str) -> bool {
        self.annotations.contains(marker)
    }

    /// True if `name` is the declared supertype or one of the declared interfaces.
    pub fn directly_extends(&self, name: &str) -> bool {
        self.declared_supertype.as_deref() == Some(name)
            || self.interfaces.iter().any(|i| i == name)
    }

    /// Declared supertype followed by the declared interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &str> {
        self.declared_supertype
            .as_deref()
            .into_iter()
            .chain(self.interfaces.iter().map(String::as_str))
    }
}

/// Last segment of a qualified name.
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(qualified_name)
}
