//! Resolution context backed by compiled class files.

use classcope_api::{CatalogError, RawEntry, Record, ResolutionContext, Result};
use ristretto_classfile::attributes::Attribute;
use ristretto_classfile::{ClassAccessFlags, ClassFile};
use std::io::Cursor;

pub const CONTEXT_ID: &str = "classfile";

/// Parses the entry bytes as a JVM class file.
#[derive(Debug, Clone, Default)]
pub struct ClassFileContext {
    id: String,
}

impl ClassFileContext {
    pub fn new() -> Self {
        Self {
            id: CONTEXT_ID.to_string(),
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ResolutionContext for ClassFileContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn resolve(&self, entry: &RawEntry<'_>) -> Result<Record> {
        let fail = |reason: String| CatalogError::not_resolvable(entry.qualified_name, reason);

        let class = ClassFile::from_bytes(&mut Cursor::new(entry.bytes.to_vec()))
            .map_err(|e| fail(format!("Failed to parse class: {e:?}")))?;
        let pool = &class.constant_pool;

        let class_name = |index: u16| -> Result<String> {
            pool.try_get_class(index)
                .map(|name| binary_to_qualified(&name.to_string()))
                .map_err(|e| fail(format!("Bad class reference #{index}: {e:?}")))
        };

        let name = class_name(class.this_class)?;
        if name != entry.qualified_name {
            return Err(fail(format!("entry declares {name}")));
        }

        let mut record = Record::new(name);
        if class.access_flags.contains(ClassAccessFlags::INTERFACE) {
            record = record.as_interface();
        } else {
            if class.access_flags.contains(ClassAccessFlags::ABSTRACT) {
                record = record.as_abstract();
            }
            // Interfaces report java.lang.Object as their super class; only classes keep it
            if class.super_class != 0 {
                record = record.with_supertype(class_name(class.super_class)?);
            }
        }

        for &index in &class.interfaces {
            record = record.with_interface(class_name(index)?);
        }

        for attribute in &class.attributes {
            if let Attribute::RuntimeVisibleAnnotations { annotations, .. } = attribute {
                for annotation in annotations {
                    let descriptor = pool
                        .try_get_utf8(annotation.type_index)
                        .map_err(|e| fail(format!("Bad annotation type: {e:?}")))?;
                    record = record.with_annotation(descriptor_to_qualified(&descriptor.to_string()));
                }
            }
        }

        Ok(record)
    }
}

/// `com/example/Foo` → `com.example.Foo`
pub fn binary_to_qualified(internal: &str) -> String {
    internal.replace('/', ".")
}

/// `Lcom/example/Marker;` → `com.example.Marker`
pub fn descriptor_to_qualified(descriptor: &str) -> String {
    let inner = descriptor
        .strip_prefix('L')
        .and_then(|d| d.strip_suffix(';'))
        .unwrap_or(descriptor);
    binary_to_qualified(inner)
}
