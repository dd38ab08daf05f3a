use std::fs::File;
use std::io::Write;
use std::path::Path;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

const TAG_UTF8: u8 = 1;
const TAG_CLASS: u8 = 7;

/// Minimal Java 8 class file: header, constant pool, supertypes and
/// class-level runtime-visible annotations. No fields or methods.
pub struct ClassBytes {
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<String>,
    flags: u16,
}

#[allow(dead_code)]
impl ClassBytes {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
            flags: ACC_PUBLIC | ACC_SUPER,
        }
    }

    pub fn interface(name: &str) -> Self {
        Self {
            flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(name)
        }
    }

    /// No super class, as for `java/lang/Object`.
    pub fn root(mut self) -> Self {
        self.super_name = None;
        self
    }

    pub fn extends(mut self, name: &str) -> Self {
        self.super_name = Some(name.to_string());
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn annotated(mut self, name: &str) -> Self {
        self.annotations.push(format!("L{name};"));
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.flags |= ACC_ABSTRACT;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = ConstantPool::default();
        let this_class = pool.class(&self.name);
        let super_class = self.super_name.as_deref().map_or(0, |n| pool.class(n));
        let interfaces: Vec<u16> = self.interfaces.iter().map(|n| pool.class(n)).collect();
        let annotation_attr = if self.annotations.is_empty() {
            None
        } else {
            let name_index = pool.utf8("RuntimeVisibleAnnotations");
            let types: Vec<u16> = self.annotations.iter().map(|d| pool.utf8(d)).collect();
            Some((name_index, types))
        };

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&(pool.count + 1).to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for index in interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        // fields, methods
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());

        match annotation_attr {
            None => out.extend_from_slice(&0u16.to_be_bytes()),
            Some((name_index, types)) => {
                out.extend_from_slice(&1u16.to_be_bytes());
                out.extend_from_slice(&name_index.to_be_bytes());
                let length = 2 + 4 * types.len() as u32;
                out.extend_from_slice(&length.to_be_bytes());
                out.extend_from_slice(&(types.len() as u16).to_be_bytes());
                for type_index in types {
                    out.extend_from_slice(&type_index.to_be_bytes());
                    // no element-value pairs
                    out.extend_from_slice(&0u16.to_be_bytes());
                }
            }
        }
        out
    }
}

#[derive(Default)]
struct ConstantPool {
    bytes: Vec<u8>,
    count: u16,
}

impl ConstantPool {
    fn utf8(&mut self, value: &str) -> u16 {
        self.bytes.push(TAG_UTF8);
        self.bytes
            .extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.count += 1;
        self.count
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.bytes.push(TAG_CLASS);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.count += 1;
        self.count
    }
}

/// Write `entries` (entry name, contents) into a new jar at `path`.
#[allow(dead_code)]
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default;
    for (name, bytes) in entries {
        zip.start_file(*name, options()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Write a class file below a directory root, creating parent directories.
#[allow(dead_code)]
pub fn write_class(root: &Path, internal_name: &str, bytes: &[u8]) {
    let path = root.join(format!("{internal_name}.class"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}
