//! `CLASSPATH`-style source lists.

use std::ffi::OsStr;
use std::path::PathBuf;

pub const ENV_CLASSPATH: &str = "CLASSPATH";
pub const PROVIDER_NAME: &str = "classpath";

/// Split a platform path list, expanding `dir/*` to the archives in `dir`.
///
/// Empty elements are dropped. Wildcard directories that cannot be read
/// expand to nothing.
pub fn parse(value: impl AsRef<OsStr>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for element in std::env::split_paths(value.as_ref()) {
        if element.as_os_str().is_empty() {
            continue;
        }
        if element.file_name().and_then(OsStr::to_str) == Some("*") {
            let dir = element.parent().map(PathBuf::from).unwrap_or_default();
            paths.extend(expand_wildcard(dir));
        } else {
            paths.push(element);
        }
    }
    paths
}

fn expand_wildcard(dir: PathBuf) -> Vec<PathBuf> {
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    };
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut jars: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(OsStr::to_str)
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
        })
        .collect();
    jars.sort();
    jars
}

/// Entries of `$CLASSPATH`; empty when the variable is unset.
pub fn from_env() -> Vec<PathBuf> {
    std::env::var_os(ENV_CLASSPATH)
        .map(parse)
        .unwrap_or_default()
}
