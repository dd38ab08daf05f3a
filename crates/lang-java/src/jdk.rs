//! JDK discovery.
//!
//! Finds a legacy (rt.jar based) JDK from:
//! - JAVA_HOME / JDK_HOME environment variables
//! - macOS java_home tool
//! - Common installation paths
//! - SDKMAN

use classcope_api::RuntimeLocator;
use classcope_core::PathProvider;
use std::path::{Path, PathBuf};

pub struct JdkLocator {
    /// Discovered JDK root, resolved once at construction
    home: Option<PathBuf>,
}

impl JdkLocator {
    /// Search the environment and the usual installation roots.
    pub fn detect() -> Self {
        Self {
            home: detect_home(),
        }
    }

    /// Use `home` as the JDK root if it has a runtime base.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            home: runtime_base(&home).map(|_| home),
        }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn version(&self) -> Option<String> {
        self.home.as_deref().and_then(detect_jdk_version)
    }

    /// Archives of the platform extension directory.
    pub fn ext_archives(&self) -> Vec<PathBuf> {
        let Some(home) = &self.home else {
            return Vec::new();
        };
        for dir in [home.join("jre/lib/ext"), home.join("lib/ext")] {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            let mut jars: Vec<PathBuf> = entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("jar"))
                })
                .collect();
            jars.sort();
            return jars;
        }
        Vec::new()
    }

    /// Provider for the extension archives, if there are any.
    pub fn ext_provider(&self) -> Option<PathProvider> {
        let jars = self.ext_archives();
        (!jars.is_empty()).then(|| PathProvider::new("jdk-ext", jars))
    }
}

impl RuntimeLocator for JdkLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.home.as_deref().and_then(runtime_base)
    }
}

fn detect_home() -> Option<PathBuf> {
    // 1. Environment
    for var in ["JAVA_HOME", "JDK_HOME"] {
        if let Ok(home) = std::env::var(var) {
            let home = PathBuf::from(home);
            if runtime_base(&home).is_some() {
                return Some(home);
            }
        }
    }

    // 2. macOS specific: Use java_home tool
    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("/usr/libexec/java_home")
            .args(["-v", "1.8"])
            .output()
        {
            if output.status.success() {
                let home = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
                if runtime_base(&home).is_some() {
                    return Some(home);
                }
            }
        }
    }

    // 3. Search common installation paths
    let mut search_roots = Vec::new();
    #[cfg(target_os = "macos")]
    search_roots.push(PathBuf::from("/Library/Java/JavaVirtualMachines/"));
    #[cfg(target_os = "linux")]
    search_roots.push(PathBuf::from("/usr/lib/jvm/"));
    #[cfg(target_os = "windows")]
    search_roots.push(PathBuf::from("C:\\Program Files\\Java\\"));

    // SDKMAN
    if let Some(mut sdkman) = dirs::home_dir() {
        sdkman.push(".sdkman/candidates/java/");
        search_roots.push(sdkman);
    }

    search_roots.iter().find_map(|root| search_root(root))
}

/// A JDK root itself, or a directory holding several of them.
fn search_root(root: &Path) -> Option<PathBuf> {
    if runtime_base(root).is_some() {
        return Some(root.to_path_buf());
    }
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.join("Contents/Home").exists() {
                path.join("Contents/Home")
            } else {
                path
            }
        })
        .collect();
    candidates.sort();
    candidates.into_iter().find(|home| runtime_base(home).is_some())
}

/// `lib/rt.jar` of a JRE, or `jre/lib/rt.jar` of a JDK.
pub fn runtime_base(home: &Path) -> Option<PathBuf> {
    [home.join("lib/rt.jar"), home.join("jre/lib/rt.jar")]
        .into_iter()
        .find(|p| p.is_file())
}

fn detect_jdk_version(jdk_root: &Path) -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(jdk_root.join("release")) {
        for line in content.lines() {
            if let Some(version) = line.strip_prefix("JAVA_VERSION=") {
                return Some(version.trim_matches('"').to_string());
            }
        }
    }

    // Fallback: try to extract from path
    let path_str = jdk_root.to_string_lossy();
    regex::Regex::new(r"jdk-?(\d+(?:\.\d+)*)")
        .ok()
        .and_then(|re| re.captures(&path_str))
        .and_then(|cap| cap.get(1).map(|m| m.as_str().to_string()))
}
