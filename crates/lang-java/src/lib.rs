//! JVM bindings for the discovery engine.

pub mod classfile;
pub mod classpath;
pub mod jdk;

pub use classfile::ClassFileContext;
pub use jdk::JdkLocator;

use classcope_api::{ScopeLevel, SourceProvider};
use classcope_core::{DiscoveryEngine, DiscoveryEngineBuilder, PathProvider};
use std::path::PathBuf;
use std::sync::Arc;

/// Engine over `paths`, chained to the extension archives of `jdk`, with the
/// class-file context registered and `jdk` as runtime locator.
pub fn builder_for(
    scope: ScopeLevel,
    paths: Vec<PathBuf>,
    jdk: Arc<JdkLocator>,
) -> DiscoveryEngineBuilder {
    let mut provider = PathProvider::new(classpath::PROVIDER_NAME, paths);
    if let Some(ext) = jdk.ext_provider() {
        provider = provider.with_parent(Arc::new(ext));
    }
    let provider: Arc<dyn SourceProvider> = Arc::new(provider);

    DiscoveryEngine::builder(scope)
        .with_provider(provider)
        .with_context(Arc::new(ClassFileContext::new()))
        .with_runtime_locator(jdk)
}

/// Engine over `$CLASSPATH` and the detected JDK.
pub fn default_builder(scope: ScopeLevel) -> DiscoveryEngineBuilder {
    builder_for(scope, classpath::from_env(), Arc::new(JdkLocator::detect()))
}
