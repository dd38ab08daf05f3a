mod common;

use classcope_api::{Record, ScopeLevel, SilentSink};
use classcope_core::{DiscoveryEngine, ScanOutcome};
use classcope_java::{JdkLocator, builder_for, classpath};
use common::{ClassBytes, write_class, write_jar};
use std::path::Path;
use std::sync::Arc;

fn names(records: &[Arc<Record>]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.qualified_name.clone()).collect();
    names.sort();
    names
}

/// App classes, one dependency jar and a JDK with an extension jar and rt.jar.
fn fixture(root: &Path) -> DiscoveryEngine {
    let app = root.join("app/classes");
    write_class(
        &app,
        "com/example/Base",
        &ClassBytes::class("com/example/Base").abstract_class().build(),
    );
    write_class(
        &app,
        "com/example/Api",
        &ClassBytes::interface("com/example/Api").build(),
    );
    write_class(
        &app,
        "com/example/Service",
        &ClassBytes::class("com/example/Service")
            .extends("com/example/Base")
            .implements("com/example/Api")
            .annotated("com/example/Component")
            .build(),
    );
    write_class(
        &app,
        "com/example/Service$Inner",
        &ClassBytes::class("com/example/Service$Inner").build(),
    );

    let dep = root.join("app/lib/dep.jar");
    std::fs::create_dir_all(dep.parent().unwrap()).unwrap();
    write_jar(
        &dep,
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
            (
                "org/dep/Helper.class",
                ClassBytes::class("org/dep/Helper")
                    .implements("com/example/Api")
                    .annotated("com/example/Component")
                    .build(),
            ),
            ("org/dep/Helper$1.class", ClassBytes::class("org/dep/Helper$1").build()),
            ("org/dep/Broken.class", vec![0xCA, 0xFE]),
        ],
    );

    let jdk = root.join("jdk1.8.0");
    std::fs::create_dir_all(jdk.join("jre/lib/ext")).unwrap();
    write_jar(
        &jdk.join("jre/lib/ext/extra.jar"),
        &[("sun/ext/Extra.class", ClassBytes::class("sun/ext/Extra").build())],
    );
    write_jar(
        &jdk.join("jre/lib/rt.jar"),
        &[(
            "java/lang/Object.class",
            ClassBytes::class("java/lang/Object").root().build(),
        )],
    );

    builder_for(
        ScopeLevel::Local,
        vec![app, dep],
        Arc::new(JdkLocator::at(&jdk)),
    )
    .with_sink(Arc::new(SilentSink))
    .build()
    .unwrap()
}

#[test]
fn test_scope_ladder_over_real_class_files() {
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture(dir.path());

    assert_eq!(
        names(&engine.all()),
        vec!["com.example.Api", "com.example.Base", "com.example.Service"]
    );

    engine.ensure_scanned(ScopeLevel::Dependencies);
    assert!(engine.find("org.dep.Helper").is_some());
    assert!(engine.find("org.dep.Broken").is_none());
    assert!(engine.find("sun.ext.Extra").is_none());

    engine.ensure_scanned(ScopeLevel::PlatformLibraries);
    assert!(engine.find("sun.ext.Extra").is_some());
    assert!(engine.find("java.lang.Object").is_none());

    engine.ensure_scanned(ScopeLevel::RuntimeBase);
    assert_eq!(engine.all().len(), 6);
    assert_eq!(
        engine.supertype_of("com.example.Base").unwrap().qualified_name,
        "java.lang.Object"
    );
}

#[test]
fn test_hierarchy_and_annotation_queries() {
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture(dir.path());
    engine.ensure_scanned(ScopeLevel::Dependencies);

    assert_eq!(
        names(&engine.subtypes_of("com.example.Api")),
        vec!["com.example.Service", "org.dep.Helper"]
    );
    assert_eq!(
        names(&engine.subtypes_of("com.example.Base")),
        vec!["com.example.Service"]
    );
    assert_eq!(
        engine.supertype_of("com.example.Service").unwrap().qualified_name,
        "com.example.Base"
    );
    // Object is not indexed below the runtime scope
    assert!(engine.supertype_of("org.dep.Helper").is_none());

    assert_eq!(
        names(&engine.annotated_by("com.example.Component")),
        vec!["com.example.Service", "org.dep.Helper"]
    );
    assert_eq!(names(&engine.interfaces()), vec!["com.example.Api"]);
    assert_eq!(
        names(&engine.abstract_types()),
        vec!["com.example.Api", "com.example.Base"]
    );
    assert_eq!(
        names(&engine.in_namespace_tree("com").unwrap()),
        vec!["com.example.Api", "com.example.Base", "com.example.Service"]
    );
}

#[test]
fn test_wildcard_expanded_upper_case_jar_is_scanned() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    std::fs::create_dir_all(&lib).unwrap();
    write_jar(
        &lib.join("Dep.JAR"),
        &[(
            "org/dep/Helper.class",
            ClassBytes::class("org/dep/Helper").build(),
        )],
    );

    let paths = classpath::parse(lib.join("*"));
    assert_eq!(paths, vec![lib.join("Dep.JAR")]);

    let engine = builder_for(
        ScopeLevel::Dependencies,
        paths,
        Arc::new(JdkLocator::at(dir.path().join("no-jdk"))),
    )
    .with_sink(Arc::new(SilentSink))
    .build()
    .unwrap();

    let ScanOutcome::Rescanned(report) = engine.ensure_scanned(ScopeLevel::Dependencies) else {
        panic!("expected a rescan");
    };
    assert_eq!((report.scanned, report.failed, report.records), (1, 0, 1));
    assert!(engine.find("org.dep.Helper").is_some());
}
