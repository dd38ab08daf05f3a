mod view;

use clap::{Parser, Subcommand};
use classcope_api::ScopeLevel;
use classcope_core::{CatalogConfig, DiscoveryEngine, ScanOutcome};
use classcope_java::{classpath, JdkLocator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "classcope",
    version,
    about = "Discover and query the types of a JVM class path",
    long_about = "Classcope scans class directories and jar archives, indexes the compiled types it \
                  finds and answers queries by name, annotation, type hierarchy and package. \
                  Scanning is scope-gated: local classes, dependencies, platform libraries and \
                  finally the runtime base."
)]
pub struct Cli {
    /// Class path to scan; defaults to $CLASSPATH. `dir/*` expands to the jars in `dir`.
    #[arg(long, short = 'c', global = true, value_name = "CLASSPATH")]
    pub classpath: Option<String>,

    /// How much of the class path to include: local, dependencies, platform or runtime
    #[arg(long, short = 's', global = true, default_value = "dependencies")]
    pub scope: ScopeLevel,

    /// JDK home used for platform libraries and the runtime base; detected when omitted
    #[arg(long, global = true, value_name = "JDK_HOME")]
    pub jdk: Option<PathBuf>,

    /// JSON configuration file; CLASSCOPE_* environment variables override it
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Mirror log output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the class path and print a summary
    Scan,
    /// List every discovered type
    List,
    /// Look a type up by qualified name, or by simple name if it has no package
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Types carrying an annotation
    Annotated {
        #[arg(value_name = "ANNOTATION")]
        marker: String,
    },
    /// Types extending or implementing a type, directly or not
    Subtypes {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
    /// The indexed class a type directly extends
    Supertype {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
    /// All interfaces
    Interfaces,
    /// All abstract types, interfaces included
    Abstract,
    /// Types declared in a package
    Package {
        #[arg(value_name = "PACKAGE", default_value = "")]
        namespace: String,
        /// Include sub-packages
        #[arg(long, short = 'r')]
        recursive: bool,
    },
    /// List every package
    Packages,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = classcope_core::logging::init_logging("cli", cli.verbose);

    let engine = build_engine(&cli)?;
    let output = execute(&engine, &cli)?;
    println!("{output}");
    Ok(())
}

pub fn build_engine(cli: &Cli) -> Result<DiscoveryEngine, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => CatalogConfig::from_json_file(path)?,
        None => CatalogConfig::default(),
    }
    .with_overrides(|key| std::env::var(key).ok())?;

    let paths = match &cli.classpath {
        Some(value) => classpath::parse(value),
        None => classpath::from_env(),
    };
    let jdk = match &cli.jdk {
        Some(home) => JdkLocator::at(home),
        None => JdkLocator::detect(),
    };
    info!(
        "Class path has {} entries, JDK: {}",
        paths.len(),
        jdk.home()
            .map_or_else(|| "not found".to_string(), |h| h.display().to_string())
    );

    Ok(classcope_java::builder_for(cli.scope, paths, Arc::new(jdk))
        .with_config(config)
        .build()?)
}

pub fn execute(engine: &DiscoveryEngine, cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let json = cli.json;
    let output = match &cli.command {
        Commands::Scan => match engine.ensure_scanned(cli.scope) {
            ScanOutcome::Rescanned(report) => view::render_report(&report, json)?,
            ScanOutcome::Cached => format!("Catalog already covers scope {}", cli.scope),
        },
        Commands::List => view::render_records(
            &engine.all_sorted_by(|a, b| a.qualified_name.cmp(&b.qualified_name)),
            json,
        )?,
        Commands::Find { name } => {
            let records = if name.contains('.') {
                engine.find(name).into_iter().collect()
            } else {
                engine.find_by_simple_name(name)
            };
            view::render_records(&records, json)?
        }
        Commands::Annotated { marker } => view::render_records(&engine.annotated_by(marker), json)?,
        Commands::Subtypes { type_name } => {
            view::render_records(&engine.subtypes_of(type_name), json)?
        }
        Commands::Supertype { type_name } => {
            let records: Vec<_> = engine.supertype_of(type_name).into_iter().collect();
            view::render_records(&records, json)?
        }
        Commands::Interfaces => view::render_records(&engine.interfaces(), json)?,
        Commands::Abstract => view::render_records(&engine.abstract_types(), json)?,
        Commands::Package {
            namespace,
            recursive,
        } => {
            let records = if *recursive {
                engine.in_namespace_tree(namespace)?
            } else {
                engine.in_namespace(namespace)?
            };
            view::render_records(&records, json)?
        }
        Commands::Packages => {
            let packages = engine.namespaces();
            if json {
                view::render_json(&packages)?
            } else {
                packages.join("\n")
            }
        }
    };
    Ok(output)
}
