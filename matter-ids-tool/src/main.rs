/*
 * Copyright (c) 2024 Project CHIP Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use matter_ids::registry::{self, ClusterMeta};
use matter_ids::symbol::{self, Availability};
use matter_ids::global::is_global;
use matter_ids::{AttributeId, Namespace, UnknownId};
use matter_ids_codegen::{registry as generate_registry, IdlGenerateContext};
use matter_ids_data_model::idl::Idl;
use matter_ids_data_model::Cluster;
use miette::{miette, IntoDiagnostic, WrapErr};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use query::{parse_cluster, parse_query, Query};

mod query;

/// Check, regenerate and query Matter identifier tables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true)]
    log_level: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate an IDL file
    Check {
        /// IDL file to check
        file: PathBuf,
    },

    /// Generate the Rust identifier tables for an IDL file
    Generate {
        /// IDL file to generate from
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path of the identifier crate in the generated code
        #[arg(long, default_value = "matter_ids")]
        crate_path: String,

        /// Only generate these clusters
        #[arg(long = "cluster", value_name = "NAME")]
        clusters: Vec<String>,
    },

    /// Resolve a symbol or a numeric path like `OnOff/attribute/0`
    Lookup {
        /// Symbol, cluster, or `<cluster>/<namespace>/<code>`
        query: String,
    },

    /// List the known clusters, or the elements of one cluster
    List {
        /// Cluster name or number
        cluster: Option<String>,
    },
}

fn parse_file(file: &Path) -> miette::Result<Idl> {
    let name = file.display().to_string();

    let contents = fs::read_to_string(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {name}"))?;

    let idl = Idl::parse_named(&name, contents.as_str().into())?;
    idl.validate()?;

    Ok(idl)
}

fn check(file: &Path) -> miette::Result<()> {
    let idl = parse_file(file)?;

    let count = |f: fn(&Cluster) -> usize| idl.clusters.iter().map(f).sum::<usize>();

    println!(
        "{}: {} clusters, {} attributes, {} commands, {} command responses, {} events",
        file.display(),
        idl.clusters.len(),
        count(|c| c.attributes.len()),
        count(|c| c.commands.len()),
        count(|c| c.responses.len()),
        count(|c| c.events.len()),
    );

    Ok(())
}

fn generate(
    file: &Path,
    output: Option<&Path>,
    crate_path: &str,
    clusters: &[String],
) -> miette::Result<()> {
    let context = IdlGenerateContext::new(crate_path)
        .map_err(|err| miette!("Invalid crate path `{crate_path}`: {err}"))?;

    let idl = parse_file(file)?;

    let filter = clusters.iter().map(String::as_str).collect::<HashSet<_>>();
    if let Some(missing) = filter.iter().find(|name| idl.find_cluster(name).is_none()) {
        return Err(miette!("Cluster {missing} not found in {}", file.display()));
    }

    let selected = idl
        .clusters
        .iter()
        .filter(|c| filter.is_empty() || filter.contains(c.id.as_str()));

    let tables = generate_registry(selected, &context);
    let generated = format!(
        "// Generated from {}. Do not edit.\n\n{tables}\n",
        file.display()
    );

    match output {
        Some(output) => {
            fs::write(output, generated)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {}", output.display());
        }
        None => print!("{generated}"),
    }

    Ok(())
}

fn lookup(query: &str) -> miette::Result<()> {
    let query = parse_query(query).into_diagnostic()?;
    let identifier = query.identifier();

    debug!("Looking up {identifier}");

    let description = registry::describe(identifier).into_diagnostic()?;

    println!("{description}");
    if let Some(canonical) = symbol::canonical(identifier) {
        println!("  symbol: {canonical}");
    }

    if let Query::Symbol(resolution) = query {
        if let Availability::Deprecated { replacement } = resolution.availability {
            println!("  deprecated, use {replacement}");
        }
    }

    Ok(())
}

fn list_cluster(cluster: &ClusterMeta) {
    println!(
        "{} {} (revision {}, {})",
        cluster.id, cluster.name, cluster.revision, cluster.maturity
    );

    for namespace in [
        Namespace::Attribute,
        Namespace::Command,
        Namespace::CommandResponse,
        Namespace::Event,
    ] {
        for element in cluster.elements(namespace) {
            let global =
                namespace == Namespace::Attribute && is_global(AttributeId::new(element.code));

            println!(
                "  {namespace:<16} 0x{:08X} {}{}",
                element.code,
                element.name,
                if global { " (global)" } else { "" }
            );
        }
    }
}

fn list(cluster: Option<&str>) -> miette::Result<()> {
    match cluster {
        Some(cluster) => {
            let id = parse_cluster(cluster).into_diagnostic()?;
            let meta = registry::cluster(id)
                .ok_or_else(|| miette!("{}", UnknownId::Cluster(id)))?;

            list_cluster(meta);
        }
        None => {
            for cluster in registry::clusters() {
                println!("{} {}", cluster.id, cluster.name);
            }
        }
    }

    Ok(())
}

fn main() -> miette::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(args.log_level.unwrap_or(LevelFilter::ERROR)))
        .init();

    match &args.command {
        Command::Check { file } => check(file),
        Command::Generate {
            file,
            output,
            crate_path,
            clusters,
        } => generate(file, output.as_deref(), crate_path, clusters),
        Command::Lookup { query } => lookup(query),
        Command::List { cluster } => list(cluster.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const SMALL_IDL: &str = "
        /** Attributes and commands for switching devices between 'On' and 'Off' states. */
        cluster OnOff = 6 {
          revision 6;

          readonly attribute boolean onOff = 0;
          readonly attribute int16u clusterRevision = 65533;

          command Off(): DefaultSuccess = 0;
          command On(): DefaultSuccess = 1;
        }

        cluster Identify = 3 {
          revision 4;

          attribute int16u identifyTime = 0;

          command Identify(IdentifyRequest): DefaultSuccess = 0;
        }
    ";

    fn write_idl(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("input.matter");
        fs::write(&path, contents).expect("write idl");
        path
    }

    fn bundled_idl() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../matter-ids/idl/clusters.matter")
    }

    #[test]
    fn check_accepts_the_bundled_tables() {
        assert!(check(&bundled_idl()).is_ok());
    }

    #[rstest]
    #[case::syntax("cluster OnOff = 6 { attribute boolean onOff = ; }")]
    #[case::unterminated("cluster OnOff = 6 {")]
    #[case::duplicate_code("cluster A = 1 { attribute int8u x = 1; attribute int8u y = 1; }")]
    #[case::duplicate_name("cluster A = 1 {} cluster a = 2 {}")]
    #[case::revision("cluster A = 1 { revision 70000; }")]
    fn check_rejects_invalid_idl(#[case] contents: &str) {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_idl(&dir, contents);

        assert!(check(&file).is_err());
    }

    #[test]
    fn check_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = check(&dir.path().join("missing.matter")).expect_err("missing file");

        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn generate_writes_parseable_rust() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_idl(&dir, SMALL_IDL);
        let output = dir.path().join("ids.rs");

        generate(&file, Some(&output), "matter_ids", &[]).expect("generated");

        let generated = fs::read_to_string(&output).expect("read output");
        assert!(generated.starts_with("// Generated from"));

        let parsed = syn::parse_file(&generated).expect("valid Rust");
        let modules = parsed
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Mod(module) => Some(module.ident.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(modules, ["identify", "on_off", "cluster_ids"]);

        assert!(generated.contains("pub const ID : matter_ids :: ClusterId"));
        assert!(generated.contains("pub const ON_OFF : matter_ids :: ClusterId"));
        assert!(!generated.contains("impl matter_ids :: ClusterId"));
    }

    #[test]
    fn generate_inside_the_ids_crate_adds_associated_constants() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_idl(&dir, SMALL_IDL);
        let output = dir.path().join("ids.rs");

        generate(&file, Some(&output), "crate", &[]).expect("generated");

        let generated = fs::read_to_string(&output).expect("read output");
        syn::parse_file(&generated).expect("valid Rust");
        assert!(generated.contains("impl crate :: ClusterId"));
    }

    #[test]
    fn generate_filters_clusters() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_idl(&dir, SMALL_IDL);
        let output = dir.path().join("ids.rs");

        generate(&file, Some(&output), "matter_ids", &["Identify".into()]).expect("generated");

        let generated = fs::read_to_string(&output).expect("read output");
        assert!(generated.contains("pub mod identify"));
        assert!(!generated.contains("pub mod on_off"));
    }

    #[rstest]
    #[case::unknown_cluster("matter_ids", "Missing")]
    #[case::invalid_crate_path("matter-ids", "OnOff")]
    fn generate_rejects(#[case] crate_path: &str, #[case] cluster: &str) {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_idl(&dir, SMALL_IDL);
        let output = dir.path().join("ids.rs");

        assert!(generate(&file, Some(&output), crate_path, &[cluster.into()]).is_err());
        assert!(!output.exists());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("OnOff"))]
    #[case(Some("0x0006"))]
    #[case(Some("DoorLock"))]
    fn list_known(#[case] cluster: Option<&str>) {
        assert!(list(cluster).is_ok());
    }

    #[rstest]
    #[case("0x9999")]
    #[case("NoSuchCluster")]
    #[case("0xZZ")]
    fn list_unknown(#[case] cluster: &str) {
        assert!(list(Some(cluster)).is_err());
    }

    #[rstest]
    #[case("OnOff")]
    #[case("OnOff/attribute/0")]
    #[case("global/0xFFFD")]
    #[case("AttributeIDTypeClusterOnOffAttributeOnOffID")]
    fn lookup_known(#[case] query: &str) {
        assert!(lookup(query).is_ok());
    }

    #[rstest]
    #[case("OnOff/attribute/0x1234")]
    #[case("global/0xFFF0")]
    #[case("NoSuchCluster")]
    fn lookup_unknown(#[case] query: &str) {
        assert!(lookup(query).is_err());
    }
}
