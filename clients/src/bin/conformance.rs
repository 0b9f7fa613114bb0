//! `phenocat-conformance`: checks a category registry against an ontology release.
//!
//! Runs the conformance suite:
//! - Registry consistency (anchors exist and are canonical, subcategories sit
//!   under their anchors, no nested anchors)
//! - Coverage (how many terms resolve, which terms fall through)
//!
//! **Usage:**
//! ```text
//! phenocat-conformance --ontology hp.json [--registry hpo]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use phenocat::RegistryKind;
use phenocat_clients::{load, logging};
use phenocat_conformance::{run_all, Severity};

/// Run the phenocat conformance suite.
#[derive(Parser)]
#[command(
    name = "phenocat-conformance",
    about = "Validate a category registry against an ontology snapshot"
)]
struct Args {
    /// Ontology snapshot (JSON).
    #[arg(long)]
    ontology: PathBuf,

    /// Registry to check (`hpo` or `go`).
    #[arg(long, default_value = "hpo")]
    registry: RegistryKind,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let ontology = load::ontology_snapshot(&args.ontology)?;
    let registry = args
        .registry
        .build()
        .with_context(|| format!("Failed to build the {} registry", args.registry))?;

    let report = run_all(&ontology, &registry);

    // Print results
    println!("phenocat Conformance Report ({} registry)", registry.name());
    println!("==========================================");
    println!();

    for result in &report.results {
        println!(
            "[{}] {} — {}",
            result.severity.tag(),
            result.validator,
            result.message
        );
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let passed = report
        .results
        .iter()
        .filter(|r| r.severity == Severity::Pass)
        .count();
    let warned = report.warning_count();
    let failed = report.failure_count();

    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        passed, warned, failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
