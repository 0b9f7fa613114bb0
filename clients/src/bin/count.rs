//! `phenocat-count`: counts annotations per ontology category.
//!
//! Loads an ontology snapshot and an annotation file, resolves every
//! annotated term to its category and prints the largest categories.
//!
//! **Usage:**
//! ```text
//! phenocat-count --ontology hp.json --annotations phenotype.hpoa --format hpoa
//! phenocat-count --config run.toml --entity P04637 --json
//! ```
//!
//! Unresolvable records are tallied, not fatal. The process fails only when
//! an input cannot be read or the ontology is inconsistent.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use phenocat::{
    top_n, Aggregation, AnnotationAggregator, AnnotationRecord, CategoryRegistry,
    CategoryResolver, Ontology, OntologyProvider, RegistryKind, TermId, TermTally,
};
use phenocat_clients::{load, logging, AnnotationFormat, RunConfig};
use serde::Serialize;
use tracing::{debug, info};

/// Count annotations per ontology category.
#[derive(Parser)]
#[command(
    name = "phenocat-count",
    about = "Count ontology annotations per top-level category"
)]
struct Args {
    /// TOML run configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ontology snapshot (JSON).
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Annotation file.
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Column layout of the annotation file.
    #[arg(long, value_enum)]
    format: Option<AnnotationFormat>,

    /// Registry to count into (`hpo` or `go`).
    #[arg(long)]
    registry: Option<RegistryKind>,

    /// Count only this entity; repeat for several.
    #[arg(long = "entity")]
    entities: Vec<String>,

    /// Number of categories to list.
    #[arg(long)]
    top: Option<usize>,

    /// Aggregate on all cores.
    #[arg(long)]
    parallel: bool,

    /// Also list the most annotated terms.
    #[arg(long)]
    terms: bool,

    /// Emit JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(RunConfig, bool, bool)> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(ontology) = self.ontology {
            config.ontology = Some(ontology);
        }
        if let Some(annotations) = self.annotations {
            config.annotations = Some(annotations);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(registry) = self.registry {
            config.registry = registry;
        }
        if !self.entities.is_empty() {
            config.entities = self.entities;
        }
        if let Some(top) = self.top {
            config.top = top;
        }
        config.parallel |= self.parallel;
        Ok((config, self.terms, self.json))
    }
}

/// One row of the category table.
#[derive(Serialize)]
struct Row {
    id: TermId,
    label: &'static str,
    count: u64,
}

/// JSON output document.
#[derive(Serialize)]
struct Output<'a> {
    registry: &'static str,
    top: Vec<Row>,
    aggregation: &'a Aggregation,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms: Option<Vec<(TermId, u64)>>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;
    let (config, list_terms, json) = args.into_config()?;

    let ontology = load::ontology_snapshot(config.ontology_path()?)?;
    let registry = config
        .registry
        .build()
        .with_context(|| format!("Failed to build the {} registry", config.registry))?;
    let reader = load::open_annotations(config.annotations_path()?, config.format)?;
    let aggregator = AnnotationAggregator::new(
        CategoryResolver::new(&ontology, &registry),
        config.entity_filter(),
    );

    let (aggregation, tally) = if config.parallel || list_terms {
        let mut records: Vec<AnnotationRecord> = Vec::new();
        let mut malformed = 0u64;
        for record in reader {
            match record {
                Ok(record) => records.push(record),
                Err(err) => {
                    debug!(%err, "skipping malformed annotation record");
                    malformed += 1;
                }
            }
        }
        info!(records = records.len(), malformed, "annotations read");
        let mut aggregation = if config.parallel {
            aggregator.aggregate_parallel(&records)
        } else {
            aggregator.aggregate_records(&records)
        };
        aggregation.unresolved.malformed += malformed;
        let tally = list_terms.then(|| aggregator.tally_terms(&records));
        (aggregation, tally)
    } else {
        (aggregator.aggregate(reader), None)
    };

    let top = rows(&registry, &aggregation, config.top);
    let terms = tally.as_ref().map(|t: &TermTally| t.top_n(config.top));

    if json {
        let output = Output {
            registry: registry.name(),
            top,
            aggregation: &aggregation,
            terms,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} categories: {} resolved, {} unresolved, {} filtered out",
        registry.name(),
        aggregation.resolved(),
        aggregation.unresolved.total(),
        aggregation.filtered_out
    );
    println!();
    for row in &top {
        println!("{:>10}  {}  {}", row.count, row.id, row.label);
    }

    let unresolved = &aggregation.unresolved;
    if unresolved.total() > 0 {
        println!();
        println!(
            "Unresolved: {} unknown term, {} no category, {} malformed",
            unresolved.unknown_term, unresolved.no_category, unresolved.malformed
        );
        let unmapped = unresolved.unmapped.iter().map(|(term, n)| (*term, *n));
        print_terms(&ontology, top_n(unmapped, config.top));
    }

    if let Some(terms) = terms {
        println!();
        println!("Most annotated terms:");
        print_terms(&ontology, terms);
    }

    Ok(())
}

fn rows(registry: &CategoryRegistry, aggregation: &Aggregation, n: usize) -> Vec<Row> {
    aggregation
        .counts
        .top_n(n)
        .into_iter()
        .filter_map(|(id, count)| {
            registry.lookup(&id).map(|category| Row {
                id,
                label: category.label(),
                count,
            })
        })
        .collect()
}

fn print_terms(ontology: &Ontology, terms: Vec<(TermId, u64)>) {
    for (term, count) in terms {
        let label = ontology.label_of(&term).unwrap_or("?");
        println!("{:>10}  {}  {}", count, term, label);
    }
}
