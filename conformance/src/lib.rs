//! phenocat conformance suite.
//!
//! Checks a [`CategoryRegistry`] against the ontology it resolves into. The
//! registries are compiled-in tables, so nothing stops an anchor from going
//! stale when the ontology is re-released: ids get obsoleted, merged into
//! other terms, or moved. These validators catch that before counts quietly
//! drift.
//!
//! # Validators
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `registry/anchors` | every anchor is a canonical term |
//! | `registry/subcategories` | every subcategory descends from its anchor |
//! | `registry/nesting` | no anchor shadows another (warning) |
//! | `coverage/terms` | how many terms resolve |
//! | `coverage/gaps` | unmapped terms inside the covered region (warning) |
//!
//! # Entry Point
//!
//! ```
//! use phenocat::{CategoryRegistry, Ontology, Term, TermId};
//! use phenocat::registries::go;
//! use phenocat_conformance::run_all;
//!
//! let ontology = Ontology::from_terms([
//!     Term::new(go::BIOLOGICAL_PROCESS, "biological_process"),
//!     Term::new(go::MOLECULAR_FUNCTION, "molecular_function"),
//!     Term::new(go::CELLULAR_COMPONENT, "cellular_component"),
//!     Term::new(TermId::go(6915), "apoptotic process").with_parents([go::BIOLOGICAL_PROCESS]),
//! ])?;
//! let registry = CategoryRegistry::gene_ontology()?;
//!
//! let report = run_all(&ontology, &registry);
//! assert!(report.all_passed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use phenocat::{CategoryRegistry, Ontology};

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Registry consistency (anchors, subcategories, nesting)
/// 2. Ontology coverage (resolved terms, gaps)
#[must_use]
pub fn run_all(ontology: &Ontology, registry: &CategoryRegistry) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    // 1. Registry consistency
    report.extend(validators::registry::validate(ontology, registry));

    // 2. Coverage
    report.extend(validators::coverage::validate(ontology, registry));

    report
}
