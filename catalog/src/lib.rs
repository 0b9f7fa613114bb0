//! Ontology category engine.
//!
//! The `phenocat` crate buckets ontology annotations into a fixed set of
//! top-level categories. Given an ontology graph (terms with `is_a` parents
//! and deprecated alias ids) and a compiled-in registry of category anchors,
//! it resolves each annotated term to the single best-matching anchor and
//! counts annotations per category.
//!
//! # Entry Point
//!
//! ```
//! use phenocat::{CategoryRegistry, CategoryResolver, Ontology, Term, TermId};
//! use phenocat::registries::hpo;
//!
//! let ontology = Ontology::from_terms([
//!     Term::new(TermId::hp(1), "All"),
//!     Term::new(TermId::hp(118), "Phenotypic abnormality").with_parents([TermId::hp(1)]),
//!     Term::new(hpo::NEOPLASM, "Neoplasm").with_parents([TermId::hp(118)]),
//!     Term::new(TermId::hp(2665), "Lymphoma").with_parents([hpo::NEOPLASM]),
//! ])?;
//! let registry = CategoryRegistry::hpo()?;
//! let resolver = CategoryResolver::new(&ontology, &registry);
//!
//! let category = resolver.resolve(&TermId::hp(2665))?;
//! assert_eq!(category.label(), "Neoplasm");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Aggregation
//!
//! ```
//! use phenocat::{aggregate, AnnotationRecord, CategoryRegistry, EntityFilter, Ontology, Term, TermId};
//! use phenocat::registries::hpo;
//!
//! let ontology = Ontology::from_terms([
//!     Term::new(TermId::hp(118), "Phenotypic abnormality"),
//!     Term::new(hpo::EYE, "Abnormality of the eye").with_parents([TermId::hp(118)]),
//! ])?;
//! let registry = CategoryRegistry::hpo()?;
//! let records = [AnnotationRecord::new("OMIM:154700", hpo::EYE)];
//!
//! let result = aggregate(&records, &ontology, &registry, EntityFilter::All);
//! assert_eq!(result.counts.get(&hpo::EYE), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod aggregate;
pub mod category;
pub mod model;
pub mod ontology;
pub mod rank;
pub mod registries;
pub mod registry;
pub mod resolver;

pub use aggregate::{
    aggregate, Aggregation, AnnotationAggregator, CategoryCounts, EntityFilter, TermCount,
    TermTally, UnresolvedTally,
};
pub use category::Category;
pub use model::{
    AnnotationRecord, Aspect, AspectError, MalformedRecord, Prefix, Term, TermId, TermIdError,
};
pub use ontology::{Ontology, OntologyBuilder, OntologyError, OntologyProvider};
pub use rank::top_n;
pub use registry::{CategoryRegistry, RegistryError, RegistryKind, UnknownRegistry};
pub use resolver::{resolve, CategoryResolver, ResolveError};
