//! Loaders and run configuration for the phenocat command-line tools.
//!
//! The core crate works on in-memory values only. This crate turns files
//! into those values: an ontology snapshot into an [`phenocat::Ontology`],
//! annotation rows into a lazy stream of [`phenocat::AnnotationRecord`]s,
//! and a TOML file into a [`config::RunConfig`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod load;
pub mod logging;

pub use config::RunConfig;
pub use load::{ontology_snapshot, open_annotations, AnnotationFormat, AnnotationReader, Snapshot};
