//! Compiled-in category tables.
//!
//! Each sub-module encodes the fixed anchor list for one ontology as a
//! declarative literal table. See [`crate::CategoryRegistry::hpo`] and
//! [`crate::CategoryRegistry::gene_ontology`] for assembly.

pub mod go;
pub mod hpo;
