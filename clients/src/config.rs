//! Run configuration for `phenocat-count`.
//!
//! A run reads settings from an optional TOML file; command-line flags
//! override whatever the file sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use phenocat::{EntityFilter, RegistryKind};
use serde::{Deserialize, Serialize};

use crate::load::AnnotationFormat;

/// Settings for one counting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Path to the ontology snapshot (JSON).
    #[serde(default)]
    pub ontology: Option<PathBuf>,

    /// Path to the annotation file.
    #[serde(default)]
    pub annotations: Option<PathBuf>,

    /// Column layout of the annotation file.
    #[serde(default)]
    pub format: AnnotationFormat,

    /// Which compiled-in registry to count into.
    #[serde(default)]
    pub registry: RegistryKind,

    /// Entities to count; empty means all of them.
    #[serde(default)]
    pub entities: Vec<String>,

    /// How many categories to list.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Aggregate on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_top() -> usize {
    10
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ontology: None,
            annotations: None,
            format: AnnotationFormat::default(),
            registry: RegistryKind::default(),
            entities: Vec::new(),
            top: default_top(),
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: RunConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} as run configuration", path.display()))?;
        Ok(config.relative_to(path.parent().unwrap_or(Path::new(""))))
    }

    /// Resolves relative paths against `base`, the directory holding the
    /// configuration file.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.ontology = self.ontology.map(rebase);
        self.annotations = self.annotations.map(rebase);
        self
    }

    /// The ontology snapshot path.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the command line gave one.
    pub fn ontology_path(&self) -> Result<&Path> {
        self.ontology.as_deref().context(
            "no ontology snapshot given; pass --ontology or set `ontology` in the config file",
        )
    }

    /// The annotation file path.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the command line gave one.
    pub fn annotations_path(&self) -> Result<&Path> {
        self.annotations.as_deref().context(
            "no annotation file given; pass --annotations or set `annotations` in the config file",
        )
    }

    /// Entity filter for the configured entity list.
    #[must_use]
    pub fn entity_filter(&self) -> EntityFilter {
        if self.entities.is_empty() {
            EntityFilter::All
        } else {
            EntityFilter::only(self.entities.iter().cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let Ok(config) = toml::from_str::<RunConfig>("") else {
            unreachable!("empty config is valid")
        };
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.top, 10);
        assert_eq!(config.entity_filter(), EntityFilter::All);
        assert!(config.ontology_path().is_err());
    }

    #[test]
    fn full_file_parses() {
        let text = r#"
            ontology = "/data/hp.json"
            annotations = "/data/goa_human.gaf"
            format = "gaf"
            registry = "go"
            entities = ["P04637", "P38398"]
            top = 3
            parallel = true
        "#;
        let Ok(config) = toml::from_str::<RunConfig>(text) else {
            unreachable!("config is valid")
        };
        assert_eq!(config.format, AnnotationFormat::Gaf);
        assert_eq!(config.registry, RegistryKind::GeneOntology);
        assert_eq!(config.top, 3);
        assert!(config.parallel);
        assert!(config.entity_filter().admits("P04637"));
        assert!(!config.entity_filter().admits("Q00000"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<RunConfig>("registery = \"hpo\"").is_err());
        assert!(toml::from_str::<RunConfig>("format = \"csv\"").is_err());
        let legacy = toml::from_str::<RunConfig>("format = \"hpo-tab\"").map(|c| c.format);
        assert_eq!(legacy.ok(), Some(AnnotationFormat::HpoTab));
    }

    #[test]
    fn paths_are_relative_to_the_file() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir is writable")
        };
        let path = dir.path().join("run.toml");
        let text = "ontology = \"hp.json\"\nannotations = \"/abs/a.tsv\"\n";
        assert!(std::fs::write(&path, text).is_ok());
        let Ok(config) = RunConfig::from_file(&path) else {
            unreachable!("config is valid")
        };
        assert_eq!(config.ontology, Some(dir.path().join("hp.json")));
        assert_eq!(config.annotations, Some(PathBuf::from("/abs/a.tsv")));
    }
}
