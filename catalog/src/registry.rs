//! The fixed catalogue of top-level categories.
//!
//! A [`CategoryRegistry`] is built once from a literal table (see
//! [`crate::registries`]) and never mutated. It remembers insertion order,
//! which is what makes tie-breaking between several matching anchors
//! deterministic.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::model::TermId;
use crate::registries;

/// Inconsistencies in a registry table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The table lists no categories.
    #[error("registry {0} has no categories")]
    Empty(&'static str),

    /// Two categories share an anchor.
    #[error("registry {registry} lists anchor {anchor} twice")]
    DuplicateAnchor {
        /// Registry name.
        registry: &'static str,
        /// The repeated anchor.
        anchor: TermId,
    },

    /// A priority entry is not one of the anchors.
    #[error("registry {registry} prioritises {anchor}, which is not an anchor")]
    UnknownPriority {
        /// Registry name.
        registry: &'static str,
        /// The offending priority entry.
        anchor: TermId,
    },
}

/// An insertion-ordered map from anchor id to [`Category`].
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    name: &'static str,
    categories: Vec<Category>,
    index: HashMap<TermId, usize>,
    priority: Vec<TermId>,
}

impl CategoryRegistry {
    /// Builds a registry from a category table and a priority list.
    ///
    /// When several anchors match one term, the first of them found in
    /// `priority` wins; failing that, the one listed first in `categories`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the table is empty, repeats an anchor,
    /// or prioritises an id that is not an anchor.
    pub fn new(
        name: &'static str,
        categories: Vec<Category>,
        priority: Vec<TermId>,
    ) -> Result<Self, RegistryError> {
        if categories.is_empty() {
            return Err(RegistryError::Empty(name));
        }
        let mut index = HashMap::with_capacity(categories.len());
        for (rank, category) in categories.iter().enumerate() {
            if index.insert(category.id(), rank).is_some() {
                return Err(RegistryError::DuplicateAnchor {
                    registry: name,
                    anchor: category.id(),
                });
            }
        }
        if let Some(anchor) = priority.iter().find(|id| !index.contains_key(*id)) {
            return Err(RegistryError::UnknownPriority {
                registry: name,
                anchor: *anchor,
            });
        }
        Ok(Self {
            name,
            categories,
            index,
            priority,
        })
    }

    /// The Human Phenotype Ontology organ-system registry.
    ///
    /// # Errors
    ///
    /// Only fails if the compiled-in table is inconsistent.
    pub fn hpo() -> Result<Self, RegistryError> {
        Self::new(
            "hpo",
            registries::hpo::categories(),
            registries::hpo::PRIORITY.to_vec(),
        )
    }

    /// The Gene Ontology sub-ontology registry.
    ///
    /// # Errors
    ///
    /// Only fails if the compiled-in table is inconsistent.
    pub fn gene_ontology() -> Result<Self, RegistryError> {
        Self::new("go", registries::go::categories(), Vec::new())
    }

    /// Registry name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Anchor ids in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = TermId> + '_ {
        self.categories.iter().map(Category::id)
    }

    /// Categories in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Looks up a category by anchor id.
    #[must_use]
    pub fn lookup(&self, anchor: &TermId) -> Option<&Category> {
        self.index.get(anchor).and_then(|&rank| self.categories.get(rank))
    }

    /// Returns true if `id` is an anchor.
    #[must_use]
    pub fn contains(&self, id: &TermId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of `anchor` in insertion order.
    #[must_use]
    pub fn rank_of(&self, anchor: &TermId) -> Option<usize> {
        self.index.get(anchor).copied()
    }

    /// Anchors that win ties, highest priority first.
    #[must_use]
    pub fn priority(&self) -> &[TermId] {
        &self.priority
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a constructed registry; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Picks one category out of a set of matching anchors.
    ///
    /// Priority anchors win; otherwise the earliest anchor in insertion
    /// order. Ids that are not anchors are ignored.
    pub fn prioritized<'a, I>(&self, candidates: I) -> Option<&Category>
    where
        I: IntoIterator<Item = &'a TermId>,
    {
        let candidates: Vec<&TermId> = candidates.into_iter().collect();
        self.priority
            .iter()
            .find(|p| candidates.contains(p))
            .or_else(|| {
                candidates
                    .iter()
                    .copied()
                    .filter(|id| self.contains(id))
                    .min_by_key(|id| self.rank_of(id))
            })
            .and_then(|id| self.lookup(id))
    }

    /// Finds the category or subcategory carrying `id`, with its top-level
    /// anchor.
    #[must_use]
    pub fn find_anywhere(&self, id: &TermId) -> Option<(&Category, &Category)> {
        self.categories.iter().find_map(|top| {
            if top.id() == *id {
                Some((top, top))
            } else {
                top.subcategory(id).map(|sub| (top, sub))
            }
        })
    }
}

impl<'a> IntoIterator for &'a CategoryRegistry {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Which compiled-in registry to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// [`CategoryRegistry::hpo`].
    #[default]
    Hpo,
    /// [`CategoryRegistry::gene_ontology`].
    #[serde(rename = "go")]
    GeneOntology,
}

/// Error returned when a registry name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry {0:?}; expected \"hpo\" or \"go\"")]
pub struct UnknownRegistry(pub String);

impl RegistryKind {
    /// Builds the selected registry.
    ///
    /// # Errors
    ///
    /// Only fails if the compiled-in table is inconsistent.
    pub fn build(self) -> Result<CategoryRegistry, RegistryError> {
        match self {
            RegistryKind::Hpo => CategoryRegistry::hpo(),
            RegistryKind::GeneOntology => CategoryRegistry::gene_ontology(),
        }
    }

    /// Short name used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RegistryKind::Hpo => "hpo",
            RegistryKind::GeneOntology => "go",
        }
    }
}

impl FromStr for RegistryKind {
    type Err = UnknownRegistry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hpo" | "hp" => Ok(RegistryKind::Hpo),
            "go" | "gene_ontology" => Ok(RegistryKind::GeneOntology),
            other => Err(UnknownRegistry(other.to_owned())),
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registries::hpo;

    #[test]
    fn hpo_registry_builds() {
        let Ok(registry) = CategoryRegistry::hpo() else {
            unreachable!("compiled-in table is consistent")
        };
        assert_eq!(registry.len(), 25);
        assert_eq!(registry.priority(), &[hpo::NEOPLASM]);
        assert_eq!(
            registry.lookup(&hpo::NEOPLASM).map(Category::label),
            Some("Neoplasm")
        );
        assert!(registry.lookup(&TermId::hp(118)).is_none());
    }

    #[test]
    fn insertion_order_is_kept() {
        let Ok(registry) = CategoryRegistry::hpo() else {
            unreachable!("compiled-in table is consistent")
        };
        let anchors: Vec<TermId> = registry.categories().collect();
        assert_eq!(anchors.first(), Some(&hpo::CELLULAR));
        assert_eq!(anchors.last(), Some(&hpo::NEOPLASM));
        assert_eq!(registry.rank_of(&hpo::BLOOD), Some(1));
    }

    #[test]
    fn gene_ontology_registry_builds() {
        let registry = CategoryRegistry::gene_ontology();
        assert_eq!(registry.map(|r| r.len()), Ok(3));
    }

    #[test]
    fn duplicate_anchor_is_rejected() {
        let result = CategoryRegistry::new(
            "dup",
            vec![
                Category::new(TermId::hp(1), "A"),
                Category::new(TermId::hp(1), "B"),
            ],
            Vec::new(),
        );
        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicateAnchor {
                registry: "dup",
                anchor: TermId::hp(1),
            })
        );
    }

    #[test]
    fn priority_must_name_an_anchor() {
        let result = CategoryRegistry::new(
            "bad",
            vec![Category::new(TermId::hp(1), "A")],
            vec![TermId::hp(2)],
        );
        assert!(matches!(result, Err(RegistryError::UnknownPriority { .. })));
        let empty = CategoryRegistry::new("none", Vec::new(), Vec::new());
        assert_eq!(empty.err(), Some(RegistryError::Empty("none")));
    }

    #[test]
    fn prioritized_prefers_priority_then_order() {
        let Ok(registry) = CategoryRegistry::hpo() else {
            unreachable!("compiled-in table is consistent")
        };
        let pick = |ids: &[TermId]| registry.prioritized(ids).map(Category::id);
        assert_eq!(pick(&[hpo::SKELETAL, hpo::NEOPLASM]), Some(hpo::NEOPLASM));
        assert_eq!(pick(&[hpo::SKELETAL, hpo::LIMBS]), Some(hpo::LIMBS));
        assert_eq!(pick(&[hpo::LIMBS, hpo::SKELETAL]), Some(hpo::LIMBS));
        assert_eq!(pick(&[TermId::hp(118)]), None);
        assert_eq!(pick(&[]), None);
    }

    #[test]
    fn subcategories_are_found_under_their_anchor() {
        let Ok(registry) = CategoryRegistry::hpo() else {
            unreachable!("compiled-in table is consistent")
        };
        let found = registry.find_anywhere(&TermId::hp(2597));
        assert_eq!(
            found.map(|(top, sub)| (top.label(), sub.label())),
            Some(("Cardiovascular", "Vascular"))
        );
    }

    #[test]
    fn registry_kind_parses() {
        assert_eq!("hpo".parse::<RegistryKind>(), Ok(RegistryKind::Hpo));
        assert_eq!("GO".parse::<RegistryKind>(), Ok(RegistryKind::GeneOntology));
        assert!("mondo".parse::<RegistryKind>().is_err());
        assert_eq!(RegistryKind::GeneOntology.to_string(), "go");
    }
}
