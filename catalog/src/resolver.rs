//! Category resolution.
//!
//! Resolving a term walks its ancestors breadth-first, collecting every
//! registry anchor it reaches. A branch stops at the first anchor it hits;
//! other branches keep going, so a term under two incomparable organ systems
//! yields both. The registry's priority rule then picks one.

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::category::Category;
use crate::model::TermId;
use crate::ontology::OntologyProvider;
use crate::registry::CategoryRegistry;

/// Why a term could not be assigned a category. Both cases are recoverable:
/// callers report the term and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The id is neither a term nor an alias in the ontology.
    #[error("unknown term {0}")]
    UnknownTerm(TermId),

    /// No registry anchor is reachable from the (canonical) term.
    #[error("no category found for {0}")]
    NoCategoryFound(TermId),
}

impl ResolveError {
    /// The term the error is about.
    #[must_use]
    pub fn term(&self) -> TermId {
        match self {
            ResolveError::UnknownTerm(id) | ResolveError::NoCategoryFound(id) => *id,
        }
    }
}

/// Assigns terms to registry categories. Holds only shared borrows, so it is
/// cheap to copy into worker threads.
pub struct CategoryResolver<'a, O: ?Sized> {
    ontology: &'a O,
    registry: &'a CategoryRegistry,
}

impl<O: ?Sized> Clone for CategoryResolver<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized> Copy for CategoryResolver<'_, O> {}

impl<'a, O: OntologyProvider + ?Sized> CategoryResolver<'a, O> {
    /// Creates a resolver over an ontology and a registry.
    pub fn new(ontology: &'a O, registry: &'a CategoryRegistry) -> Self {
        Self { ontology, registry }
    }

    /// The ontology being resolved against.
    pub fn ontology(&self) -> &'a O {
        self.ontology
    }

    /// The registry being resolved into.
    pub fn registry(&self) -> &'a CategoryRegistry {
        self.registry
    }

    /// Maps `term` to its canonical id.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownTerm`] if `term` is neither a term nor
    /// an alias.
    pub fn canonical(&self, term: &TermId) -> Result<TermId, ResolveError> {
        self.ontology
            .canonical_of(term)
            .filter(|id| self.ontology.term_exists(id))
            .ok_or(ResolveError::UnknownTerm(*term))
    }

    /// All anchors reachable from `term`, in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownTerm`] if `term` is not in the ontology.
    pub fn ancestor_categories(&self, term: &TermId) -> Result<Vec<TermId>, ResolveError> {
        let canonical = self.canonical(term)?;
        Ok(self.reachable_anchors(canonical))
    }

    /// Resolves `term` to exactly one category.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownTerm`] if `term` is not in the ontology
    /// and [`ResolveError::NoCategoryFound`] if no anchor is reachable.
    pub fn resolve(&self, term: &TermId) -> Result<&'a Category, ResolveError> {
        let canonical = self.canonical(term)?;
        let anchors = self.reachable_anchors(canonical);
        if anchors.len() > 1 {
            trace!(term = %canonical, candidates = ?anchors, "several categories match");
        }
        self.registry
            .prioritized(&anchors)
            .ok_or(ResolveError::NoCategoryFound(canonical))
    }

    fn reachable_anchors(&self, start: TermId) -> Vec<TermId> {
        let mut anchors = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            if self.registry.contains(&node) {
                anchors.push(node);
                continue;
            }
            for parent in self.ontology.parents_of(&node) {
                if visited.insert(*parent) {
                    queue.push_back(*parent);
                }
            }
        }
        anchors.sort_by_key(|id| self.registry.rank_of(id));
        anchors
    }
}

/// Resolves `term` against `ontology` and `registry` in one call.
///
/// # Errors
///
/// See [`CategoryResolver::resolve`].
pub fn resolve<'a, O: OntologyProvider + ?Sized>(
    term: &TermId,
    ontology: &'a O,
    registry: &'a CategoryRegistry,
) -> Result<&'a Category, ResolveError> {
    CategoryResolver::new(ontology, registry).resolve(term)
}
