//! Read-only ontology graph.
//!
//! [`OntologyProvider`] is the seam between the category engine and whatever
//! loaded the ontology. [`Ontology`] is the in-memory implementation; it is
//! assembled once through [`OntologyBuilder`], which enforces the loader
//! preconditions (unique ids, disjoint alias sets, known parents, no cycles)
//! so every later traversal can assume a well-formed DAG.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::model::{Term, TermId};

/// Read access to an ontology graph. Edges point child → parent.
pub trait OntologyProvider {
    /// Returns true if `id` is the canonical id of a term in the graph.
    /// Alias ids are not terms in their own right.
    fn term_exists(&self, id: &TermId) -> bool;

    /// Maps `id` to its canonical id: itself for a canonical term, the owning
    /// term for an alias, `None` when the id is unknown.
    fn canonical_of(&self, id: &TermId) -> Option<TermId>;

    /// Direct parents of the canonical term `id`; empty for roots and for
    /// unknown ids.
    fn parents_of(&self, id: &TermId) -> &[TermId];

    /// Label of the term `id` (alias ids are resolved first).
    fn label_of(&self, id: &TermId) -> Option<&str>;

    /// Every strict ancestor of `id`, found breadth-first.
    fn ancestors(&self, id: &TermId) -> BTreeSet<TermId> {
        let mut seen = BTreeSet::new();
        let Some(start) = self.canonical_of(id) else {
            return seen;
        };
        let mut queue: VecDeque<TermId> = self.parents_of(&start).iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if seen.insert(next) {
                queue.extend(self.parents_of(&next).iter().copied());
            }
        }
        seen
    }

    /// Returns true if `ancestor` is reachable from `descendant` through
    /// parent edges. A term never has a path to itself.
    fn exists_path(&self, descendant: &TermId, ancestor: &TermId) -> bool {
        match (self.canonical_of(descendant), self.canonical_of(ancestor)) {
            (Some(d), Some(a)) if d != a => self.ancestors(&d).contains(&a),
            _ => false,
        }
    }
}

/// Structural problems detected while building an [`Ontology`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OntologyError {
    /// Two terms share a canonical id.
    #[error("duplicate term {0}")]
    DuplicateTerm(TermId),

    /// An alias is claimed by two terms, or shadows a canonical id.
    #[error("alias {alias} of {owner} is already taken by {other}")]
    AliasCollision {
        /// The contested alias.
        alias: TermId,
        /// The term declaring the alias.
        owner: TermId,
        /// The term that already holds that id.
        other: TermId,
    },

    /// A parent edge points at an id that is neither a term nor an alias.
    #[error("term {child} has unknown parent {parent}")]
    UnknownParent {
        /// The term declaring the edge.
        child: TermId,
        /// The missing parent.
        parent: TermId,
    },

    /// The parent edges form a cycle through this term.
    #[error("is_a cycle through {0}")]
    Cycle(TermId),
}

/// Collects terms and validates them into an [`Ontology`].
#[derive(Debug, Default)]
pub struct OntologyBuilder {
    terms: Vec<Term>,
}

impl OntologyBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one term.
    #[must_use]
    pub fn term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    /// Adds one term through a mutable reference.
    pub fn add_term(&mut self, term: Term) -> &mut Self {
        self.terms.push(term);
        self
    }

    /// Validates the collected terms and freezes them into an [`Ontology`].
    ///
    /// Parent edges written with alias ids are rewritten to canonical ids.
    ///
    /// # Errors
    ///
    /// Returns an [`OntologyError`] for duplicate ids, overlapping alias sets,
    /// dangling parent edges, or cycles.
    pub fn build(self) -> Result<Ontology, OntologyError> {
        let mut order = Vec::with_capacity(self.terms.len());
        let mut terms: HashMap<TermId, Term> = HashMap::with_capacity(self.terms.len());
        for term in self.terms {
            if terms.contains_key(&term.id) {
                return Err(OntologyError::DuplicateTerm(term.id));
            }
            order.push(term.id);
            terms.insert(term.id, term);
        }

        let mut aliases: HashMap<TermId, TermId> = HashMap::new();
        for id in &order {
            let Some(term) = terms.get(id) else { continue };
            for alt in &term.alt_ids {
                if terms.contains_key(alt) {
                    return Err(OntologyError::AliasCollision {
                        alias: *alt,
                        owner: *id,
                        other: *alt,
                    });
                }
                match aliases.get(alt) {
                    Some(other) if other != id => {
                        return Err(OntologyError::AliasCollision {
                            alias: *alt,
                            owner: *id,
                            other: *other,
                        });
                    }
                    Some(_) => {}
                    None => {
                        aliases.insert(*alt, *id);
                    }
                }
            }
        }

        for id in &order {
            let parents = match terms.get(id) {
                Some(term) => term.parents.clone(),
                None => continue,
            };
            let mut canonical: Vec<TermId> = Vec::with_capacity(parents.len());
            for parent in parents {
                let resolved = if terms.contains_key(&parent) {
                    parent
                } else if let Some(owner) = aliases.get(&parent) {
                    *owner
                } else {
                    return Err(OntologyError::UnknownParent {
                        child: *id,
                        parent,
                    });
                };
                if !canonical.contains(&resolved) {
                    canonical.push(resolved);
                }
            }
            if let Some(term) = terms.get_mut(id) {
                term.parents = canonical;
            }
        }

        if let Some(id) = find_cycle(&terms, &order) {
            return Err(OntologyError::Cycle(id));
        }

        Ok(Ontology {
            terms,
            aliases,
            order,
        })
    }
}

/// Iterative three-colour DFS over parent edges.
fn find_cycle(terms: &HashMap<TermId, Term>, order: &[TermId]) -> Option<TermId> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Open,
        Done,
    }

    let mut marks: HashMap<TermId, Mark> = HashMap::with_capacity(order.len());
    for &start in order {
        if marks.contains_key(&start) {
            continue;
        }
        marks.insert(start, Mark::Open);
        let mut stack: Vec<(TermId, usize)> = vec![(start, 0)];
        while let Some(&(node, next)) = stack.last() {
            let parents = terms.get(&node).map_or(&[][..], |t| t.parents.as_slice());
            match parents.get(next) {
                Some(&parent) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match marks.get(&parent) {
                        Some(Mark::Open) => return Some(parent),
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(parent, Mark::Open);
                            stack.push((parent, 0));
                        }
                    }
                }
                None => {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                }
            }
        }
    }
    None
}

/// An immutable, validated ontology held in memory.
///
/// Safe to share across threads by reference; nothing mutates it after
/// [`OntologyBuilder::build`].
#[derive(Debug, Clone)]
pub struct Ontology {
    terms: HashMap<TermId, Term>,
    aliases: HashMap<TermId, TermId>,
    order: Vec<TermId>,
}

impl Ontology {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> OntologyBuilder {
        OntologyBuilder::new()
    }

    /// Builds an ontology from a sequence of terms.
    ///
    /// # Errors
    ///
    /// See [`OntologyBuilder::build`].
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Result<Self, OntologyError> {
        OntologyBuilder {
            terms: terms.into_iter().collect(),
        }
        .build()
    }

    /// Looks up a term by canonical or alias id.
    #[must_use]
    pub fn get(&self, id: &TermId) -> Option<&Term> {
        self.canonical_of(id).and_then(|c| self.terms.get(&c))
    }

    /// Iterates terms in the order they were added.
    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.order.iter().filter_map(|id| self.terms.get(id))
    }

    /// Terms without parents.
    pub fn roots(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms().filter(|t| t.parents.is_empty())
    }

    /// Returns true if `id` is an alias rather than a canonical id.
    #[must_use]
    pub fn is_alias(&self, id: &TermId) -> bool {
        self.aliases.contains_key(id)
    }

    /// Number of canonical terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the ontology holds no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of alias ids.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

impl OntologyProvider for Ontology {
    fn term_exists(&self, id: &TermId) -> bool {
        self.terms.contains_key(id)
    }

    fn canonical_of(&self, id: &TermId) -> Option<TermId> {
        if self.terms.contains_key(id) {
            Some(*id)
        } else {
            self.aliases.get(id).copied()
        }
    }

    fn parents_of(&self, id: &TermId) -> &[TermId] {
        self.terms.get(id).map_or(&[][..], |t| t.parents.as_slice())
    }

    fn label_of(&self, id: &TermId) -> Option<&str> {
        self.get(id).map(|t| t.label.as_str())
    }
}
