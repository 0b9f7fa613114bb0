//! Annotation aggregation.
//!
//! [`AnnotationAggregator`] runs the resolver over a stream of annotation
//! records and tallies how many land in each category. Records that cannot
//! be resolved are counted by reason in an [`UnresolvedTally`] and skipped;
//! nothing short of a broken ontology aborts a run.
//!
//! Accumulation is a commutative sum, so [`AnnotationAggregator::aggregate`]
//! and [`AnnotationAggregator::aggregate_parallel`] agree for any record
//! order.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{AnnotationRecord, Aspect, MalformedRecord, TermId};
use crate::ontology::OntologyProvider;
use crate::rank::top_n;
use crate::registry::CategoryRegistry;
use crate::resolver::{CategoryResolver, ResolveError};

/// Per-category annotation counts, keyed by anchor id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    counts: BTreeMap<TermId, u64>,
}

impl CategoryCounts {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `anchor`'s count, inserting it at zero first if absent.
    pub fn increment(&mut self, anchor: TermId) {
        self.add(anchor, 1);
    }

    /// Adds `n` to `anchor`'s count.
    pub fn add(&mut self, anchor: TermId, n: u64) {
        *self.counts.entry(anchor).or_insert(0) += n;
    }

    /// Count for `anchor`; zero if never seen.
    #[must_use]
    pub fn get(&self, anchor: &TermId) -> u64 {
        self.counts.get(anchor).copied().unwrap_or(0)
    }

    /// Sums another table into this one, key by key.
    pub fn merge(&mut self, other: CategoryCounts) {
        for (anchor, n) in other.counts {
            self.add(anchor, n);
        }
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of categories with a count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(anchor, count)` in anchor order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, u64)> + '_ {
        self.counts.iter().map(|(id, n)| (*id, *n))
    }

    /// The `n` largest counts, descending.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<(TermId, u64)> {
        top_n(self.iter(), n)
    }
}

impl FromIterator<(TermId, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (TermId, u64)>>(iter: I) -> Self {
        let mut counts = CategoryCounts::new();
        for (anchor, n) in iter {
            counts.add(anchor, n);
        }
        counts
    }
}

/// Records skipped during aggregation, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnresolvedTally {
    /// Records citing an id the ontology does not know.
    pub unknown_term: u64,
    /// Records whose term reaches no category anchor.
    pub no_category: u64,
    /// Records the annotation source could not parse.
    pub malformed: u64,
    /// Terms that hit [`ResolveError::NoCategoryFound`], with record counts.
    /// A non-empty map means the anchor list does not cover the data.
    pub unmapped: BTreeMap<TermId, u64>,
}

impl UnresolvedTally {
    /// Counts one resolution failure.
    pub fn record(&mut self, error: &ResolveError) {
        match error {
            ResolveError::UnknownTerm(_) => self.unknown_term += 1,
            ResolveError::NoCategoryFound(term) => {
                self.no_category += 1;
                *self.unmapped.entry(*term).or_insert(0) += 1;
            }
        }
    }

    /// Counts one malformed record.
    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    /// Total records skipped.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.unknown_term + self.no_category + self.malformed
    }

    /// Sums another tally into this one.
    pub fn merge(&mut self, other: UnresolvedTally) {
        self.unknown_term += other.unknown_term;
        self.no_category += other.no_category;
        self.malformed += other.malformed;
        for (term, n) in other.unmapped {
            *self.unmapped.entry(term).or_insert(0) += n;
        }
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Resolved records per category.
    pub counts: CategoryCounts,
    /// Records that were skipped, by reason.
    pub unresolved: UnresolvedTally,
    /// Records whose entity is outside the filter.
    pub filtered_out: u64,
}

impl Aggregation {
    /// Sums a partial result into this one.
    pub fn merge(&mut self, other: Aggregation) {
        self.counts.merge(other.counts);
        self.unresolved.merge(other.unresolved);
        self.filtered_out += other.filtered_out;
    }

    /// Number of records that landed in a category.
    #[must_use]
    pub fn resolved(&self) -> u64 {
        self.counts.total()
    }
}

/// Which entities an aggregation counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntityFilter {
    /// Every entity.
    #[default]
    All,
    /// Only the listed entity ids.
    Only(HashSet<String>),
}

impl EntityFilter {
    /// Restricts to the given entity ids.
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EntityFilter::Only(ids.into_iter().map(Into::into).collect())
    }

    /// Returns true if records for `entity_id` are counted.
    #[must_use]
    pub fn admits(&self, entity_id: &str) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Only(ids) => ids.contains(entity_id),
        }
    }
}

impl From<HashSet<String>> for EntityFilter {
    fn from(ids: HashSet<String>) -> Self {
        EntityFilter::Only(ids)
    }
}

/// Per-term annotation counts with the aspect each term was annotated under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermTally {
    /// Count and last-seen aspect per canonical term.
    pub terms: BTreeMap<TermId, TermCount>,
    /// Records citing an id the ontology does not know.
    pub unknown_term: u64,
}

/// One row of a [`TermTally`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TermCount {
    /// Number of admitted records citing the term.
    pub count: u64,
    /// Aspect from the most recent record that carried one.
    pub aspect: Option<Aspect>,
}

impl TermTally {
    /// The `n` most annotated terms, descending.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<(TermId, u64)> {
        top_n(self.terms.iter().map(|(id, c)| (*id, c.count)), n)
    }

    /// Record counts summed per aspect; terms without an aspect are left out.
    #[must_use]
    pub fn aspect_totals(&self) -> BTreeMap<Aspect, u64> {
        let mut totals = BTreeMap::new();
        for count in self.terms.values() {
            if let Some(aspect) = count.aspect {
                *totals.entry(aspect).or_insert(0) += count.count;
            }
        }
        totals
    }
}

/// Applies a [`CategoryResolver`] across annotation records.
pub struct AnnotationAggregator<'a, O: ?Sized> {
    resolver: CategoryResolver<'a, O>,
    filter: EntityFilter,
}

impl<'a, O: OntologyProvider + ?Sized> AnnotationAggregator<'a, O> {
    /// Creates an aggregator.
    pub fn new(resolver: CategoryResolver<'a, O>, filter: EntityFilter) -> Self {
        Self { resolver, filter }
    }

    /// The resolver in use.
    pub fn resolver(&self) -> CategoryResolver<'a, O> {
        self.resolver
    }

    /// The entity filter in use.
    pub fn filter(&self) -> &EntityFilter {
        &self.filter
    }

    /// Aggregates a lazily produced record stream. Malformed records are
    /// counted and skipped.
    pub fn aggregate<I>(&self, records: I) -> Aggregation
    where
        I: IntoIterator<Item = Result<AnnotationRecord, MalformedRecord>>,
    {
        let mut aggregation = Aggregation::default();
        for record in records {
            match record {
                Ok(record) => self.accumulate(&mut aggregation, &record),
                Err(err) => {
                    debug!(%err, "skipping malformed annotation record");
                    aggregation.unresolved.record_malformed();
                }
            }
        }
        self.report(&aggregation);
        aggregation
    }

    /// Aggregates already-parsed records.
    pub fn aggregate_records<'r, I>(&self, records: I) -> Aggregation
    where
        I: IntoIterator<Item = &'r AnnotationRecord>,
    {
        let mut aggregation = Aggregation::default();
        for record in records {
            self.accumulate(&mut aggregation, record);
        }
        self.report(&aggregation);
        aggregation
    }

    /// Aggregates on the rayon pool. Each worker folds into its own
    /// [`Aggregation`]; partials are merged by summation.
    pub fn aggregate_parallel(&self, records: &[AnnotationRecord]) -> Aggregation
    where
        O: Sync,
    {
        let aggregation = records
            .par_iter()
            .fold(Aggregation::default, |mut partial, record| {
                self.accumulate(&mut partial, record);
                partial
            })
            .reduce(Aggregation::default, |mut left, right| {
                left.merge(right);
                left
            });
        self.report(&aggregation);
        aggregation
    }

    /// Counts admitted records per canonical term, without resolving
    /// categories.
    pub fn tally_terms<'r, I>(&self, records: I) -> TermTally
    where
        I: IntoIterator<Item = &'r AnnotationRecord>,
    {
        let mut tally = TermTally::default();
        for record in records {
            if !self.filter.admits(&record.entity_id) {
                continue;
            }
            let Ok(term) = self.resolver.canonical(&record.term) else {
                tally.unknown_term += 1;
                continue;
            };
            let row = tally.terms.entry(term).or_default();
            row.count += 1;
            if record.aspect.is_some() {
                row.aspect = record.aspect;
            }
        }
        tally
    }

    fn accumulate(&self, aggregation: &mut Aggregation, record: &AnnotationRecord) {
        if !self.filter.admits(&record.entity_id) {
            aggregation.filtered_out += 1;
            return;
        }
        match self.resolver.resolve(&record.term) {
            Ok(category) => aggregation.counts.increment(category.id()),
            Err(err) => {
                debug!(entity = %record.entity_id, %err, "annotation left unresolved");
                aggregation.unresolved.record(&err);
            }
        }
    }

    fn report(&self, aggregation: &Aggregation) {
        info!(
            registry = self.resolver.registry().name(),
            resolved = aggregation.resolved(),
            unresolved = aggregation.unresolved.total(),
            filtered_out = aggregation.filtered_out,
            "aggregation finished"
        );
        if !aggregation.unresolved.unmapped.is_empty() {
            warn!(
                terms = aggregation.unresolved.unmapped.len(),
                records = aggregation.unresolved.no_category,
                "annotated terms fall outside every category anchor"
            );
        }
    }
}

/// Aggregates `records` against `ontology` and `registry` in one call.
pub fn aggregate<'r, O, I>(
    records: I,
    ontology: &O,
    registry: &CategoryRegistry,
    filter: EntityFilter,
) -> Aggregation
where
    O: OntologyProvider + ?Sized,
    I: IntoIterator<Item = &'r AnnotationRecord>,
{
    AnnotationAggregator::new(CategoryResolver::new(ontology, registry), filter)
        .aggregate_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::model::Term;
    use crate::ontology::Ontology;

    fn hp(code: u32) -> TermId {
        TermId::hp(code)
    }

    fn fixture() -> (Ontology, CategoryRegistry) {
        let ontology = Ontology::from_terms([
            Term::new(hp(1), "Root"),
            Term::new(hp(10), "A").with_parents([hp(1)]),
            Term::new(hp(11), "a1").with_parents([hp(10)]),
            Term::new(hp(20), "B").with_parents([hp(1)]),
            Term::new(hp(21), "b1").with_parents([hp(20)]).with_alt_ids([hp(921)]),
            Term::new(hp(30), "orphan").with_parents([hp(1)]),
        ]);
        let registry = CategoryRegistry::new(
            "test",
            vec![Category::new(hp(10), "A"), Category::new(hp(20), "B")],
            Vec::new(),
        );
        match (ontology, registry) {
            (Ok(o), Ok(r)) => (o, r),
            _ => unreachable!("fixture is well formed"),
        }
    }

    #[test]
    fn increment_inserts_then_adds() {
        let mut counts = CategoryCounts::new();
        counts.increment(hp(10));
        counts.increment(hp(10));
        counts.add(hp(20), 3);
        assert_eq!(counts.get(&hp(10)), 2);
        assert_eq!(counts.get(&hp(20)), 3);
        assert_eq!(counts.get(&hp(30)), 0);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.top_n(1), vec![(hp(20), 3)]);
    }

    #[test]
    fn counts_and_skips() {
        let (ontology, registry) = fixture();
        let records = vec![
            Ok(AnnotationRecord::new("g1", hp(11))),
            Ok(AnnotationRecord::new("g1", hp(11))),
            Ok(AnnotationRecord::new("g2", hp(921))),
            Ok(AnnotationRecord::new("g2", hp(30))),
            Ok(AnnotationRecord::new("g2", hp(777))),
            Ok(AnnotationRecord::new("g3", hp(11))),
            Err(MalformedRecord::new(7, "missing term column")),
        ];
        let aggregator = AnnotationAggregator::new(
            CategoryResolver::new(&ontology, &registry),
            EntityFilter::only(["g1", "g2"]),
        );
        let result = aggregator.aggregate(records);
        assert_eq!(result.counts.get(&hp(10)), 2);
        assert_eq!(result.counts.get(&hp(20)), 1);
        assert_eq!(result.unresolved.unknown_term, 1);
        assert_eq!(result.unresolved.no_category, 1);
        assert_eq!(result.unresolved.malformed, 1);
        assert_eq!(result.unresolved.unmapped.get(&hp(30)), Some(&1));
        assert_eq!(result.filtered_out, 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let (ontology, registry) = fixture();
        let records: Vec<AnnotationRecord> = (0..200)
            .map(|i| {
                let term = [hp(11), hp(21), hp(30), hp(404)][i % 4];
                AnnotationRecord::new(format!("g{}", i % 7), term)
            })
            .collect();
        let aggregator = AnnotationAggregator::new(
            CategoryResolver::new(&ontology, &registry),
            EntityFilter::All,
        );
        assert_eq!(
            aggregator.aggregate_parallel(&records),
            aggregator.aggregate_records(&records)
        );
    }

    #[test]
    fn tally_terms_canonicalises_and_keeps_aspect() {
        let (ontology, registry) = fixture();
        let records = vec![
            AnnotationRecord::new("g1", hp(21)).with_aspect(Aspect::BiologicalProcess),
            AnnotationRecord::new("g1", hp(921)),
            AnnotationRecord::new("g2", hp(11)).with_aspect(Aspect::CellularComponent),
            AnnotationRecord::new("g2", hp(555)),
        ];
        let aggregator = AnnotationAggregator::new(
            CategoryResolver::new(&ontology, &registry),
            EntityFilter::All,
        );
        let tally = aggregator.tally_terms(&records);
        assert_eq!(
            tally.terms.get(&hp(21)),
            Some(&TermCount {
                count: 2,
                aspect: Some(Aspect::BiologicalProcess),
            })
        );
        assert_eq!(tally.unknown_term, 1);
        assert_eq!(tally.top_n(1), vec![(hp(21), 2)]);
        assert_eq!(
            tally.aspect_totals(),
            BTreeMap::from([
                (Aspect::BiologicalProcess, 2),
                (Aspect::CellularComponent, 1),
            ])
        );
    }

    #[test]
    fn free_function_counts_everything_by_default() {
        let (ontology, registry) = fixture();
        let records = [
            AnnotationRecord::new("x", hp(11)),
            AnnotationRecord::new("y", hp(21)),
        ];
        let result = aggregate(&records, &ontology, &registry, EntityFilter::default());
        assert_eq!(result.resolved(), 2);
        assert_eq!(result.filtered_out, 0);
    }
}
