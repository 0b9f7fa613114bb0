//! Aggregation over annotation records.
//!
//! Property tests check that accumulation is order-independent and that
//! map-reduce over partial tables equals one sequential pass.

mod common;

use common::*;
use phenocat::registries::hpo;
use phenocat::{
    aggregate, AnnotationAggregator, AnnotationRecord, CategoryCounts, CategoryResolver,
    EntityFilter, MalformedRecord, TermId,
};
use proptest::prelude::*;

/// Terms mixing single-anchor, multi-anchor, alias, unmapped, and unknown.
const POOL: [TermId; 8] = [
    ANEURYSM,
    SEIZURE,
    LUNG_NEOPLASM,
    LIMB_BONE,
    HEMIATROPHY_ALT,
    AUTOSOMAL_DOMINANT,
    TermId::hp(4_040_404),
    hpo::EYE,
];

fn arb_record() -> impl Strategy<Value = AnnotationRecord> {
    (0usize..5, 0usize..POOL.len())
        .prop_map(|(entity, term)| record(&format!("g{entity}"), POOL[term]))
}

fn arb_records() -> impl Strategy<Value = Vec<AnnotationRecord>> {
    prop::collection::vec(arb_record(), 0..60)
}

#[test]
fn counts_repeated_and_distinct_records() {
    let ontology = ontology();
    let registry = registry();
    let records = [
        record("g1", ANEURYSM),
        record("g1", ANEURYSM),
        record("g2", SEIZURE),
    ];
    let result = aggregate(
        &records,
        &ontology,
        &registry,
        EntityFilter::only(["g1", "g2"]),
    );
    let expected: CategoryCounts = [(hpo::CARDIOVASCULAR, 2), (hpo::NERVOUS_SYSTEM, 1)]
        .into_iter()
        .collect();
    assert_eq!(result.counts, expected);
    assert_eq!(result.unresolved.total(), 0);
}

#[test]
fn entity_filter_excludes_other_entities() {
    let ontology = ontology();
    let registry = registry();
    let records = [record("g1", ANEURYSM), record("g9", SEIZURE)];
    let result = aggregate(&records, &ontology, &registry, EntityFilter::only(["g1"]));
    assert_eq!(result.counts.total(), 1);
    assert_eq!(result.filtered_out, 1);
    assert_eq!(result.counts.get(&hpo::NERVOUS_SYSTEM), 0);
}

#[test]
fn failures_are_tallied_not_fatal() {
    let ontology = ontology();
    let registry = registry();
    let aggregator = AnnotationAggregator::new(
        CategoryResolver::new(&ontology, &registry),
        EntityFilter::All,
    );
    let stream = vec![
        Ok(record("g1", AUTOSOMAL_DOMINANT)),
        Err(MalformedRecord::new(2, "term column is empty")),
        Ok(record("g1", TermId::hp(4_040_404))),
        Ok(record("g1", HEMIATROPHY_ALT)),
        Ok(record("g2", AUTOSOMAL_DOMINANT)),
    ];
    let result = aggregator.aggregate(stream);
    assert_eq!(result.counts.get(&hpo::GROWTH), 1);
    assert_eq!(result.unresolved.malformed, 1);
    assert_eq!(result.unresolved.unknown_term, 1);
    assert_eq!(result.unresolved.no_category, 2);
    assert_eq!(
        result.unresolved.unmapped.get(&AUTOSOMAL_DOMINANT),
        Some(&2)
    );
}

#[test]
fn top_three_of_counts() {
    let counts: CategoryCounts = [
        (hpo::EYE, 5),
        (hpo::EAR, 2),
        (hpo::NEOPLASM, 9),
        (hpo::VOICE, 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        counts.top_n(3),
        vec![(hpo::NEOPLASM, 9), (hpo::EYE, 5), (hpo::EAR, 2)]
    );
}

#[test]
fn counts_serialize_as_id_keyed_map() {
    let counts: CategoryCounts = [(hpo::EYE, 3)].into_iter().collect();
    let json = serde_json::to_string(&counts).unwrap_or_default();
    assert_eq!(json, r#"{"HP:0000478":3}"#);
}

proptest! {
    #[test]
    fn prop_order_does_not_matter(
        (records, permuted) in arb_records()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle())),
    ) {
        let ontology = ontology();
        let registry = registry();
        let original = aggregate(&records, &ontology, &registry, EntityFilter::All);
        let shuffled = aggregate(&permuted, &ontology, &registry, EntityFilter::All);
        prop_assert_eq!(original, shuffled);
    }

    #[test]
    fn prop_merged_partials_equal_sequential(
        left in arb_records(),
        right in arb_records(),
    ) {
        let ontology = ontology();
        let registry = registry();
        let filter = EntityFilter::only(["g0", "g2", "g4"]);
        let mut merged = aggregate(&left, &ontology, &registry, filter.clone());
        merged.merge(aggregate(&right, &ontology, &registry, filter.clone()));

        let all: Vec<AnnotationRecord> = left.iter().chain(right.iter()).cloned().collect();
        let sequential = aggregate(&all, &ontology, &registry, filter);
        prop_assert_eq!(merged, sequential);
    }

    #[test]
    fn prop_parallel_equals_sequential(records in arb_records()) {
        let ontology = ontology();
        let registry = registry();
        let aggregator = AnnotationAggregator::new(
            CategoryResolver::new(&ontology, &registry),
            EntityFilter::All,
        );
        prop_assert_eq!(
            aggregator.aggregate_parallel(&records),
            aggregator.aggregate_records(&records)
        );
    }

    #[test]
    fn prop_every_admitted_record_is_accounted_for(records in arb_records()) {
        let ontology = ontology();
        let registry = registry();
        let result = aggregate(&records, &ontology, &registry, EntityFilter::All);
        prop_assert_eq!(
            result.resolved() + result.unresolved.total(),
            records.len() as u64
        );
    }
}
