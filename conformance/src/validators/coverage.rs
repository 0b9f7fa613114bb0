//! Coverage validator.
//!
//! Resolves every term of the ontology and reports terms that fall through
//! the anchor list. Only terms inside the region the registry is meant to
//! cover count as gaps: that region is everything below a direct parent of
//! some anchor. Terms elsewhere (other sub-ontologies, the anchor parents
//! themselves) are expected to stay unmapped.

use std::collections::HashSet;

use phenocat::{
    CategoryRegistry, CategoryResolver, Ontology, OntologyProvider, ResolveError, TermId,
};
use tracing::debug;

use crate::report::{ConformanceReport, TestResult};

const COVERAGE: &str = "coverage/terms";
const GAPS: &str = "coverage/gaps";

/// Resolves every term in `ontology` through `registry` and reports gaps.
pub fn validate(ontology: &Ontology, registry: &CategoryRegistry) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let resolver = CategoryResolver::new(ontology, registry);
    let scope = anchor_parents(ontology, registry);

    let mut resolved = 0usize;
    let mut out_of_scope = 0usize;
    let mut gaps = Vec::new();
    for term in ontology.terms() {
        match resolver.resolve(&term.id) {
            Ok(_) => resolved += 1,
            Err(ResolveError::NoCategoryFound(id)) if in_scope(ontology, &scope, &id) => {
                gaps.push(format!("{} ({})", id, term.label));
            }
            Err(_) => out_of_scope += 1,
        }
    }
    debug!(
        registry = registry.name(),
        resolved,
        out_of_scope,
        gaps = gaps.len(),
        "coverage computed"
    );

    report.push(TestResult::pass(
        COVERAGE,
        format!(
            "Resolved {} of {} terms into {} categories ({} outside the covered region)",
            resolved,
            ontology.len(),
            registry.name(),
            out_of_scope
        ),
    ));

    if gaps.is_empty() {
        report.push(TestResult::pass(
            GAPS,
            "Every term below the anchor parents reaches an anchor",
        ));
    } else {
        report.push(TestResult::warn_with_details(
            GAPS,
            format!("{} term(s) below the anchor parents reach no anchor", gaps.len()),
            gaps,
        ));
    }

    report
}

/// Direct parents of the anchors, excluding anchors themselves.
fn anchor_parents(ontology: &Ontology, registry: &CategoryRegistry) -> HashSet<TermId> {
    registry
        .categories()
        .filter_map(|anchor| ontology.canonical_of(&anchor))
        .flat_map(|anchor| ontology.parents_of(&anchor).iter().copied())
        .filter(|parent| !registry.contains(parent))
        .collect()
}

fn in_scope(ontology: &Ontology, scope: &HashSet<TermId>, id: &TermId) -> bool {
    !scope.contains(id) && ontology.ancestors(id).iter().any(|a| scope.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phenocat::{Category, Term};

    fn hp(code: u32) -> TermId {
        TermId::hp(code)
    }

    // Root(1) ─ Abnormality(2) ─ A(10) ─ a1(11)
    //         │                ├ B(20)
    //         │                └ stray(30) ─ stray child(31)
    //         └ Inheritance(5) ─ dominant(6)
    fn fixture() -> (Ontology, CategoryRegistry) {
        let ontology = Ontology::from_terms([
            Term::new(hp(1), "Root"),
            Term::new(hp(2), "Abnormality").with_parents([hp(1)]),
            Term::new(hp(10), "A").with_parents([hp(2)]),
            Term::new(hp(11), "a1").with_parents([hp(10)]),
            Term::new(hp(20), "B").with_parents([hp(2)]),
            Term::new(hp(30), "stray").with_parents([hp(2)]),
            Term::new(hp(31), "stray child").with_parents([hp(30)]),
            Term::new(hp(5), "Inheritance").with_parents([hp(1)]),
            Term::new(hp(6), "dominant").with_parents([hp(5)]),
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
    fn gaps_are_reported_as_warnings() {
        let (ontology, registry) = fixture();
        let report = validate(&ontology, &registry);
        assert!(report.all_passed());

        let Some(gaps) = report.by_validator(GAPS).next() else {
            unreachable!("gap check always reports")
        };
        assert!(gaps.is_warning());
        assert_eq!(
            gaps.details,
            vec![
                "HP:0000030 (stray)".to_string(),
                "HP:0000031 (stray child)".to_string()
            ]
        );

        let Some(summary) = report.by_validator(COVERAGE).next() else {
            unreachable!("coverage check always reports")
        };
        assert!(summary.message.starts_with("Resolved 3 of 9 terms"));
        assert!(summary.message.contains("(4 outside the covered region)"));
    }

    #[test]
    fn full_coverage_passes_cleanly() {
        let Ok(ontology) = Ontology::from_terms([
            Term::new(hp(2), "Abnormality"),
            Term::new(hp(10), "A").with_parents([hp(2)]),
            Term::new(hp(11), "a1").with_parents([hp(10)]),
        ]) else {
            unreachable!("fixture is well formed")
        };
        let categories = vec![Category::new(hp(10), "A")];
        let Ok(registry) = CategoryRegistry::new("test", categories, Vec::new()) else {
            unreachable!("fixture registry is well formed")
        };
        let report = validate(&ontology, &registry);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.failure_count(), 0);
    }
}
