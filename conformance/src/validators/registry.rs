//! Registry consistency validator.
//!
//! Checks a category registry against the ontology it will resolve into:
//! - Every anchor is a canonical term of the ontology (not missing, not an alias)
//! - Every subcategory exists, is listed once, and descends from its anchor
//! - No anchor sits below another anchor

use phenocat::{CategoryRegistry, Ontology, OntologyProvider, TermId};

use crate::report::{ConformanceReport, TestResult};

const ANCHORS: &str = "registry/anchors";
const SUBCATEGORIES: &str = "registry/subcategories";
const NESTING: &str = "registry/nesting";

/// Validates `registry` against `ontology`.
pub fn validate(ontology: &Ontology, registry: &CategoryRegistry) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    validate_anchors(ontology, registry, &mut report);
    validate_subcategories(ontology, registry, &mut report);
    validate_nesting(ontology, registry, &mut report);

    report
}

fn validate_anchors(
    ontology: &Ontology,
    registry: &CategoryRegistry,
    report: &mut ConformanceReport,
) {
    let mut errors = Vec::new();
    for category in registry {
        let id = category.id();
        match ontology.canonical_of(&id) {
            None => errors.push(format!("{} ({}) is not in the ontology", id, category.label())),
            Some(canonical) if canonical != id => errors.push(format!(
                "{} ({}) is an alias of {}",
                id,
                category.label(),
                canonical
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        report.push(TestResult::pass(
            ANCHORS,
            format!(
                "All {} anchors of the {} registry are canonical ontology terms",
                registry.len(),
                registry.name()
            ),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            ANCHORS,
            format!(
                "{} of {} anchors do not name a canonical term",
                errors.len(),
                registry.len()
            ),
            errors,
        ));
    }
}

fn validate_subcategories(
    ontology: &Ontology,
    registry: &CategoryRegistry,
    report: &mut ConformanceReport,
) {
    let mut errors = Vec::new();
    let mut checked = 0usize;
    for category in registry {
        for sub in category.subcategories() {
            checked += 1;
            let Some(canonical) = ontology.canonical_of(&sub.id()) else {
                errors.push(format!(
                    "{} ({}) under {} is not in the ontology",
                    sub.id(),
                    sub.label(),
                    category.id()
                ));
                continue;
            };
            let holder = registry.find_anywhere(&sub.id()).map(|(top, _)| top.id());
            if holder != Some(category.id()) {
                errors.push(format!(
                    "{} ({}) under {} is already listed under {}",
                    sub.id(),
                    sub.label(),
                    category.id(),
                    holder.map_or_else(|| "nothing".to_owned(), |id| id.to_string())
                ));
                continue;
            }
            if !ontology.exists_path(&canonical, &category.id()) {
                errors.push(format!(
                    "{} ({}) does not descend from its anchor {} ({})",
                    sub.id(),
                    sub.label(),
                    category.id(),
                    category.label()
                ));
            }
        }
    }

    if errors.is_empty() {
        report.push(TestResult::pass(
            SUBCATEGORIES,
            format!("All {} subcategories descend from their anchors", checked),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            SUBCATEGORIES,
            format!("{} of {} subcategories are misplaced", errors.len(), checked),
            errors,
        ));
    }
}

/// A nested anchor shadows the outer one: the search stops at the inner
/// anchor, so the outer category never collects terms below it.
fn validate_nesting(
    ontology: &Ontology,
    registry: &CategoryRegistry,
    report: &mut ConformanceReport,
) {
    let anchors: Vec<TermId> = registry.categories().collect();
    let mut nested = Vec::new();
    for inner in &anchors {
        for outer in &anchors {
            if ontology.exists_path(inner, outer) {
                nested.push(format!("{} is below {}", inner, outer));
            }
        }
    }

    if nested.is_empty() {
        report.push(TestResult::pass(NESTING, "No anchor is nested under another"));
    } else {
        report.push(TestResult::warn_with_details(
            NESTING,
            format!("{} nested anchor pair(s) found", nested.len()),
            nested,
        ));
    }
}
