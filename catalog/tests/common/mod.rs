//! Shared HPO-shaped fixture.
//!
//! A small slice of the Human Phenotype Ontology using real identifiers:
//!
//! ```text
//! All (HP:0000001)
//! ├── Phenotypic abnormality (HP:0000118)
//! │   ├── Cardiovascular (HP:0001626) ── Vasculature (HP:0002597) ── Aneurysm (HP:0002617)
//! │   ├── Nervous system (HP:0000707) ── Seizure (HP:0001250)
//! │   ├── Respiratory (HP:0002086) ─┐
//! │   ├── Neoplasm (HP:0002664) ────┴── Neoplasm of the lung (HP:0100526)
//! │   ├── Limbs (HP:0040064) ───┐
//! │   ├── Skeletal (HP:0000924) ┴── Abnormal limb bone (HP:0040068)
//! │   └── Growth (HP:0001507) ── Hemiatrophy (HP:0100556, alt HP:0005091)
//! └── Mode of inheritance (HP:0000005) ── Autosomal dominant (HP:0000006)
//! ```

#![allow(dead_code)]

use phenocat::{AnnotationRecord, CategoryRegistry, Ontology, Term, TermId};

pub const ALL: TermId = TermId::hp(1);
pub const PHENOTYPIC_ABNORMALITY: TermId = TermId::hp(118);
pub const VASCULATURE: TermId = TermId::hp(2597);
pub const ANEURYSM: TermId = TermId::hp(2617);
pub const SEIZURE: TermId = TermId::hp(1250);
pub const LUNG_NEOPLASM: TermId = TermId::hp(100_526);
pub const LIMB_BONE: TermId = TermId::hp(40_068);
pub const HEMIATROPHY: TermId = TermId::hp(100_556);
pub const HEMIATROPHY_ALT: TermId = TermId::hp(5091);
pub const MODE_OF_INHERITANCE: TermId = TermId::hp(5);
pub const AUTOSOMAL_DOMINANT: TermId = TermId::hp(6);

pub fn ontology() -> Ontology {
    use phenocat::registries::hpo::*;

    let terms = vec![
        Term::new(ALL, "All"),
        Term::new(PHENOTYPIC_ABNORMALITY, "Phenotypic abnormality").with_parents([ALL]),
        Term::new(CARDIOVASCULAR, "Abnormality of the cardiovascular system")
            .with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(VASCULATURE, "Abnormality of the vasculature").with_parents([CARDIOVASCULAR]),
        Term::new(ANEURYSM, "Arterial aneurysm").with_parents([VASCULATURE]),
        Term::new(NERVOUS_SYSTEM, "Abnormality of the nervous system")
            .with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(SEIZURE, "Seizure").with_parents([NERVOUS_SYSTEM]),
        Term::new(RESPIRATORY, "Abnormality of the respiratory system")
            .with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(NEOPLASM, "Neoplasm").with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(LUNG_NEOPLASM, "Neoplasm of the lung").with_parents([RESPIRATORY, NEOPLASM]),
        Term::new(LIMBS, "Abnormality of limbs").with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(SKELETAL, "Abnormality of the skeletal system")
            .with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(LIMB_BONE, "Abnormal limb bone morphology").with_parents([SKELETAL, LIMBS]),
        Term::new(GROWTH, "Growth abnormality").with_parents([PHENOTYPIC_ABNORMALITY]),
        Term::new(HEMIATROPHY, "Hemiatrophy")
            .with_parents([GROWTH])
            .with_alt_ids([HEMIATROPHY_ALT]),
        Term::new(MODE_OF_INHERITANCE, "Mode of inheritance").with_parents([ALL]),
        Term::new(AUTOSOMAL_DOMINANT, "Autosomal dominant inheritance")
            .with_parents([MODE_OF_INHERITANCE]),
    ];
    match Ontology::from_terms(terms) {
        Ok(ontology) => ontology,
        Err(err) => unreachable!("fixture ontology is well formed: {err}"),
    }
}

pub fn registry() -> CategoryRegistry {
    match CategoryRegistry::hpo() {
        Ok(registry) => registry,
        Err(err) => unreachable!("compiled-in registry is consistent: {err}"),
    }
}

pub fn record(entity: &str, term: TermId) -> AnnotationRecord {
    AnnotationRecord::new(entity, term)
}
