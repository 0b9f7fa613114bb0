//! Human Phenotype Ontology organ-system categories.
//!
//! The anchors are the upper-level "Abnormality of ..." classes directly
//! below Phenotypic abnormality (`HP:0000118`), giving a canonical per-organ
//! view of a disease's or gene's phenotype annotations.
//!
//! **Priority:** Neoplasm wins over any organ system it also falls under.

use crate::category::Category;
use crate::model::TermId;

/// Abnormal cellular phenotype.
pub const CELLULAR: TermId = TermId::hp(25_354);
/// Abnormality of blood and blood-forming tissues.
pub const BLOOD: TermId = TermId::hp(1871);
/// Abnormality of connective tissue.
pub const CONNECTIVE_TISSUE: TermId = TermId::hp(3549);
/// Abnormality of head or neck.
pub const HEAD_NECK: TermId = TermId::hp(152);
/// Abnormality of limbs.
pub const LIMBS: TermId = TermId::hp(40_064);
/// Abnormality of metabolism/homeostasis.
pub const METABOLISM: TermId = TermId::hp(1939);
/// Abnormality of prenatal development or birth.
pub const PRENATAL: TermId = TermId::hp(1197);
/// Abnormality of the breast.
pub const BREAST: TermId = TermId::hp(769);
/// Abnormality of the cardiovascular system.
pub const CARDIOVASCULAR: TermId = TermId::hp(1626);
/// Abnormality of the digestive system.
pub const DIGESTIVE: TermId = TermId::hp(25_031);
/// Abnormality of the ear.
pub const EAR: TermId = TermId::hp(598);
/// Abnormality of the endocrine system.
pub const ENDOCRINE: TermId = TermId::hp(818);
/// Abnormality of the eye.
pub const EYE: TermId = TermId::hp(478);
/// Abnormality of the genitourinary system.
pub const GENITOURINARY: TermId = TermId::hp(119);
/// Abnormality of the immune system.
pub const IMMUNE: TermId = TermId::hp(2715);
/// Abnormality of the integument.
pub const INTEGUMENT: TermId = TermId::hp(1574);
/// Abnormality of the musculature.
pub const MUSCULATURE: TermId = TermId::hp(3011);
/// Abnormality of the nervous system.
pub const NERVOUS_SYSTEM: TermId = TermId::hp(707);
/// Abnormality of the respiratory system.
pub const RESPIRATORY: TermId = TermId::hp(2086);
/// Abnormality of the skeletal system.
pub const SKELETAL: TermId = TermId::hp(924);
/// Abnormality of the thoracic cavity.
pub const THORACIC_CAVITY: TermId = TermId::hp(45_027);
/// Abnormality of the voice.
pub const VOICE: TermId = TermId::hp(1608);
/// Constitutional symptom.
pub const CONSTITUTIONAL: TermId = TermId::hp(25_142);
/// Growth abnormality.
pub const GROWTH: TermId = TermId::hp(1507);
/// Neoplasm.
pub const NEOPLASM: TermId = TermId::hp(2664);

/// Anchors that win ties, highest first.
pub const PRIORITY: &[TermId] = &[NEOPLASM];

/// Returns the HPO category table in display order.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        Category::new(CELLULAR, "Cellular phenotype"),
        Category::new(BLOOD, "Blood and blood-forming tissues"),
        Category::new(CONNECTIVE_TISSUE, "Connective tissue"),
        Category::new(HEAD_NECK, "Head and neck").with_subcategories(vec![
            Category::new(TermId::hp(234), "Head"),
            Category::new(TermId::hp(464), "Neck"),
        ]),
        Category::new(LIMBS, "Limbs"),
        Category::new(METABOLISM, "Metabolism/Laboratory abnormality"),
        Category::new(PRENATAL, "Prenatal and Birth"),
        Category::new(BREAST, "Breast"),
        Category::new(CARDIOVASCULAR, "Cardiovascular").with_subcategories(vec![
            Category::new(TermId::hp(2597), "Vascular"),
            Category::new(TermId::hp(10_948), "Fetal cardiovascular"),
        ]),
        Category::new(DIGESTIVE, "Digestive System"),
        Category::new(EAR, "Ear"),
        Category::new(ENDOCRINE, "Endocrine"),
        Category::new(EYE, "Eye"),
        Category::new(GENITOURINARY, "Genitourinary system").with_subcategories(vec![
            Category::new(TermId::hp(78), "Genital system"),
            Category::new(TermId::hp(79), "Urinary system"),
        ]),
        Category::new(IMMUNE, "Immunology"),
        Category::new(INTEGUMENT, "Skin, Hair, and Nails"),
        Category::new(MUSCULATURE, "Musculature"),
        Category::new(NERVOUS_SYSTEM, "Nervous System"),
        Category::new(RESPIRATORY, "Respiratory System"),
        Category::new(SKELETAL, "Skeletal system"),
        Category::new(THORACIC_CAVITY, "Thoracic cavity"),
        Category::new(VOICE, "Voice"),
        Category::new(CONSTITUTIONAL, "Constitutional Symptom"),
        Category::new(GROWTH, "Growth"),
        Category::new(NEOPLASM, "Neoplasm"),
    ]
}
