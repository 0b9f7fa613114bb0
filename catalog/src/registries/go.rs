//! Gene Ontology sub-ontology categories.
//!
//! One anchor per aspect root, so GO annotations bucket into biological
//! process, molecular function, and cellular component.

use crate::category::Category;
use crate::model::{Aspect, TermId};

/// `biological_process` root.
pub const BIOLOGICAL_PROCESS: TermId = TermId::go(8150);
/// `molecular_function` root.
pub const MOLECULAR_FUNCTION: TermId = TermId::go(3674);
/// `cellular_component` root.
pub const CELLULAR_COMPONENT: TermId = TermId::go(5575);

/// Returns the root anchor of an aspect.
#[must_use]
pub fn root_of(aspect: Aspect) -> TermId {
    match aspect {
        Aspect::BiologicalProcess => BIOLOGICAL_PROCESS,
        Aspect::MolecularFunction => MOLECULAR_FUNCTION,
        Aspect::CellularComponent => CELLULAR_COMPONENT,
    }
}

/// Returns the GO category table.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        Category::new(BIOLOGICAL_PROCESS, "Biological process"),
        Category::new(MOLECULAR_FUNCTION, "Molecular function"),
        Category::new(CELLULAR_COMPONENT, "Cellular component"),
    ]
}
