//! Category values.
//!
//! A [`Category`] is anchored at one ontology term and may carry an ordered
//! list of subcategories. Subcategories are display metadata: the resolver
//! only ever matches top-level anchors.

use crate::model::TermId;

/// A named grouping of ontology terms anchored at one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: TermId,
    label: &'static str,
    subcategories: Vec<Category>,
}

impl Category {
    /// Creates a category with no subcategories.
    #[must_use]
    pub const fn new(id: TermId, label: &'static str) -> Self {
        Self {
            id,
            label,
            subcategories: Vec::new(),
        }
    }

    /// Attaches subcategories, in display order.
    #[must_use]
    pub fn with_subcategories(mut self, subcategories: Vec<Category>) -> Self {
        self.subcategories = subcategories;
        self
    }

    /// Anchor term id.
    #[must_use]
    pub fn id(&self) -> TermId {
        self.id
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Subcategories in display order.
    #[must_use]
    pub fn subcategories(&self) -> &[Category] {
        &self.subcategories
    }

    /// Finds a direct subcategory by anchor id.
    #[must_use]
    pub fn subcategory(&self, id: &TermId) -> Option<&Category> {
        self.subcategories.iter().find(|c| c.id == *id)
    }
}
