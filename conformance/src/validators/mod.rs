//! Registry and coverage validators.

pub mod coverage;
pub mod registry;
