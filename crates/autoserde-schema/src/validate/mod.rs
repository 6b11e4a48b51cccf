//! Schema validation.
//!
//! Runs every check and reports all problems at once rather than stopping
//! at the first.

pub mod naming;

use crate::{catalog::Schema, error::ErrorTree};

/// Validate every type and enum in the schema.
pub(crate) fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    for ty in schema.types() {
        naming::validate_type(ty, &mut errs);
    }
    for descriptor in schema.enums() {
        naming::validate_enum(descriptor, &mut errs);
    }

    errs.result()
}
