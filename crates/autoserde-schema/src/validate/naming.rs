use crate::prelude::*;
use std::collections::BTreeMap;

/// Wire names must be non-empty and unique within each plan.
pub fn validate_type(ty: &TypeDescriptor, errs: &mut ErrorTree) {
    for property in &ty.properties {
        if property.rename.as_deref().is_some_and(str::is_empty) {
            errs.add_at(
                format!("{}.{}", ty.path, property.name),
                "explicit wire name is empty",
            );
        }
    }

    check_unique(ty, "encode", ty.encodable(), errs);
    check_unique(ty, "decode", ty.decodable(), errs);
}

fn check_unique<'a>(
    ty: &TypeDescriptor,
    plan: &str,
    properties: impl Iterator<Item = &'a PropertyDescriptor>,
    errs: &mut ErrorTree,
) {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();

    for property in properties {
        let wire = ty.wire_name(property);
        if let Some(prev) = seen.insert(wire.clone(), &property.name) {
            errs.add_at(
                ty.path.clone(),
                format!(
                    "{plan} wire name '{wire}' is shared by '{prev}' and '{}'",
                    property.name
                ),
            );
        }
    }
}

/// Every constant must map to a distinct, non-empty wire string.
pub fn validate_enum(descriptor: &EnumDescriptor, errs: &mut ErrorTree) {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();

    for constant in &descriptor.constants {
        let wire = constant.rename.as_deref().unwrap_or(&constant.name);
        if wire.is_empty() {
            err!(errs, "{}::{} has an empty wire name", descriptor.path, constant.name);
            continue;
        }
        if let Some(prev) = seen.insert(wire, &constant.name) {
            errs.add_at(
                descriptor.path.clone(),
                format!("wire string '{wire}' is shared by '{prev}' and '{}'", constant.name),
            );
        }
    }
}
