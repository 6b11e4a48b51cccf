use super::{SynthContext, WireNames};
use crate::{
    error::SynthesisError,
    plan::{EncodePlan, EncodeStep, Guard, ValueOp},
};
use autoserde_schema::{
    node::{PropertyDescriptor, TypeDescriptor},
    types::Inclusion,
};
use tracing::debug;

/// Build the encode plan for one type.
pub fn synthesize_encoder(
    ty: &TypeDescriptor,
    ctx: &SynthContext<'_>,
) -> Result<EncodePlan, SynthesisError> {
    let mut names = WireNames::default();
    let mut steps = Vec::new();

    for property in ty.encodable() {
        let Some(getter) = &property.getter else {
            continue;
        };
        let wire_name = ty.wire_name(property);
        names.claim(ty, &wire_name, &property.name)?;

        let op = ctx.value_op(ty, property)?;
        steps.push(EncodeStep {
            property: property.name.clone(),
            wire_name,
            getter: getter.method.clone(),
            guard: guard(property, &op),
            op,
        });
    }

    debug!(ty = %ty.path, steps = steps.len(), "encoder synthesized");

    Ok(EncodePlan {
        type_path: ty.path.clone(),
        steps,
    })
}

// NON_NULL only applies to nullable values.
const fn guard(property: &PropertyDescriptor, op: &ValueOp) -> Guard {
    if !op.is_nullable() {
        return Guard::Unconditional;
    }

    match property.inclusion {
        Inclusion::NonNull => Guard::SkipWhenAbsent,
        Inclusion::Always => Guard::NullWhenAbsent,
    }
}
