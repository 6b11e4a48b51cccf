use super::{SynthContext, WireNames};
use crate::{
    error::SynthesisError,
    plan::{DecodeField, DecodePlan},
};
use autoserde_schema::node::TypeDescriptor;
use std::collections::BTreeSet;
use tracing::debug;

/// Build the decode plan for one type.
///
/// Only default-construct-then-set is supported, so a type without a
/// zero-argument constructor is rejected before anything else.
pub fn synthesize_decoder(
    ty: &TypeDescriptor,
    ctx: &SynthContext<'_>,
) -> Result<DecodePlan, SynthesisError> {
    if !ty.constructible {
        return Err(SynthesisError::UnsupportedConstruction {
            type_path: ty.path.clone(),
        });
    }

    let mut names = WireNames::default();
    let mut fields = Vec::new();

    for property in ty.decodable() {
        let Some(setter) = &property.setter else {
            continue;
        };
        let wire_name = ty.wire_name(property);
        names.claim(ty, &wire_name, &property.name)?;

        fields.push(DecodeField {
            property: property.name.clone(),
            op: ctx.value_op(ty, property)?,
            wire_name,
            setter: setter.method.clone(),
        });
    }

    // excluded properties stay known so they never count as unknown
    let mut ignored: BTreeSet<String> = ty.policy.ignored.iter().cloned().collect();
    ignored.extend(
        ty.properties
            .iter()
            .filter(|p| ty.is_excluded(p))
            .map(|p| ty.wire_name(p)),
    );

    debug!(ty = %ty.path, fields = fields.len(), ignored = ignored.len(), "decoder synthesized");

    Ok(DecodePlan::new(
        ty.path.clone(),
        fields,
        ignored,
        ty.policy.ignore_unknown,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plan::{FieldAction, ValueOp},
        test_support::{foo_schema, foo_type},
    };
    use autoserde_schema::{
        node::PropertyDescriptor,
        policy::TypePolicy,
        types::ValueType,
    };

    #[test]
    fn dispatch_table_uses_wire_names() {
        let schema = foo_schema();
        let plan = synthesize_decoder(&foo_type(), &SynthContext::new(&schema)).unwrap();

        let FieldAction::Decode(field) = plan.resolve("status") else {
            panic!("status should decode");
        };
        assert_eq!(field.setter, "setStatus");
        assert!(matches!(field.op, ValueOp::Enum(_)));
        assert_eq!(plan.resolve("extra"), FieldAction::Unknown);
    }

    #[test]
    fn missing_default_constructor_is_unsupported() {
        let schema = foo_schema();
        let ty = foo_type().without_default_constructor();

        assert_eq!(
            synthesize_decoder(&ty, &SynthContext::new(&schema)),
            Err(SynthesisError::UnsupportedConstruction {
                type_path: "app::Foo".into()
            })
        );
    }

    #[test]
    fn ignored_properties_are_skipped_not_unknown() {
        let schema = foo_schema();
        let ty = TypeDescriptor::new("app::Secretive")
            .property(
                PropertyDescriptor::new("secret", ValueType::Text)
                    .with_getter("getSecret")
                    .with_setter("setSecret")
                    .ignore(),
            )
            .property(
                PropertyDescriptor::new("pin", ValueType::Text)
                    .with_setter("setPin")
                    .renamed("PIN"),
            )
            .with_policy(TypePolicy {
                ignored: BTreeSet::from(["pin".to_string(), "legacy".to_string()]),
                ..TypePolicy::default()
            });

        let plan = synthesize_decoder(&ty, &SynthContext::new(&schema)).unwrap();

        assert!(plan.fields.is_empty());
        assert_eq!(plan.resolve("secret"), FieldAction::Skip);
        assert_eq!(plan.resolve("PIN"), FieldAction::Skip);
        assert_eq!(plan.resolve("legacy"), FieldAction::Skip);
        assert_eq!(plan.resolve("other"), FieldAction::Unknown);
    }

    #[test]
    fn read_only_properties_are_not_in_the_plan() {
        let schema = foo_schema();
        let ty = TypeDescriptor::new("app::ReadOnly").property(
            PropertyDescriptor::new("total", ValueType::Text).with_getter("getTotal"),
        );

        let plan = synthesize_decoder(&ty, &SynthContext::new(&schema)).unwrap();
        assert_eq!(plan.resolve("total"), FieldAction::Unknown);
    }
}
