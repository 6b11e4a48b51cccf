//! Type-case classification.
//!
//! Both synthesizers dispatch on `TypeCase`, so the encode and decode
//! strategy for a value type can never drift apart.

use crate::prelude::*;
use thiserror::Error as ThisError;

///
/// CodecLookup
/// What the classifier may ask about named types.
///

pub trait CodecLookup {
    fn enum_descriptor(&self, path: &str) -> Option<&EnumDescriptor>;

    /// True when the named type has (or will have) its own codec.
    fn has_codec(&self, path: &str) -> bool;
}

///
/// TypeCase
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeCase {
    Boolean,
    Numeric(NumericKind),
    Text,
    Enum(EnumDescriptor),
    Sequence(Box<Self>),
    AssociativeMap { key: KeyCase, value: Box<Self> },
    Nested(String),
    Optional(Box<Self>),
}

impl TypeCase {
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

///
/// KeyCase
/// Map keys are always text on the wire; this records how to convert.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyCase {
    Text,
    Boolean,
    Numeric(NumericKind),
    Enum(EnumDescriptor),
}

///
/// ClassifyError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ClassifyError {
    #[error("type '{0}' has no registered codec")]
    NoCodec(String),

    #[error("map key type '{0}' cannot be written as text")]
    UnsupportedKey(ValueType),

    #[error("nested optional '{0}' is not supported")]
    NestedOptional(ValueType),
}

/// Classify a declared value type.
pub fn classify(ty: &ValueType, lookup: &dyn CodecLookup) -> Result<TypeCase, ClassifyError> {
    match ty {
        ValueType::Bool => Ok(TypeCase::Boolean),
        ValueType::Numeric(kind) => Ok(TypeCase::Numeric(*kind)),
        ValueType::Text => Ok(TypeCase::Text),
        ValueType::Optional(inner) => {
            if inner.is_nullable() {
                return Err(ClassifyError::NestedOptional(ty.clone()));
            }
            Ok(TypeCase::Optional(Box::new(classify(inner, lookup)?)))
        }
        ValueType::Sequence(item) => Ok(TypeCase::Sequence(Box::new(classify(item, lookup)?))),
        ValueType::Map { key, value } => Ok(TypeCase::AssociativeMap {
            key: classify_key(key, lookup)?,
            value: Box::new(classify(value, lookup)?),
        }),
        ValueType::Named(path) => {
            if let Some(descriptor) = lookup.enum_descriptor(path) {
                Ok(TypeCase::Enum(descriptor.clone()))
            } else if lookup.has_codec(path) {
                Ok(TypeCase::Nested(path.clone()))
            } else {
                Err(ClassifyError::NoCodec(path.clone()))
            }
        }
    }
}

fn classify_key(ty: &ValueType, lookup: &dyn CodecLookup) -> Result<KeyCase, ClassifyError> {
    match classify(ty, lookup)? {
        TypeCase::Text => Ok(KeyCase::Text),
        TypeCase::Boolean => Ok(KeyCase::Boolean),
        TypeCase::Numeric(kind) => Ok(KeyCase::Numeric(kind)),
        TypeCase::Enum(descriptor) => Ok(KeyCase::Enum(descriptor)),
        _ => Err(ClassifyError::UnsupportedKey(ty.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    struct Lookup {
        enums: Vec<EnumDescriptor>,
        codecs: BTreeSet<&'static str>,
    }

    impl CodecLookup for Lookup {
        fn enum_descriptor(&self, path: &str) -> Option<&EnumDescriptor> {
            self.enums.iter().find(|e| e.path == path)
        }

        fn has_codec(&self, path: &str) -> bool {
            self.codecs.contains(path)
        }
    }

    fn lookup() -> Lookup {
        Lookup {
            enums: vec![EnumDescriptor::new("app::Status").constant(EnumConstant::new("ACTIVE"))],
            codecs: BTreeSet::from(["app::Address"]),
        }
    }

    #[test]
    fn scalars_map_directly() {
        let l = lookup();

        assert_eq!(classify(&ValueType::Bool, &l), Ok(TypeCase::Boolean));
        assert_eq!(classify(&ValueType::Text, &l), Ok(TypeCase::Text));
        assert_eq!(
            classify(&ValueType::Numeric(NumericKind::F32), &l),
            Ok(TypeCase::Numeric(NumericKind::F32))
        );
    }

    #[test]
    fn collections_recurse() {
        let l = lookup();
        let ty = ValueType::map(
            ValueType::Text,
            ValueType::sequence(ValueType::optional(ValueType::named("app::Address"))),
        );

        assert_eq!(
            classify(&ty, &l),
            Ok(TypeCase::AssociativeMap {
                key: KeyCase::Text,
                value: Box::new(TypeCase::Sequence(Box::new(TypeCase::Optional(Box::new(
                    TypeCase::Nested("app::Address".to_string())
                ))))),
            })
        );
    }

    #[test]
    fn named_types_resolve_enum_before_codec() {
        let l = lookup();

        assert!(matches!(
            classify(&ValueType::named("app::Status"), &l),
            Ok(TypeCase::Enum(_))
        ));
        assert_eq!(
            classify(&ValueType::named("app::Unknown"), &l),
            Err(ClassifyError::NoCodec("app::Unknown".to_string()))
        );
    }

    #[test]
    fn structured_keys_are_rejected() {
        let l = lookup();
        let ty = ValueType::map(ValueType::named("app::Address"), ValueType::Text);

        assert!(matches!(
            classify(&ty, &l),
            Err(ClassifyError::UnsupportedKey(_))
        ));
        assert!(matches!(
            classify(&ValueType::map(ValueType::named("app::Status"), ValueType::Bool), &l),
            Ok(TypeCase::AssociativeMap { key: KeyCase::Enum(_), .. })
        ));
    }
}
