//! Encoder and decoder synthesis.
//!
//! Both synthesizers walk the descriptor in property order and lower each
//! value type through the shared classifier, so a type case always gets the
//! same strategy in both directions.

mod decoder;
mod encoder;

pub use decoder::synthesize_decoder;
pub use encoder::synthesize_encoder;

use crate::{
    error::SynthesisError,
    plan::{EnumTable, KeyOp, ValueOp},
};
use autoserde_schema::{
    classify::{CodecLookup, KeyCase, TypeCase, classify},
    node::{EnumMode, PropertyDescriptor, TypeDescriptor},
};
use std::collections::BTreeMap;

///
/// SynthContext
///

#[derive(Clone, Copy)]
pub struct SynthContext<'a> {
    pub lookup: &'a dyn CodecLookup,

    /// Enum mode for enums that do not pin their own.
    pub enum_mode: EnumMode,
}

impl<'a> SynthContext<'a> {
    #[must_use]
    pub fn new(lookup: &'a dyn CodecLookup) -> Self {
        Self {
            lookup,
            enum_mode: EnumMode::default(),
        }
    }

    #[must_use]
    pub const fn with_enum_mode(mut self, mode: EnumMode) -> Self {
        self.enum_mode = mode;
        self
    }

    fn value_op(
        &self,
        ty: &TypeDescriptor,
        property: &PropertyDescriptor,
    ) -> Result<ValueOp, SynthesisError> {
        let case = classify(&property.ty, self.lookup).map_err(|source| {
            SynthesisError::UnsupportedType {
                type_path: ty.path.clone(),
                property: property.name.clone(),
                source,
            }
        })?;

        Ok(self.lower(case))
    }

    fn lower(&self, case: TypeCase) -> ValueOp {
        match case {
            TypeCase::Boolean => ValueOp::Bool,
            TypeCase::Numeric(kind) => ValueOp::Numeric(kind),
            TypeCase::Text => ValueOp::Text,
            TypeCase::Enum(descriptor) => ValueOp::Enum(EnumTable::build(&descriptor, self.enum_mode)),
            TypeCase::Sequence(item) => ValueOp::Sequence(Box::new(self.lower(*item))),
            TypeCase::AssociativeMap { key, value } => ValueOp::Map {
                key: self.lower_key(key),
                value: Box::new(self.lower(*value)),
            },
            TypeCase::Nested(path) => ValueOp::Nested(path),
            TypeCase::Optional(inner) => ValueOp::Optional(Box::new(self.lower(*inner))),
        }
    }

    fn lower_key(&self, key: KeyCase) -> KeyOp {
        match key {
            KeyCase::Text => KeyOp::Text,
            KeyCase::Boolean => KeyOp::Bool,
            KeyCase::Numeric(kind) => KeyOp::Numeric(kind),
            KeyCase::Enum(descriptor) => KeyOp::Enum(EnumTable::build(&descriptor, self.enum_mode)),
        }
    }
}

// Tracks wire names already claimed within one plan.
#[derive(Default)]
struct WireNames<'a> {
    seen: BTreeMap<String, &'a str>,
}

impl<'a> WireNames<'a> {
    fn claim(
        &mut self,
        ty: &TypeDescriptor,
        wire_name: &str,
        property: &'a str,
    ) -> Result<(), SynthesisError> {
        if let Some(first) = self.seen.insert(wire_name.to_string(), property) {
            return Err(SynthesisError::DuplicateWireName {
                type_path: ty.path.clone(),
                wire_name: wire_name.to_string(),
                first: first.to_string(),
                second: property.to_string(),
            });
        }

        Ok(())
    }
}
