use crate::{
    error::SynthesisError,
    plan::{DecodePlan, EncodePlan},
    synth::{SynthContext, synthesize_decoder, synthesize_encoder},
};
use autoserde_schema::{
    catalog::{Scope, TypeCatalog},
    node::EnumMode,
};
use std::collections::BTreeMap;

///
/// CodecRegistry
/// Plans keyed by type path, for the interpreter's nested lookups.
///

#[derive(Clone, Debug, Default)]
pub struct CodecRegistry {
    encoders: BTreeMap<String, EncodePlan>,
    decoders: BTreeMap<String, DecodePlan>,
}

impl CodecRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            encoders: BTreeMap::new(),
            decoders: BTreeMap::new(),
        }
    }

    /// Synthesize plans for every type in scope, stopping at the first failure.
    pub fn from_catalog<C: TypeCatalog>(
        catalog: &C,
        scope: &Scope,
        enum_mode: EnumMode,
    ) -> Result<Self, SynthesisError> {
        let ctx = SynthContext::new(catalog).with_enum_mode(enum_mode);
        let mut registry = Self::new();

        for ty in catalog.descriptors(scope) {
            let mode = ty.generate_mode().unwrap_or_default();
            if mode.wants_encoder() {
                registry.register_encoder(synthesize_encoder(ty, &ctx)?);
            }
            if mode.wants_decoder() {
                registry.register_decoder(synthesize_decoder(ty, &ctx)?);
            }
        }

        Ok(registry)
    }

    pub fn register_encoder(&mut self, plan: EncodePlan) {
        self.encoders.insert(plan.type_path.clone(), plan);
    }

    pub fn register_decoder(&mut self, plan: DecodePlan) {
        self.decoders.insert(plan.type_path.clone(), plan);
    }

    #[must_use]
    pub fn encoder(&self, type_path: &str) -> Option<&EncodePlan> {
        self.encoders.get(type_path)
    }

    #[must_use]
    pub fn decoder(&self, type_path: &str) -> Option<&DecodePlan> {
        self.decoders.get(type_path)
    }
}
