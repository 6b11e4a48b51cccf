use crate::{build::DescriptorBuilder, config::CodecConfig, prelude::*};
use std::collections::BTreeSet;

///
/// Scope
/// Which descriptors a catalog request covers.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Scope {
    All,
    #[default]
    Marked,
    Paths(Vec<String>),
}

///
/// TypeCatalog
///

pub trait TypeCatalog: CodecLookup {
    /// Descriptors in scope, in catalog order.
    fn descriptors(&self, scope: &Scope) -> Vec<&TypeDescriptor>;
}

///
/// Schema
///
/// In-memory catalog. Types keep insertion order; re-inserting a path
/// replaces the earlier entry in place.
///

#[derive(Clone, Debug, Default)]
pub struct Schema {
    types: Vec<TypeDescriptor>,
    enums: Vec<EnumDescriptor>,
    external: BTreeSet<String>,
}

impl Schema {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            types: Vec::new(),
            enums: Vec::new(),
            external: BTreeSet::new(),
        }
    }

    /// Build descriptors for every declaration and collect them with `enums`.
    pub fn from_decls(
        config: &CodecConfig,
        decls: &[TypeDecl],
        enums: Vec<EnumDescriptor>,
    ) -> Result<Self, SchemaError> {
        let builder = DescriptorBuilder::new(config);
        let mut schema = Self::new();

        for decl in decls {
            schema.insert_type(builder.build(decl)?.descriptor);
        }
        for descriptor in enums {
            schema.insert_enum(descriptor);
        }

        Ok(schema)
    }

    pub fn insert_type(&mut self, descriptor: TypeDescriptor) {
        match self.types.iter_mut().find(|t| t.path == descriptor.path) {
            Some(slot) => *slot = descriptor,
            None => self.types.push(descriptor),
        }
    }

    pub fn insert_enum(&mut self, descriptor: EnumDescriptor) {
        match self.enums.iter_mut().find(|e| e.path == descriptor.path) {
            Some(slot) => *slot = descriptor,
            None => self.enums.push(descriptor),
        }
    }

    /// Declare a type whose codec is provided at runtime by someone else.
    pub fn register_external_codec(&mut self, path: impl Into<String>) {
        self.external.insert(path.into());
    }

    #[must_use]
    pub fn get_type(&self, path: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.path == path)
    }

    pub fn try_get_type(&self, path: &str) -> Result<&TypeDescriptor, SchemaError> {
        self.get_type(path)
            .ok_or_else(|| SchemaError::UnknownType(path.to_string()))
    }

    pub fn try_get_enum(&self, path: &str) -> Result<&EnumDescriptor, SchemaError> {
        self.enum_descriptor(path)
            .ok_or_else(|| SchemaError::UnknownEnum(path.to_string()))
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.iter()
    }

    /// Validate every descriptor, collecting all problems.
    pub fn validate(&self) -> Result<(), SchemaError> {
        crate::validate::validate_schema(self).map_err(SchemaError::Validation)
    }
}

impl CodecLookup for Schema {
    fn enum_descriptor(&self, path: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|e| e.path == path)
    }

    fn has_codec(&self, path: &str) -> bool {
        self.external.contains(path) || self.get_type(path).is_some()
    }
}

impl TypeCatalog for Schema {
    fn descriptors(&self, scope: &Scope) -> Vec<&TypeDescriptor> {
        match scope {
            Scope::All => self.types.iter().collect(),
            Scope::Marked => self.types.iter().filter(|t| t.marker.is_some()).collect(),
            Scope::Paths(paths) => self
                .types
                .iter()
                .filter(|t| paths.iter().any(|p| *p == t.path))
                .collect(),
        }
    }
}
