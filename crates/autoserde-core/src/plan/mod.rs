//! Encode and decode plans.
//!
//! Plans are plain data. They are rendered to source by the build crate or
//! executed directly by `codec::PlanEncoder` / `codec::PlanDecoder`.

mod enum_table;

pub use enum_table::*;

use autoserde_schema::types::NumericKind;
use std::collections::{BTreeMap, BTreeSet};

///
/// ValueOp
/// How one value is written or read, mirroring its type case.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueOp {
    Bool,
    Numeric(NumericKind),
    Text,
    Enum(EnumTable),
    Sequence(Box<Self>),
    Map { key: KeyOp, value: Box<Self> },
    Nested(String),
    Optional(Box<Self>),
}

impl ValueOp {
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

///
/// KeyOp
/// Conversion between a map key and its text form.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyOp {
    Text,
    Bool,
    Numeric(NumericKind),
    Enum(EnumTable),
}

///
/// Guard
/// Treatment of an absent value for one encode step.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Guard {
    /// Non-nullable value; always written.
    #[default]
    Unconditional,

    /// Nullable with NON_NULL inclusion; the field is omitted when absent.
    SkipWhenAbsent,

    /// Nullable with ALWAYS inclusion; the field is written as null when absent.
    NullWhenAbsent,
}

///
/// EncodeStep
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeStep {
    pub property: String,
    pub wire_name: String,
    pub getter: String,
    pub guard: Guard,
    pub op: ValueOp,
}

///
/// EncodePlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodePlan {
    pub type_path: String,
    pub steps: Vec<EncodeStep>,
}

impl EncodePlan {
    pub fn wire_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.wire_name.as_str())
    }
}

///
/// DecodeField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeField {
    pub property: String,
    pub wire_name: String,
    pub setter: String,
    pub op: ValueOp,
}

///
/// FieldAction
/// Outcome of looking up one wire name against a decode plan.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldAction<'a> {
    Decode(&'a DecodeField),
    Skip,
    Unknown,
}

///
/// DecodePlan
///
/// `ignored` holds names that are known but never applied; they are always
/// skipped, whatever `ignore_unknown` says.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodePlan {
    pub type_path: String,
    pub fields: Vec<DecodeField>,
    pub ignored: BTreeSet<String>,
    pub ignore_unknown: bool,
    index: BTreeMap<String, usize>,
}

impl DecodePlan {
    #[must_use]
    pub fn new(
        type_path: impl Into<String>,
        fields: Vec<DecodeField>,
        ignored: BTreeSet<String>,
        ignore_unknown: bool,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.wire_name.clone(), i))
            .collect();

        Self {
            type_path: type_path.into(),
            fields,
            ignored,
            ignore_unknown,
            index,
        }
    }

    #[must_use]
    pub fn field(&self, wire_name: &str) -> Option<&DecodeField> {
        self.index.get(wire_name).and_then(|&i| self.fields.get(i))
    }

    #[must_use]
    pub fn resolve(&self, wire_name: &str) -> FieldAction<'_> {
        if let Some(field) = self.field(wire_name) {
            FieldAction::Decode(field)
        } else if self.ignore_unknown || self.ignored.contains(wire_name) {
            FieldAction::Skip
        } else {
            FieldAction::Unknown
        }
    }
}
