use autoserde_schema::{classify::ClassifyError, error::SchemaError};
use thiserror::Error as ThisError;

///
/// SynthesisError
///
/// Generation-time failure for one type. Sibling types are unaffected.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SynthesisError {
    #[error("{type_path}.{property}: unsupported type: {source}")]
    UnsupportedType {
        type_path: String,
        property: String,
        source: ClassifyError,
    },

    #[error("{type_path}: decoding requires a zero-argument constructor")]
    UnsupportedConstruction { type_path: String },

    #[error("{type_path}: wire name '{wire_name}' is used by both '{first}' and '{second}'")]
    DuplicateWireName {
        type_path: String,
        wire_name: String,
        first: String,
        second: String,
    },
}

impl SynthesisError {
    /// Property the error is reported against, if any.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::UnsupportedType { property, .. } => Some(property),
            Self::DuplicateWireName { second, .. } => Some(second),
            Self::UnsupportedConstruction { .. } => None,
        }
    }
}

///
/// EncodeError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum EncodeError {
    #[error("{type_path}.{property}: value is required")]
    MissingValue { type_path: String, property: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("no encoder registered for '{0}'")]
    MissingCodec(String),

    #[error("number {value} does not fit {target}")]
    NumberOutOfRange { target: &'static str, value: String },

    #[error("malformed token sequence: {0}")]
    Structure(String),
}

///
/// DecodeError
///
/// Any decode error aborts the whole call; no partial instance is returned.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("unknown property '{name}' for {type_path}")]
    UnknownProperty { type_path: String, name: String },

    #[error("'{value}' is not a constant of {enum_path}")]
    UnknownEnumConstant { enum_path: String, value: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("number {value} does not fit {target}")]
    NumberOutOfRange { target: &'static str, value: String },

    #[error("map key '{key}' is not a valid {expected}")]
    InvalidMapKey { key: String, expected: String },

    #[error("no decoder registered for '{0}'")]
    MissingCodec(String),

    #[error("nesting exceeds {limit} levels")]
    DepthLimitExceeded { limit: usize },

    #[error("invalid document: {0}")]
    Document(String),
}

impl DecodeError {
    pub fn unknown_property(type_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_path: type_path.into(),
            name: name.into(),
        }
    }

    pub fn unknown_enum(enum_path: impl Into<String>, value: impl ToString) -> Self {
        Self::UnknownEnumConstant {
            enum_path: enum_path.into(),
            value: value.to_string(),
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: impl std::fmt::Display) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    SchemaError(#[from] SchemaError),

    #[error(transparent)]
    SynthesisError(#[from] SynthesisError),

    #[error(transparent)]
    EncodeError(#[from] EncodeError),

    #[error(transparent)]
    DecodeError(#[from] DecodeError),
}
