use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// NumericKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumericKind {
    #[must_use]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    #[must_use]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    #[must_use]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Rust primitive name, used both for display and emitted code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Inclusive integer bounds, `None` for floats.
    #[must_use]
    pub const fn int_bounds(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            Self::F32 | Self::F64 => None,
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// ValueType
///
/// Declared value type of an accessor. `Optional` is the only nullable
/// shape; everything else is written unconditionally.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueType {
    Bool,
    Numeric(NumericKind),
    Text,
    Optional(Box<Self>),
    Sequence(Box<Self>),
    Map { key: Box<Self>, value: Box<Self> },
    Named(String),
}

impl ValueType {
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn sequence(item: Self) -> Self {
        Self::Sequence(Box::new(item))
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn named(path: impl Into<String>) -> Self {
        Self::Named(path.into())
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Strip one level of `Optional`, if present.
    #[must_use]
    pub fn non_null(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// True for `Bool` and `Optional<Bool>`; the only return types that turn
    /// an `is`-prefixed method into a property.
    #[must_use]
    pub fn is_bool_like(&self) -> bool {
        matches!(self.non_null(), Self::Bool)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Numeric(kind) => write!(f, "{kind}"),
            Self::Text => f.write_str("String"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Sequence(item) => write!(f, "Vec<{item}>"),
            Self::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            Self::Named(path) => f.write_str(path),
        }
    }
}

///
/// Inclusion
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum Inclusion {
    #[default]
    Always,
    NonNull,
}

///
/// AccessorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum AccessorKind {
    Getter,
    IsGetter,
    Setter,
}

impl AccessorKind {
    /// Length of the conventional method-name prefix.
    #[must_use]
    pub const fn prefix_len(self) -> usize {
        match self {
            Self::Getter | Self::Setter => 3,
            Self::IsGetter => 2,
        }
    }

    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Getter | Self::IsGetter)
    }
}

///
/// GenerateMode
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum GenerateMode {
    Encoder,
    Decoder,
    #[default]
    Both,
}

impl GenerateMode {
    #[must_use]
    pub const fn wants_encoder(self) -> bool {
        matches!(self, Self::Encoder | Self::Both)
    }

    #[must_use]
    pub const fn wants_decoder(self) -> bool {
        matches!(self, Self::Decoder | Self::Both)
    }
}
