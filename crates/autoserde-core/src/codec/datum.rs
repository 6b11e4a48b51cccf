use derive_more::Display;
use std::collections::BTreeMap;

///
/// Datum
/// Dynamically typed property value.
///

#[derive(Clone, Debug, Default, Display, PartialEq)]
pub enum Datum {
    #[default]
    #[display("null")]
    Null,

    #[display("{_0}")]
    Bool(bool),

    #[display("{_0}")]
    Int(i64),

    #[display("{_0}")]
    UInt(u64),

    #[display("{_0}")]
    Float(f64),

    #[display("\"{_0}\"")]
    Text(String),

    /// Enum constant, by declared name.
    #[display("{_0}")]
    Enum(String),

    #[display("list")]
    List(Vec<Self>),

    /// Entries in insertion order.
    #[display("map")]
    Map(Vec<(Self, Self)>),

    #[display("{}", _0.type_path)]
    Object(DynamicObject),
}

impl Datum {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for Datum {
    fn from(u: u64) -> Self {
        Self::UInt(u)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<DynamicObject> for Datum {
    fn from(o: DynamicObject) -> Self {
        Self::Object(o)
    }
}

///
/// Bean
/// Property access by canonical name, standing in for getters and setters.
///

pub trait Bean {
    fn type_path(&self) -> &str;

    fn get(&self, property: &str) -> Option<&Datum>;

    fn set(&mut self, property: &str, value: Datum);
}

///
/// DynamicObject
///
/// Zero-argument-constructed instance whose properties are set one at a
/// time. Unset properties read as absent; setting null unsets.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicObject {
    pub type_path: String,
    values: BTreeMap<String, Datum>,
}

impl DynamicObject {
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, property: &str, value: impl Into<Datum>) -> Self {
        self.set(property, value.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop a property, as if its setter had never been called.
    pub fn unset(&mut self, property: &str) -> Option<Datum> {
        self.values.remove(property)
    }
}

impl Bean for DynamicObject {
    fn type_path(&self) -> &str {
        &self.type_path
    }

    fn get(&self, property: &str) -> Option<&Datum> {
        self.values.get(property)
    }

    // null and unset are the same state
    fn set(&mut self, property: &str, value: Datum) {
        if value.is_null() {
            self.values.remove(property);
        } else {
            self.values.insert(property.to_string(), value);
        }
    }
}
