use crate::prelude::*;

///
/// EnumMode
/// Requested encoding family, either pinned per enum or taken from config.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMode {
    #[default]
    Name,
    Index,
    ToString,
}

///
/// EnumEncoding
/// Resolved encoding for one enum; exactly one applies to every constant.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum EnumEncoding {
    DeclaredName,
    OverrideOrName,
    Ordinal,
    CustomString,
}

///
/// EnumDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumDescriptor {
    pub path: String,
    pub constants: Vec<EnumConstant>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<EnumMode>,
}

impl EnumDescriptor {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constants: Vec::new(),
            mode: None,
        }
    }

    #[must_use]
    pub fn constant(mut self, constant: EnumConstant) -> Self {
        self.constants.push(constant);
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: EnumMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.constants.iter().any(|c| c.rename.is_some())
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.constants.iter().position(|c| c.name == name)
    }

    /// Resolve the encoding, falling back to `default_mode` when this enum
    /// does not pin one.
    #[must_use]
    pub fn encoding(&self, default_mode: EnumMode) -> EnumEncoding {
        match self.mode.unwrap_or(default_mode) {
            EnumMode::Index => EnumEncoding::Ordinal,
            EnumMode::ToString => EnumEncoding::CustomString,
            EnumMode::Name if self.has_overrides() => EnumEncoding::OverrideOrName,
            EnumMode::Name => EnumEncoding::DeclaredName,
        }
    }

    /// Last path segment.
    #[must_use]
    pub fn ident(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }
}

///
/// EnumConstant
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumConstant {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// Output of the type's own string conversion, when it differs from the
    /// declared name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl EnumConstant {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rename: None,
            display: None,
        }
    }

    #[must_use]
    pub fn renamed(mut self, wire: impl Into<String>) -> Self {
        self.rename = Some(wire.into());
        self
    }

    #[must_use]
    pub fn displayed(mut self, text: impl Into<String>) -> Self {
        self.display = Some(text.into());
        self
    }

    #[must_use]
    pub fn display_text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}
