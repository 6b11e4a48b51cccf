use crate::prelude::*;

///
/// Accessor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Accessor {
    pub method: String,
    pub kind: AccessorKind,
}

impl Accessor {
    #[must_use]
    pub fn new(method: impl Into<String>, kind: AccessorKind) -> Self {
        Self {
            method: method.into(),
            kind,
        }
    }
}

///
/// PropertyDescriptor
///
/// Only visible accessors are attached; a property may be read-only or
/// write-only. Ignored properties stay in the descriptor so decoders can
/// still recognise (and skip) their wire names.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub ty: ValueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<Accessor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<Accessor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    #[serde(default)]
    pub inclusion: Inclusion,

    #[serde(default)]
    pub ignored: bool,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
            getter: None,
            setter: None,
            rename: None,
            inclusion: Inclusion::Always,
            ignored: false,
        }
    }

    #[must_use]
    pub fn with_getter(mut self, method: impl Into<String>) -> Self {
        let method = method.into();
        let kind = if self.ty.is_bool_like() && method.starts_with("is") {
            AccessorKind::IsGetter
        } else {
            AccessorKind::Getter
        };
        self.getter = Some(Accessor::new(method, kind));
        self
    }

    #[must_use]
    pub fn with_setter(mut self, method: impl Into<String>) -> Self {
        self.setter = Some(Accessor::new(method, AccessorKind::Setter));
        self
    }

    #[must_use]
    pub fn renamed(mut self, wire: impl Into<String>) -> Self {
        self.rename = Some(wire.into());
        self
    }

    #[must_use]
    pub const fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    #[must_use]
    pub const fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Wire name under the given strategy; an explicit rename always wins.
    #[must_use]
    pub fn wire_name(&self, strategy: NamingStrategy) -> String {
        naming::wire_name(self.rename.as_deref(), &self.name, strategy)
    }

    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }
}
