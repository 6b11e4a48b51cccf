//! Raw type declarations, as handed over by whatever discovers types.
//!
//! Declarations carry methods and annotations verbatim; nothing is decided
//! here. `build::DescriptorBuilder` turns them into descriptors.

use crate::prelude::*;

///
/// TypeDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDecl {
    pub path: String,
    pub package: String,

    #[serde(default)]
    pub methods: Vec<MethodDecl>,

    #[serde(default = "default_true")]
    pub constructible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<GenerateMarker>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,

    #[serde(default)]
    pub ignore_unknown: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<NamingStrategy>,

    #[serde(default)]
    pub visibility: VisibilityOverrides,
}

const fn default_true() -> bool {
    true
}

impl TypeDecl {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let package = package_of(&path).to_string();

        Self {
            path,
            package,
            methods: Vec::new(),
            constructible: true,
            marker: None,
            ignored: Vec::new(),
            ignore_unknown: false,
            naming: None,
            visibility: VisibilityOverrides::default(),
        }
    }

    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn generate(mut self, marker: GenerateMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    #[must_use]
    pub fn ignore_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    #[must_use]
    pub const fn naming(mut self, strategy: NamingStrategy) -> Self {
        self.naming = Some(strategy);
        self
    }

    #[must_use]
    pub const fn visibility(mut self, overrides: VisibilityOverrides) -> Self {
        self.visibility = overrides;
        self
    }

    #[must_use]
    pub const fn without_default_constructor(mut self) -> Self {
        self.constructible = false;
        self
    }
}

///
/// MethodDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MethodDecl {
    pub name: String,

    #[serde(default)]
    pub modifiers: Modifiers,

    /// Declaring package; `None` means the containing type's package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_package: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ValueType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<ValueType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// Explicit ignore marker; `Some(false)` explicitly keeps the method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Inclusion>,
}

impl MethodDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::public(),
            declaring_package: None,
            params: Vec::new(),
            returns: None,
            rename: None,
            ignore: None,
            inclusion: None,
        }
    }

    /// Zero-argument method returning `ty`.
    #[must_use]
    pub fn getter(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(name).returns(ty)
    }

    /// One-argument method returning nothing.
    #[must_use]
    pub fn setter(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(name).param(ty)
    }

    #[must_use]
    pub fn returns(mut self, ty: ValueType) -> Self {
        self.returns = Some(ty);
        self
    }

    #[must_use]
    pub fn param(mut self, ty: ValueType) -> Self {
        self.params.push(ty);
        self
    }

    #[must_use]
    pub fn rename(mut self, wire: impl Into<String>) -> Self {
        self.rename = Some(wire.into());
        self
    }

    #[must_use]
    pub const fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = Some(ignore);
        self
    }

    #[must_use]
    pub const fn non_null(mut self) -> Self {
        self.inclusion = Some(Inclusion::NonNull);
        self
    }

    #[must_use]
    pub const fn access(mut self, access: AccessLevel) -> Self {
        self.modifiers.access = access;
        self
    }

    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.modifiers.transient = true;
        self
    }

    #[must_use]
    pub fn declared_in(mut self, package: impl Into<String>) -> Self {
        self.declaring_package = Some(package.into());
        self
    }
}
