use crate::prelude::*;

///
/// GenerateMarker
/// Marks a type for generation and optionally names its artifacts.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenerateMarker {
    #[serde(default)]
    pub mode: GenerateMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder_name: Option<String>,
}

impl GenerateMarker {
    #[must_use]
    pub fn new(mode: GenerateMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

///
/// TypeDescriptor
///
/// Immutable once built. Property order is encounter order and drives the
/// order of every generated plan.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub path: String,
    pub package: String,
    pub properties: Vec<PropertyDescriptor>,

    #[serde(default)]
    pub policy: TypePolicy,

    /// Whether the type has a zero-argument constructor.
    #[serde(default = "default_true")]
    pub constructible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<GenerateMarker>,
}

const fn default_true() -> bool {
    true
}

impl TypeDescriptor {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let package = package_of(&path).to_string();

        Self {
            path,
            package,
            properties: Vec::new(),
            policy: TypePolicy::default(),
            constructible: true,
            marker: None,
        }
    }

    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TypePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: GenerateMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    #[must_use]
    pub const fn without_default_constructor(mut self) -> Self {
        self.constructible = false;
        self
    }

    /// Last path segment.
    #[must_use]
    pub fn ident(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn wire_name(&self, property: &PropertyDescriptor) -> String {
        property.wire_name(self.policy.naming)
    }

    /// True when the property is excluded from both plans, either by its own
    /// flag or through the type-level ignored names.
    #[must_use]
    pub fn is_excluded(&self, property: &PropertyDescriptor) -> bool {
        property.ignored
            || self.policy.is_ignored_name(&property.name)
            || self.policy.is_ignored_name(&self.wire_name(property))
    }

    /// Properties contributing to the encode plan, in descriptor order.
    pub fn encodable(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties
            .iter()
            .filter(|p| p.is_readable() && !self.is_excluded(p))
    }

    /// Properties contributing to the decode plan, in descriptor order.
    pub fn decodable(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties
            .iter()
            .filter(|p| p.is_writable() && !self.is_excluded(p))
    }

    #[must_use]
    pub fn generate_mode(&self) -> Option<GenerateMode> {
        self.marker.as_ref().map(|m| m.mode)
    }
}

/// Module path of a qualified type path (`a::b::C` → `a::b`).
#[must_use]
pub fn package_of(path: &str) -> &str {
    path.rsplit_once("::").map_or("", |(package, _)| package)
}
