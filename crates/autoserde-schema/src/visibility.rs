use crate::types::AccessorKind;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// AccessLevel
/// Declared access modifier of an accessor method.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

///
/// Modifiers
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Modifiers {
    pub access: AccessLevel,

    #[serde(default)]
    pub transient: bool,
}

impl Modifiers {
    #[must_use]
    pub const fn public() -> Self {
        Self {
            access: AccessLevel::Public,
            transient: false,
        }
    }

    #[must_use]
    pub const fn with_access(access: AccessLevel) -> Self {
        Self {
            access,
            transient: false,
        }
    }
}

///
/// Threshold
/// Minimum access level an accessor needs to be auto-detected.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    None,
    #[default]
    PublicOnly,
    NonPrivate,
    Any,
}

///
/// VisibilityPolicy
/// Effective per-accessor-kind thresholds for one type, computed once.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct VisibilityPolicy {
    pub getter: Threshold,
    pub is_getter: Threshold,
    pub setter: Threshold,
}

impl VisibilityPolicy {
    #[must_use]
    pub const fn threshold(&self, kind: AccessorKind) -> Threshold {
        match kind {
            AccessorKind::Getter => self.getter,
            AccessorKind::IsGetter => self.is_getter,
            AccessorKind::Setter => self.setter,
        }
    }

    /// Layer explicit overrides on top of this policy.
    #[must_use]
    pub fn merge(self, overrides: &VisibilityOverrides) -> Self {
        Self {
            getter: overrides.getter.unwrap_or(self.getter),
            is_getter: overrides.is_getter.unwrap_or(self.is_getter),
            setter: overrides.setter.unwrap_or(self.setter),
        }
    }
}

///
/// VisibilityOverrides
/// Type-level overrides; `None` inherits the layer below.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct VisibilityOverrides {
    #[serde(default)]
    pub getter: Option<Threshold>,

    #[serde(default)]
    pub is_getter: Option<Threshold>,

    #[serde(default)]
    pub setter: Option<Threshold>,
}

/// Decide whether an accessor is auto-detected under `policy`.
///
/// Package-level access only counts when the accessor is declared in the
/// same package as the type being described.
#[must_use]
pub fn is_visible(
    kind: AccessorKind,
    modifiers: Modifiers,
    declaring_package: &str,
    containing_package: &str,
    policy: &VisibilityPolicy,
) -> bool {
    let access = modifiers.access;
    let same_package_default = access == AccessLevel::Package && declaring_package == containing_package;

    match policy.threshold(kind) {
        Threshold::None => false,
        Threshold::PublicOnly => access == AccessLevel::Public,
        Threshold::NonPrivate => access == AccessLevel::Public || same_package_default,
        Threshold::Any => true,
    }
}
