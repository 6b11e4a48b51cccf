//! Wire-name resolution.
//!
//! A property's wire name is, in priority order: its explicit override, or
//! its canonical name under the type's naming strategy. Canonical names come
//! from accessor method names with the conventional prefix stripped.

use crate::types::AccessorKind;
use convert_case::{Case, Casing};
use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// NamingStrategy
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum NamingStrategy {
    KebabCase,
    #[default]
    LowerCamelCase,
    LowerDotCase,
    SnakeCase,
    UpperCamelCase,
}

impl NamingStrategy {
    /// Parse a strategy name, falling back to identity (lower camel) when the
    /// name is not recognised.
    #[must_use]
    pub fn parse_or_identity(name: &str) -> Self {
        name.parse::<Self>()
            .ok()
            .or_else(|| plain_name(name))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn resolve(self, canonical: &str) -> String {
        resolve(canonical, self)
    }
}

// accepts the snake_case spelling used in config files
fn plain_name(name: &str) -> Option<NamingStrategy> {
    match name {
        "kebab_case" | "kebab-case" => Some(NamingStrategy::KebabCase),
        "lower_camel_case" | "identity" => Some(NamingStrategy::LowerCamelCase),
        "lower_dot_case" | "dot.case" => Some(NamingStrategy::LowerDotCase),
        "snake_case" => Some(NamingStrategy::SnakeCase),
        "upper_camel_case" => Some(NamingStrategy::UpperCamelCase),
        _ => None,
    }
}

/// Apply a naming strategy to a canonical property name.
#[must_use]
pub fn resolve(canonical: &str, strategy: NamingStrategy) -> String {
    if canonical.is_empty() {
        return String::new();
    }

    match strategy {
        NamingStrategy::LowerCamelCase => canonical.to_string(),
        NamingStrategy::UpperCamelCase => upper_first(canonical),
        NamingStrategy::SnakeCase => canonical.to_case(Case::Snake),
        NamingStrategy::KebabCase => canonical.to_case(Case::Kebab),
        NamingStrategy::LowerDotCase => canonical.to_case(Case::Kebab).replace('-', "."),
    }
}

/// Effective wire name: an explicit override always wins.
#[must_use]
pub fn wire_name(explicit: Option<&str>, canonical: &str, strategy: NamingStrategy) -> String {
    match explicit {
        Some(name) => name.to_string(),
        None => resolve(canonical, strategy),
    }
}

/// Derive the canonical property name from an accessor method name.
///
/// Returns `None` when the method does not carry the accessor's prefix or
/// nothing remains after stripping it.
#[must_use]
pub fn canonical_name(method: &str, kind: AccessorKind) -> Option<String> {
    let prefix = match kind {
        AccessorKind::Getter => "get",
        AccessorKind::IsGetter => "is",
        AccessorKind::Setter => "set",
    };
    let base = method.strip_prefix(prefix)?;
    if base.is_empty() {
        return None;
    }

    Some(mangle(base))
}

// Lower-case the leading letter unless the first two letters are both
// upper-case (acronyms such as `URL` stay intact).
fn mangle(base: &str) -> String {
    let mut chars = base.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if !first.is_uppercase() {
        return base.to_string();
    }
    if chars.next().is_some_and(char::is_uppercase) {
        return base.to_string();
    }

    let mut out = String::with_capacity(base.len());
    out.extend(first.to_lowercase());
    out.push_str(&base[first.len_utf8()..]);
    out
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
