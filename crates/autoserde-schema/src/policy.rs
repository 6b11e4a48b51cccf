use crate::{naming::NamingStrategy, visibility::VisibilityPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// TypePolicy
///
/// Effective type-level policy, resolved once while the descriptor is built.
/// `ignored` names match either canonical or wire names; `ignore_unknown`
/// only governs names that match nothing at all.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypePolicy {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub ignored: BTreeSet<String>,

    #[serde(default)]
    pub ignore_unknown: bool,

    #[serde(default)]
    pub naming: NamingStrategy,

    #[serde(default)]
    pub visibility: VisibilityPolicy,
}

impl TypePolicy {
    #[must_use]
    pub fn is_ignored_name(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }
}
