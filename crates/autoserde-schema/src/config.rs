//! Generator configuration, read from TOML.
//!
//! ```toml
//! [features]
//! auto_detect_setters = false
//!
//! [naming]
//! strategy = "snake_case"
//!
//! [enums]
//! mode = "index"
//!
//! [output]
//! registry_name = "AppCodecs"
//! parallel = true
//! ```

use crate::{
    naming::NamingStrategy,
    node::EnumMode,
    visibility::{Threshold, VisibilityPolicy},
};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// CodecConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub features: Features,
    pub naming: NamingConfig,
    pub enums: EnumConfig,
    pub output: OutputConfig,
}

impl CodecConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// Baseline visibility before any type-level overrides.
    #[must_use]
    pub const fn base_visibility(&self) -> VisibilityPolicy {
        const fn gate(enabled: bool) -> Threshold {
            if enabled {
                Threshold::PublicOnly
            } else {
                Threshold::None
            }
        }

        VisibilityPolicy {
            getter: gate(self.features.auto_detect_getters),
            is_getter: gate(self.features.auto_detect_is_getters),
            setter: gate(self.features.auto_detect_setters),
        }
    }
}

///
/// Features
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Features {
    pub auto_detect_getters: bool,
    pub auto_detect_is_getters: bool,
    pub auto_detect_setters: bool,
    pub propagate_transient_marker: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            auto_detect_getters: true,
            auto_detect_is_getters: true,
            auto_detect_setters: true,
            propagate_transient_marker: false,
        }
    }
}

///
/// NamingConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
}

///
/// EnumConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EnumConfig {
    pub mode: EnumMode,
}

///
/// OutputConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub registry_name: String,
    pub registry_module: String,
    pub parallel: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            registry_name: "GeneratedRegistry".to_string(),
            registry_module: "autoserde_generated".to_string(),
            parallel: false,
        }
    }
}
