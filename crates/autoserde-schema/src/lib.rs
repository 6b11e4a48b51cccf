//! Schema model for codec generation.
//!
//! Declarations (`TypeDecl`) are resolved into immutable descriptors by
//! `build::DescriptorBuilder`; everything downstream reads descriptors and
//! the `classify` result only.

pub mod build;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod decl;
pub mod error;
pub mod naming;
pub mod node;
pub mod policy;
pub mod types;
pub mod validate;
pub mod visibility;

use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        catalog::{Schema, Scope, TypeCatalog},
        classify::{ClassifyError, CodecLookup, KeyCase, TypeCase, classify},
        decl::*,
        err,
        error::{ErrorTree, SchemaError},
        naming::{self, NamingStrategy},
        node::*,
        policy::TypePolicy,
        types::*,
        visibility::*,
    };
    pub use derive_more::Display;
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    SchemaError(#[from] error::SchemaError),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    ClassifyError(#[from] classify::ClassifyError),
}
