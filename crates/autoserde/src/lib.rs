//! ## Crate layout
//! - `build`: code generation, emitters, and the `build!` macro for build scripts.
//! - `core`: plans, synthesis, the token model, runtime codecs, and diagnostics.
//! - `schema`: type descriptors, declarations, naming, visibility, and config.
//!
//! The `prelude` module is what generated units and the code calling them
//! need; `design::prelude` is for code that describes types and drives
//! generation.

pub use autoserde_build as build;
pub use autoserde_core as core;
pub use autoserde_schema as schema;

/// re-exports
///
/// generated code and macros can use these without the caller listing them
/// in its own Cargo.toml
#[doc(hidden)]
pub mod __reexports {
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use autoserde_build::build;
pub use autoserde_core::include_unit;
pub use crate::core::Error;

///
/// Runtime Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use serde_json::Value as Document;
}

//
// Design Prelude
// For code that declares types and runs generation.
//

pub mod design {
    pub mod prelude {
        pub use crate::{
            build::{
                CodeEmitter, FsEmitter, GenerationReport, GenerationStatus, Generator,
                MemoryEmitter,
            },
            core::obs::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink},
            schema::{
                catalog::{Schema, Scope},
                config::CodecConfig,
                decl::{MethodDecl, TypeDecl},
                naming::NamingStrategy,
                node::{EnumConstant, EnumDescriptor, EnumMode, GenerateMarker},
                types::{GenerateMode, Inclusion, NumericKind, ValueType},
                visibility::{AccessLevel, Threshold, VisibilityOverrides},
            },
        };
    }
}
