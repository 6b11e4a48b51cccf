use autoserde_core::error::SynthesisError;
use autoserde_schema::error::SchemaError;
use std::io;
use thiserror::Error as ThisError;

///
/// RenderError
/// A plan names something that is not valid Rust.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RenderError {
    #[error("'{0}' is not a valid path")]
    InvalidPath(String),

    #[error("'{0}' is not a valid identifier")]
    InvalidIdent(String),
}

///
/// EmitError
///

#[derive(Debug, ThisError)]
pub enum EmitError {
    #[error("failed to write unit {unit}: {source}")]
    ArtifactWriteFailure {
        unit: String,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    pub fn write_failure(unit: impl Into<String>, source: io::Error) -> Self {
        Self::ArtifactWriteFailure {
            unit: unit.into(),
            source,
        }
    }
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    SchemaError(#[from] SchemaError),

    #[error(transparent)]
    SynthesisError(#[from] SynthesisError),

    #[error(transparent)]
    RenderError(#[from] RenderError),

    #[error(transparent)]
    EmitError(#[from] EmitError),

    #[error("generation finished with {failures} failure(s)")]
    Incomplete { failures: usize },
}
