//! Code generation for autoserde: renders encode/decode plans and the
//! registry as Rust source, and drives a whole generation pass.

mod emit;
mod error;
mod generator;
mod macros;
mod render;

pub use emit::{CodeEmitter, FsEmitter, MemoryEmitter, Unit, UnitKind};
pub use error::{EmitError, Error, RenderError};
pub use generator::{Failure, GenerationReport, GenerationStatus, Generator};
pub use render::{render_decoder, render_encoder, render_registry};

use autoserde_core::obs::TracingSink;
use autoserde_schema::{
    catalog::{Schema, Scope},
    config::CodecConfig,
};
use std::path::Path;

/// Generate every marked type in `schema` into `out_dir`, logging
/// diagnostics through `tracing`. Fails unless every unit was written.
pub fn generate(
    schema: &Schema,
    config: &CodecConfig,
    out_dir: impl AsRef<Path>,
) -> Result<GenerationReport, Error> {
    let mut emitter = FsEmitter::new(out_dir.as_ref());
    Generator::new(config)
        .run(schema, &Scope::Marked, &mut emitter, &TracingSink)
        .into_result()
}

#[doc(hidden)]
pub mod __reexports {
    pub use autoserde_schema;
}
