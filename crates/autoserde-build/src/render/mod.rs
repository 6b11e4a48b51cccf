//! Plan rendering.
//!
//! Turns plans into Rust source. Emitted code names every runtime item by
//! its absolute path under `::autoserde::core`, so units need no imports.
//! Type paths in descriptors are crate-relative.

mod decoder;
mod encoder;
mod registry;

pub use decoder::render_decoder;
pub use encoder::render_encoder;
pub use registry::render_registry;

use crate::error::RenderError;
use autoserde_core::registry::ArtifactRef;
use autoserde_schema::types::NumericKind;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::parse_str;

/// Absolute path of a runtime item, e.g. `rt(&["codec", "read", "read_text"])`.
fn rt(segments: &[&str]) -> TokenStream {
    let idents = segments.iter().map(|s| format_ident!("{s}"));

    quote!(::autoserde::core #(:: #idents)*)
}

/// `crate::<path>` for a descriptor type path.
fn type_path(path: &str) -> Result<syn::Path, RenderError> {
    parse_str(&format!("crate::{path}")).map_err(|_| RenderError::InvalidPath(path.to_string()))
}

/// `crate::<module>::<Name>` for an emitted unit.
fn unit_path(unit: &ArtifactRef) -> Result<syn::Path, RenderError> {
    type_path(&unit.path())
}

fn ident(name: &str) -> Result<Ident, RenderError> {
    parse_str(name).map_err(|_| RenderError::InvalidIdent(name.to_string()))
}

/// Primitive type for a numeric kind.
fn numeric_ty(kind: NumericKind) -> Ident {
    format_ident!("{}", kind.as_str())
}
