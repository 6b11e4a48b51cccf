//! Fixture types with codecs generated by this crate's build script.
//!
//! The units land in `OUT_DIR/autoserde` and are included in the modules
//! their paths name, so the tests exercise exactly what the generator
//! writes.

pub mod app;

pub mod autoserde_generated {
    autoserde::include_unit!("autoserde_generated/generated_registry.rs");
}
