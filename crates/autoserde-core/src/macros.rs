// include_unit
/// Include one unit written by `autoserde_build::build!`, by its path
/// under `OUT_DIR/autoserde` (for example `"app/foo_encoder.rs"`).
///
/// Units refer to their types and to each other by crate path, so include
/// each one inside the module its path names.
#[macro_export]
macro_rules! include_unit {
    ($path:literal) => {
        include!(concat!(env!("OUT_DIR"), "/autoserde/", $path));
    };
}
