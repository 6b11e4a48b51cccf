//! Runtime codecs.
//!
//! Two ways to run a plan: generated code implementing `Encode` / `Decode`
//! (loaded into a `CodecTable`), or the plan interpreter over `Bean` values
//! (with plans held in a `CodecRegistry`). Both read through `read`.

mod datum;
mod interpret;
mod registry;
mod table;

pub mod read;

pub use datum::*;
pub use interpret::*;
pub use registry::*;
pub use table::*;
