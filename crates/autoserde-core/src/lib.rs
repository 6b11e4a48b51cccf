//! Runtime and synthesis core for autoserde: encode/decode plans, the
//! token stream model, the plan interpreter, and registry aggregation.

// public exports are one module level down
pub mod codec;
pub mod document;
pub mod error;
pub mod obs;
pub mod plan;
pub mod registry;
pub mod synth;
pub mod token;

mod macros;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// Prelude
///
/// Everything generated code and hand-written codecs need in scope.
///

pub mod prelude {
    pub use crate::{
        codec::{
            Bean, CodecRegistry, CodecTable, Datum, Decode, DynamicObject, Encode, PlanDecoder,
            PlanEncoder, from_value, to_value,
        },
        document::{DocumentReader, DocumentWriter},
        error::{DecodeError, EncodeError},
        token::{Token, TokenReader, TokenWriter},
    };
}
