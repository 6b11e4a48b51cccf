mod r#enum;
mod property;
mod type_descriptor;

pub use property::*;
pub use r#enum::*;
pub use type_descriptor::*;
