//! `bindparam-core` — parameter descriptors and value types shared by every
//! binding front-end.
//!
//! Pure data crate: no registry state, no IO.

pub mod descriptor;
pub mod ops;
pub mod value;

pub use descriptor::ParamData;
pub use ops::{OpOutput, ParamOp, ParamType};
pub use value::{Matrix, ModelHandle, ParamKind, ParamValue};
