//! Stream combinators

mod decode;

pub use decode::{Decode, DecodeExt};
