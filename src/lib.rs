mod common;
mod image;
mod lut;
mod ops;
mod pipeline;

pub mod prelude;

pub use prelude::*;
