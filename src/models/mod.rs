pub mod decision;
pub mod derived;
pub mod reference;
pub mod stats;

pub use decision::*;
pub use derived::*;
pub use reference::{decode, DecodedReference};
pub use stats::*;
