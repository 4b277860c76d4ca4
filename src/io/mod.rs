pub mod output;
pub mod table;
pub mod xml;

pub use output::*;
pub use table::*;
pub use xml::*;
