pub mod pipeline;
pub mod stage1_extract;
pub mod stage2_normalize;
pub mod stage3_render;

pub use pipeline::*;
pub use stage1_extract::*;
pub use stage2_normalize::*;
pub use stage3_render::*;
