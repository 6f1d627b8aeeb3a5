pub mod dataset;
pub mod model;
pub mod source;

pub use dataset::*;
pub use model::*;
pub use source::*;
