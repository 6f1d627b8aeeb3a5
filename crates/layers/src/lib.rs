pub mod connections;
pub mod heatmap;
pub mod layer;
pub mod markers;
pub mod regions;
pub mod symbology;

pub use connections::*;
pub use heatmap::*;
pub use layer::*;
pub use markers::*;
pub use regions::*;
pub use symbology::*;
