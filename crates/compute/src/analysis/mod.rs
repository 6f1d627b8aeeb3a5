pub mod statistics;
pub mod summary;
pub mod trend;

pub use statistics::*;
pub use summary::*;
pub use trend::*;
