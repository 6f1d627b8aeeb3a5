pub mod export;
pub mod orchestrator;
pub mod render;

pub use export::*;
pub use orchestrator::*;
pub use render::*;
