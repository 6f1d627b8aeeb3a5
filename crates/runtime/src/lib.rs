pub mod assets;
pub mod event_bus;
pub mod frame;

pub use assets::*;
pub use event_bus::*;
pub use frame::*;
