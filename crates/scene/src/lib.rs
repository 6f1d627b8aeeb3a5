pub mod filter;
pub mod selection;
pub mod view_state;
pub mod visibility;

pub use filter::*;
pub use selection::*;
pub use view_state::*;
pub use visibility::*;
