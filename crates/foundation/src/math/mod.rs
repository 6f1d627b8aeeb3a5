pub mod arc;
pub mod sphere;
pub mod vec;

pub use arc::*;
pub use sphere::*;
pub use vec::*;
