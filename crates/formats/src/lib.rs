pub mod export;
pub mod image;

pub use self::image::{
    RenderSurface, SurfaceCapture, composite_over_white, export_png, png_filename,
};
pub use export::*;
