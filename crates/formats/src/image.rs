use std::io::Cursor;

use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, error};

use crate::export::{ExportArtifact, ExportError, ExportFormat};

/// Raw RGBA8 pixels read back from a render target, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceCapture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Something that can hand out the last rendered frame.
pub trait RenderSurface {
    /// `None` when no drawing context is available.
    fn capture(&self) -> Option<SurfaceCapture>;
}

pub fn png_filename(date: NaiveDate) -> String {
    format!("latency-visualization-{}.png", date.format("%Y-%m-%d"))
}

/// Flattens `capture` over opaque white.
pub fn composite_over_white(capture: SurfaceCapture) -> Result<RgbaImage, ExportError> {
    let SurfaceCapture {
        width,
        height,
        mut pixels,
    } = capture;
    if width == 0 || height == 0 {
        return Err(ExportError::Surface(format!("empty capture {width}x{height}")));
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(ExportError::Surface(format!(
            "capture holds {} bytes, expected {expected} for {width}x{height}",
            pixels.len()
        )));
    }

    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u32;
        for c in &mut px[..3] {
            *c = ((*c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        }
        px[3] = 255;
    }

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| ExportError::Surface("capture buffer rejected".to_string()))
}

/// Encodes the current surface as `latency-visualization-<date>.png`.
///
/// Fails without emitting anything when there is no surface or the surface
/// cannot be read.
pub fn export_png(
    surface: Option<&dyn RenderSurface>,
    date: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    let Some(surface) = surface else {
        error!("png export: no render surface");
        return Err(ExportError::Surface("no render surface".to_string()));
    };
    let Some(capture) = surface.capture() else {
        error!("png export: could not capture render surface");
        return Err(ExportError::Surface("capture unavailable".to_string()));
    };

    let flattened = composite_over_white(capture)?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(flattened)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    let filename = png_filename(date);
    debug!(%filename, bytes = bytes.len(), "png export ready");
    Ok(ExportArtifact {
        format: ExportFormat::Png,
        filename,
        bytes,
    })
}
