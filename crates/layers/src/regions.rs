use catalog::{CloudRegion, Provider};
use foundation::math::{MARKER_RADIUS, OVERLAY_RADIUS, Vec3};
use tracing::debug;

use crate::layer::{Layer, LayerId};
use crate::symbology::{Rgba, provider_color};

const OUTLINE_WIDTH: f32 = 1.0;
const OUTLINE_OPACITY: f32 = 0.8;
const LABEL_FONT_SIZE: f32 = 0.015;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionOutline {
    pub region_id: String,
    pub name: String,
    pub provider: Provider,
    pub color: Rgba,
    /// Closed rectangle: the first point is repeated at the end.
    pub ring: [Vec3; 5],
    pub line_width: f32,
    pub opacity: f32,
    pub label_position: Vec3,
    pub label_size: f32,
}

/// Rectangular outlines around each region's boundary extent.
///
/// Empty when not visible. With `provider` set, other providers' regions
/// are skipped.
pub fn region_outlines(
    regions: &[CloudRegion],
    visible: bool,
    provider: Option<Provider>,
) -> Vec<RegionOutline> {
    if !visible {
        return Vec::new();
    }

    regions
        .iter()
        .filter(|r| provider.is_none_or(|p| r.provider == p))
        .filter_map(|region| {
            let Some(bounds) = region.bounds() else {
                debug!(region = %region.id, "region has no boundary points");
                return None;
            };
            let center = bounds.center();
            if !center.is_finite() {
                debug!(region = %region.id, "region boundary is not finite");
                return None;
            }
            let ring = bounds.closed_ring().map(|p| p.to_vec3(OVERLAY_RADIUS));
            let color = provider_color(region.provider);
            Some(RegionOutline {
                region_id: region.id.clone(),
                name: region.name.clone(),
                provider: region.provider,
                color,
                ring,
                line_width: OUTLINE_WIDTH,
                opacity: OUTLINE_OPACITY,
                label_position: center.to_vec3(MARKER_RADIUS),
                label_size: LABEL_FONT_SIZE,
            })
        })
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionsLayer {
    id: LayerId,
    pub provider: Option<Provider>,
}

impl RegionsLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            provider: None,
        }
    }

    pub fn extract(&self, regions: &[CloudRegion], visible: bool) -> Vec<RegionOutline> {
        region_outlines(regions, visible, self.provider)
    }
}

impl Layer for RegionsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "regions"
    }
}
