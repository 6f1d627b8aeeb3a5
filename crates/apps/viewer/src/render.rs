use layers::{ConnectionSet, HeatmapPoint, Layer, LayerId, LinkStyle, RegionOutline, ServerMarker};
use runtime::Frame;

use crate::orchestrator::Viewer;

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub frame: Frame,
    pub markers: Vec<ServerMarker>,
    pub connections: Option<ConnectionSet>,
    pub heatmap: Vec<HeatmapPoint>,
    pub regions: Vec<RegionOutline>,
    /// Layers in draw order.
    pub layers: Vec<(LayerId, &'static str)>,
    pub globe_texture_ready: bool,
}

impl RenderFrame {
    pub fn primitive_count(&self) -> usize {
        self.markers.len()
            + self.connections.as_ref().map_or(0, ConnectionSet::len)
            + self.heatmap.len()
            + self.regions.len()
    }

    /// Dash offset of a link drawn with `style` on this tick.
    pub fn dash_offset(&self, style: &LinkStyle) -> f32 {
        style.dash_offset(self.frame.elapsed_s())
    }
}

impl Viewer {
    /// Snapshot of the derived state as render primitives.
    pub fn render_frame(&self) -> RenderFrame {
        let state = self.state();
        let selected = state.selected_server_id();
        let derived = self.derived();

        let layers = &self.layers;
        let order: [&dyn Layer; 4] = [
            &layers.regions,
            &layers.heatmap,
            &layers.connections,
            &layers.markers,
        ];

        RenderFrame {
            frame: self.frame,
            markers: layers.markers.extract(self.filtered_servers(), selected),
            connections: derived.connections.clone(),
            heatmap: derived.heatmap.clone(),
            regions: layers
                .regions
                .extract(&self.dataset().regions, state.display.show_regions),
            layers: order.iter().map(|l| (l.id(), l.name())).collect(),
            globe_texture_ready: self.assets.is_ready(self.config.theme.texture()),
        }
    }
}
