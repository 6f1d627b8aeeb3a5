/// Optional overlays the user can switch on and off.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DisplayLayer {
    Connections,
    Regions,
    Heatmap,
}

impl DisplayLayer {
    pub const ALL: [DisplayLayer; 3] = [
        DisplayLayer::Connections,
        DisplayLayer::Regions,
        DisplayLayer::Heatmap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayLayer::Connections => "connections",
            DisplayLayer::Regions => "regions",
            DisplayLayer::Heatmap => "heatmap",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayToggles {
    pub show_connections: bool,
    pub show_regions: bool,
    pub show_heatmap: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_connections: true,
            show_regions: false,
            show_heatmap: false,
        }
    }
}

impl DisplayToggles {
    pub fn is_visible(&self, layer: DisplayLayer) -> bool {
        match layer {
            DisplayLayer::Connections => self.show_connections,
            DisplayLayer::Regions => self.show_regions,
            DisplayLayer::Heatmap => self.show_heatmap,
        }
    }

    /// Flips `layer` and returns its new visibility.
    pub fn toggle(&mut self, layer: DisplayLayer) -> bool {
        let flag = match layer {
            DisplayLayer::Connections => &mut self.show_connections,
            DisplayLayer::Regions => &mut self.show_regions,
            DisplayLayer::Heatmap => &mut self.show_heatmap,
        };
        *flag = !*flag;
        *flag
    }
}
