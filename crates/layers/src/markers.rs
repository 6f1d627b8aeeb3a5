use catalog::{ExchangeServer, Provider, ServerStatus};
use foundation::math::{MARKER_RADIUS, Vec3};
use tracing::debug;

use crate::layer::{Layer, LayerId};
use crate::symbology::{Rgba, marker_color};

/// Marker sphere radius in globe units.
pub const MARKER_SIZE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerMarker {
    pub server_id: String,
    pub name: String,
    pub provider: Provider,
    pub status: ServerStatus,
    pub position: Vec3,
    pub color: Rgba,
    pub size: f64,
    pub selected: bool,
}

/// One marker per server that has coordinates.
pub fn server_markers<'a, I>(servers: I, selected_id: Option<&str>) -> Vec<ServerMarker>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    servers
        .into_iter()
        .filter_map(|server| {
            if !server.has_coordinates() {
                debug!(server = %server.id, "no coordinates; marker skipped");
                return None;
            }
            Some(ServerMarker {
                server_id: server.id.clone(),
                name: server.name.clone(),
                provider: server.provider,
                status: server.status,
                position: server.position().to_vec3(MARKER_RADIUS),
                color: marker_color(server.provider),
                size: MARKER_SIZE,
                selected: selected_id == Some(server.id.as_str()),
            })
        })
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MarkersLayer {
    id: LayerId,
}

impl MarkersLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    pub fn extract<'a, I>(&self, servers: I, selected_id: Option<&str>) -> Vec<ServerMarker>
    where
        I: IntoIterator<Item = &'a ExchangeServer>,
    {
        server_markers(servers, selected_id)
    }
}

impl Layer for MarkersLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "markers"
    }
}
