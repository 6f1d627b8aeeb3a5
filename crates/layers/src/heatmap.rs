use catalog::ExchangeServer;
use foundation::math::{OVERLAY_RADIUS, Vec3};

use crate::layer::{Layer, LayerId};
use crate::symbology::Rgba;

/// Latency mapped to full red.
pub const HEATMAP_SATURATION_MS: f64 = 500.0;
const SIZE_FACTOR: f64 = 0.02;
const OPACITY_FACTOR: f64 = 0.7;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatmapConfig {
    pub visible: bool,
    pub intensity_scale: f64,
    pub point_radius: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            visible: true,
            intensity_scale: 1.5,
            point_radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPoint {
    pub server_id: String,
    pub position: Vec3,
    /// `currentLatency / 500`, capped at 1.
    pub normalized: f64,
    pub color: Rgba,
    pub intensity: f64,
    pub opacity: f64,
    /// Sphere radius in globe units.
    pub size: f64,
}

/// One point per server, green at 0 ms to red at 500 ms and above.
///
/// Only `currentLatency` is considered; a missing value counts as 0.
/// Callers are expected to drop servers without coordinates first.
pub fn generate_heatmap<'a, I>(servers: I, config: &HeatmapConfig) -> Vec<HeatmapPoint>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    if !config.visible {
        return Vec::new();
    }

    servers
        .into_iter()
        .map(|server| {
            let latency = server.current_latency.unwrap_or(0.0);
            let normalized = (latency / HEATMAP_SATURATION_MS).min(1.0);
            let intensity = config.intensity_scale * (0.5 + normalized * 0.5);
            HeatmapPoint {
                server_id: server.id.clone(),
                position: server.position().to_vec3(OVERLAY_RADIUS),
                normalized,
                color: Rgba::GREEN.lerp(Rgba::RED, normalized as f32),
                intensity,
                opacity: intensity * OPACITY_FACTOR,
                size: config.point_radius * SIZE_FACTOR,
            }
        })
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatmapLayer {
    id: LayerId,
    pub config: HeatmapConfig,
}

impl HeatmapLayer {
    pub fn new(id: u64, config: HeatmapConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn extract<'a, I>(&self, servers: I) -> Vec<HeatmapPoint>
    where
        I: IntoIterator<Item = &'a ExchangeServer>,
    {
        generate_heatmap(servers, &self.config)
    }
}

impl Layer for HeatmapLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "heatmap"
    }
}

#[cfg(test)]
mod tests {
    use super::{HeatmapConfig, generate_heatmap};
    use catalog::{ExchangeServer, Provider, ServerStatus};
    use foundation::math::{OVERLAY_RADIUS, lat_lon_to_vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn server(id: &str, current: Option<f64>, ping: Option<f64>) -> ExchangeServer {
        ExchangeServer {
            id: id.to_string(),
            name: id.to_string(),
            code: String::new(),
            lat: 10.0,
            lon: -20.0,
            provider: Provider::Gcp,
            region: "r".to_string(),
            country: None,
            city: None,
            status: ServerStatus::Online,
            last_ping: ping,
            current_latency: current,
            last_updated: None,
            connections: Vec::new(),
            region_connections: Vec::new(),
            historical_latency: Vec::new(),
        }
    }

    #[test]
    fn hidden_heatmap_is_empty() {
        let servers = vec![server("a", Some(100.0), None)];
        let config = HeatmapConfig {
            visible: false,
            ..HeatmapConfig::default()
        };
        assert!(generate_heatmap(&servers, &config).is_empty());
    }

    #[test]
    fn zero_latency_is_green_at_half_intensity() {
        let servers = vec![server("a", Some(0.0), None)];
        let points = generate_heatmap(&servers, &HeatmapConfig::default());
        let p = &points[0];
        assert_eq!(p.normalized, 0.0);
        assert_eq!(p.color.to_hex(), "#00ff00");
        assert_close(p.intensity, 0.75, 1e-12);
        assert_close(p.opacity, 0.525, 1e-12);
        assert_close(p.size, 0.04, 1e-12);
        assert_eq!(p.position, lat_lon_to_vec3(10.0, -20.0, OVERLAY_RADIUS));
    }

    #[test]
    fn saturates_at_500ms() {
        let servers = vec![server("a", Some(250.0), None), server("b", Some(900.0), None)];
        let points = generate_heatmap(&servers, &HeatmapConfig::default());
        assert_close(points[0].normalized, 0.5, 1e-12);
        assert_close(points[0].intensity, 1.125, 1e-12);
        assert_eq!(points[1].normalized, 1.0);
        assert_eq!(points[1].color.to_hex(), "#ff0000");
        assert_close(points[1].intensity, 1.5, 1e-12);
    }

    #[test]
    fn last_ping_is_ignored() {
        let servers = vec![server("a", None, Some(400.0))];
        let points = generate_heatmap(&servers, &HeatmapConfig::default());
        assert_eq!(points[0].normalized, 0.0);
    }

    #[test]
    fn one_point_per_server_in_order() {
        let servers = vec![server("a", Some(10.0), None), server("b", Some(20.0), None)];
        let ids: Vec<String> = generate_heatmap(&servers, &HeatmapConfig::default())
            .into_iter()
            .map(|p| p.server_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
