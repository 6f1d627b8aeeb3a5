use chrono::{DateTime, Utc};
use foundation::bounds::GeoBounds;
use foundation::math::LatLon;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "GCP")]
    Gcp,
    #[serde(rename = "Azure")]
    Azure,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Gcp, Provider::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "AWS",
            Provider::Gcp => "GCP",
            Provider::Azure => "Azure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Some(Provider::Aws),
            "gcp" => Some(Provider::Gcp),
            "azure" => Some(Provider::Azure),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Degraded,
    Offline,
}

impl ServerStatus {
    pub const ALL: [ServerStatus; 3] = [
        ServerStatus::Online,
        ServerStatus::Degraded,
        ServerStatus::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Degraded => "degraded",
            ServerStatus::Offline => "offline",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Some(ServerStatus::Online),
            "degraded" => Some(ServerStatus::Degraded),
            "offline" => Some(ServerStatus::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound server-to-server link as declared by the source server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDecl {
    pub target_id: String,
    /// Milliseconds.
    pub latency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Outbound server-to-region link. Regions never declare links themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionLinkDecl {
    pub region_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    pub timestamp: DateTime<Utc>,
    pub latency: f64,
    pub status: ServerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeServer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    // Missing, null or non-numeric coordinates load as NaN; see `has_coordinates`.
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub lon: f64,
    pub provider: Provider,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub status: ServerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub connections: Vec<ConnectionDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub region_connections: Vec<RegionLinkDecl>,
    #[serde(default)]
    pub historical_latency: Vec<LatencySample>,
}

impl ExchangeServer {
    /// Single latency figure used for filtering and coloring:
    /// current latency, else last ping, else 0.
    pub fn effective_latency(&self) -> f64 {
        self.current_latency.or(self.last_ping).unwrap_or(0.0)
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// False when either coordinate is NaN or infinite. Such servers are
    /// skipped by everything that places geometry on the globe.
    pub fn has_coordinates(&self) -> bool {
        self.position().is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Number of boundary points a region must declare.
pub const REGION_BOUNDARY_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudRegion {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub lat: f64,
    pub lon: f64,
    /// Informational only.
    #[serde(default)]
    pub servers: u32,
    pub boundaries: Vec<BoundaryPoint>,
}

impl CloudRegion {
    pub fn center(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// Lat/lon extent of the declared boundary points.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(
            self.boundaries
                .iter()
                .map(|b| LatLon::new(b.lat, b.lon)),
        )
    }

    /// First dash-separated segment of the id, upper-cased.
    pub fn continent(&self) -> String {
        self.id
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }

    /// Last dash-separated segment of the id, upper-cased, `N/A` when empty.
    pub fn country_code(&self) -> String {
        match self.id.rsplit('-').next() {
            Some(s) if !s.is_empty() => s.to_ascii_uppercase(),
            _ => "N/A".to_string(),
        }
    }
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).unwrap_or(f64::NAN))
}
