use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CloudRegion, ExchangeServer, REGION_BOUNDARY_POINTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "dataset I/O error: {msg}"),
            CatalogError::Parse(msg) => write!(f, "dataset parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only snapshot of servers and regions, loaded once per session.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub servers: Vec<ExchangeServer>,
    #[serde(default)]
    pub regions: Vec<CloudRegion>,
}

impl Dataset {
    /// Regions without exactly four boundary points are dropped.
    pub fn new(servers: Vec<ExchangeServer>, regions: Vec<CloudRegion>) -> Self {
        let mut dataset = Self { servers, regions };
        dataset.drop_malformed_regions();
        dataset
    }

    pub fn from_json_str(payload: &str) -> Result<Self, CatalogError> {
        let mut dataset: Dataset =
            serde_json::from_str(payload).map_err(|e| CatalogError::Parse(e.to_string()))?;
        dataset.drop_malformed_regions();
        debug!(
            servers = dataset.servers.len(),
            regions = dataset.regions.len(),
            "parsed dataset"
        );
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&payload)
    }

    pub fn server(&self, id: &str) -> Option<&ExchangeServer> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn region(&self, id: &str) -> Option<&CloudRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// BLAKE3 hex digest of the canonical JSON encoding.
    pub fn content_hash(&self) -> Result<String, CatalogError> {
        let bytes = serde_json::to_vec(self).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    fn drop_malformed_regions(&mut self) {
        self.regions.retain(|region| {
            let points = region.boundaries.len();
            if points != REGION_BOUNDARY_POINTS {
                debug!(region = %region.id, points, "skipping region with malformed boundary");
                return false;
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, Dataset};
    use crate::model::{Provider, ServerStatus};
    use pretty_assertions::assert_eq;

    pub(crate) fn fixture_path() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/exchanges.json")
    }

    #[test]
    fn loads_fixture_dataset() {
        let dataset = Dataset::load(fixture_path()).expect("load dataset");
        assert_eq!(dataset.servers.len(), 9);
        assert_eq!(dataset.regions.len(), 6);

        let sg = dataset.server("binance-sg").expect("binance-sg");
        assert_eq!(sg.provider, Provider::Aws);
        assert_eq!(sg.status, ServerStatus::Online);
        assert_eq!(sg.connections.len(), 3);
        assert_eq!(sg.region_connections.len(), 1);
        assert!(!sg.historical_latency.is_empty());

        let relay = dataset.server("bitmex-relay").expect("bitmex-relay");
        assert!(!relay.has_coordinates());

        assert!(dataset.server("ghost-node").is_none());
        assert!(dataset.region("europe-west-nl").is_some());
    }

    #[test]
    fn skips_region_with_wrong_boundary_count() {
        let payload = r#"{
            "servers": [],
            "regions": [{
                "id": "us-east-us", "name": "Virginia", "provider": "AWS",
                "lat": 38.0, "lon": -77.0,
                "boundaries": [{"lat": 39.0, "lon": -78.0}, {"lat": 37.0, "lon": -76.0}]
            }, {
                "id": "eu-west-ie", "name": "Ireland", "provider": "AWS",
                "lat": 53.0, "lon": -8.0,
                "boundaries": [
                    {"lat": 54.0, "lon": -9.0}, {"lat": 54.0, "lon": -7.0},
                    {"lat": 52.0, "lon": -7.0}, {"lat": 52.0, "lon": -9.0}
                ]
            }]
        }"#;
        let dataset = Dataset::from_json_str(payload).expect("parse");
        let ids: Vec<&str> = dataset.regions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["eu-west-ie"]);
        assert!(dataset.region("us-east-us").is_none());

        let rebuilt = Dataset::new(Vec::new(), dataset.regions.clone());
        assert_eq!(rebuilt.regions.len(), 1);
    }

    #[test]
    fn regions_default_to_empty() {
        let dataset = Dataset::from_json_str(r#"{"servers": []}"#).expect("parse");
        assert!(dataset.regions.is_empty());
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = Dataset::from_json_str("{").expect_err("expect parse error");
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Dataset::load("/nonexistent/exchanges.json").expect_err("expect io error");
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn content_hash_is_stable() {
        let dataset = Dataset::load(fixture_path()).expect("load dataset");
        let a = dataset.content_hash().expect("hash");
        let b = dataset.clone().content_hash().expect("hash");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, Dataset::default().content_hash().expect("hash"));
    }
}
