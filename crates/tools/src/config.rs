use std::env;
use std::path::PathBuf;

use layers::HeatmapConfig;

pub const DEFAULT_DATASET: &str = "crates/apps/viewer/assets/exchanges.json";

/// Settings read from `LATENCY_GLOBE_*` environment variables. Flags on the
/// command line take precedence over these.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub dataset: PathBuf,
    pub export_dir: PathBuf,
    pub heatmap: HeatmapConfig,
    pub texture_light: PathBuf,
    pub texture_dark: PathBuf,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = HeatmapConfig::default();
        Self {
            dataset: env_var_path(&lookup, "LATENCY_GLOBE_DATASET", DEFAULT_DATASET),
            export_dir: env_var_path(&lookup, "LATENCY_GLOBE_EXPORT_DIR", "."),
            heatmap: HeatmapConfig {
                intensity_scale: env_var_f64(
                    &lookup,
                    "LATENCY_GLOBE_HEATMAP_INTENSITY",
                    defaults.intensity_scale,
                ),
                point_radius: env_var_f64(
                    &lookup,
                    "LATENCY_GLOBE_HEATMAP_RADIUS",
                    defaults.point_radius,
                ),
                ..defaults
            },
            texture_light: env_var_path(
                &lookup,
                "LATENCY_GLOBE_TEXTURE_LIGHT",
                "assets/textures/earth-day.jpg",
            ),
            texture_dark: env_var_path(
                &lookup,
                "LATENCY_GLOBE_TEXTURE_DARK",
                "assets/textures/earth-night.jpg",
            ),
        }
    }
}

fn env_var_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn env_var_path(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PathBuf {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
