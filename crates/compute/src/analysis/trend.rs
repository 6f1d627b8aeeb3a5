use catalog::{ExchangeServer, LatencySample, ServerStatus};
use chrono::{DateTime, Utc};
use scene::TimeRange;

use super::statistics::Statistics;

/// Headroom above the highest sample on the chart's y axis.
pub const Y_AXIS_HEADROOM_MS: f64 = 20.0;

pub fn status_color(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Online => "#48BB78",
        ServerStatus::Degraded => "#ECC94B",
        ServerStatus::Offline => "#F56565",
    }
}

/// Samples of one server inside a historical window, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub server_id: String,
    pub range: TimeRange,
    pub cutoff: DateTime<Utc>,
    pub samples: Vec<LatencySample>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latencies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.latency).collect()
    }

    /// Highest sample plus headroom; `None` for an empty window.
    pub fn y_axis_max(&self) -> Option<f64> {
        Statistics::min_max(&self.latencies()).map(|(_, max)| max + Y_AXIS_HEADROOM_MS)
    }

    pub fn mean_latency(&self) -> Option<f64> {
        Statistics::mean(&self.latencies())
    }

    pub fn latest(&self) -> Option<&LatencySample> {
        self.samples.last()
    }
}

/// Keeps samples with `timestamp >= now - range`, in stored order.
pub fn trend_window(server: &ExchangeServer, range: TimeRange, now: DateTime<Utc>) -> TrendSeries {
    let cutoff = now - range.duration();
    TrendSeries {
        server_id: server.id.clone(),
        range,
        cutoff,
        samples: server
            .historical_latency
            .iter()
            .filter(|s| s.timestamp >= cutoff)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{status_color, trend_window};
    use catalog::{Dataset, ServerStatus};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use scene::TimeRange;

    fn fixture() -> Dataset {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/exchanges.json");
        Dataset::load(path).expect("load dataset")
    }

    fn now() -> DateTime<Utc> {
        "2025-01-15T10:00:00Z".parse().expect("timestamp")
    }

    #[test]
    fn window_sizes() {
        let dataset = fixture();
        let sg = dataset.server("binance-sg").expect("binance-sg");

        let counts: Vec<usize> = TimeRange::ALL
            .iter()
            .map(|&r| trend_window(sg, r, now()).samples.len())
            .collect();
        assert_eq!(counts, vec![2, 4, 6, 6]);
    }

    #[test]
    fn cutoff_is_inclusive_and_order_kept() {
        let dataset = fixture();
        let sg = dataset.server("binance-sg").expect("binance-sg");
        let series = trend_window(sg, TimeRange::SixHours, now());

        let first = &series.samples[0];
        assert_eq!(first.timestamp, series.cutoff);
        assert_eq!(first.status, ServerStatus::Degraded);
        assert!(series.samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(series.y_axis_max(), Some(81.0));
        assert_eq!(series.latest().map(|s| s.latency), Some(38.0));
    }

    #[test]
    fn server_without_history_has_empty_series() {
        let dataset = fixture();
        let sf = dataset.server("kraken-sf").expect("kraken-sf");
        let series = trend_window(sf, TimeRange::SevenDays, now());
        assert!(series.is_empty());
        assert_eq!(series.y_axis_max(), None);
        assert_eq!(series.mean_latency(), None);
    }

    #[test]
    fn status_palette() {
        assert_eq!(status_color(ServerStatus::Online), "#48BB78");
        assert_eq!(status_color(ServerStatus::Degraded), "#ECC94B");
        assert_eq!(status_color(ServerStatus::Offline), "#F56565");
    }
}
