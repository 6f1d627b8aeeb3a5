use catalog::ExchangeServer;

pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for &v in values {
            sum += v;
        }
        Some(sum / values.len() as f64)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }
}

/// Aggregate over a set of latency readings, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl LatencyStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = Statistics::mean(values)?;
        let (min, max) = Statistics::min_max(values)?;
        Some(Self {
            count: values.len(),
            mean,
            min,
            max,
        })
    }
}

/// Stats over `currentLatency` of the servers that report one.
pub fn current_latency_stats<'a, I>(servers: I) -> Option<LatencyStats>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    let values: Vec<f64> = servers.into_iter().filter_map(|s| s.current_latency).collect();
    LatencyStats::from_values(&values)
}
