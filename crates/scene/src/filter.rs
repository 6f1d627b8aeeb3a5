use std::collections::BTreeSet;

use catalog::{ExchangeServer, Provider, ServerStatus};

/// Upper bound of the latency slider.
pub const MAX_LATENCY_CEILING_MS: f64 = 500.0;

/// Inclusive latency window in milliseconds. Always `0 <= min <= max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatencyRange {
    min: f64,
    max: f64,
}

impl LatencyRange {
    /// Negative or NaN bounds become 0; swapped bounds are reordered.
    pub fn new(min: f64, max: f64) -> Self {
        let min = non_negative(min);
        let max = non_negative(max);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, latency_ms: f64) -> bool {
        latency_ms >= self.min && latency_ms <= self.max
    }
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self::new(0.0, MAX_LATENCY_CEILING_MS)
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.max(0.0) }
}

/// Provider, status and latency predicates. All three must hold.
///
/// An empty provider or status set matches nothing; it does not mean
/// "no filter".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub providers: BTreeSet<Provider>,
    pub status: BTreeSet<ServerStatus>,
    pub latency_range: LatencyRange,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            providers: Provider::ALL.into_iter().collect(),
            status: ServerStatus::ALL.into_iter().collect(),
            latency_range: LatencyRange::default(),
        }
    }
}

impl FilterState {
    pub fn matches(&self, server: &ExchangeServer) -> bool {
        self.providers.contains(&server.provider)
            && self.status.contains(&server.status)
            && self.latency_range.contains(server.effective_latency())
    }

    /// Adds or removes `provider`. Returns whether it is now allowed.
    pub fn toggle_provider(&mut self, provider: Provider) -> bool {
        if !self.providers.remove(&provider) {
            self.providers.insert(provider);
            return true;
        }
        false
    }

    /// Adds or removes `status`. Returns whether it is now allowed.
    pub fn toggle_status(&mut self, status: ServerStatus) -> bool {
        if !self.status.remove(&status) {
            self.status.insert(status);
            return true;
        }
        false
    }

    /// Slider semantics: lower bound pinned at 0, ceiling clamped to the
    /// slider maximum.
    pub fn set_latency_ceiling(&mut self, max_ms: f64) {
        let max_ms = non_negative(max_ms).min(MAX_LATENCY_CEILING_MS);
        self.latency_range = LatencyRange::new(0.0, max_ms);
    }

    pub fn set_latency_range(&mut self, min_ms: f64, max_ms: f64) {
        self.latency_range = LatencyRange::new(min_ms, max_ms);
    }
}

/// Servers matching every predicate, in input order.
pub fn filter_servers<'a, I>(servers: I, filters: &FilterState) -> Vec<&'a ExchangeServer>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    servers.into_iter().filter(|s| filters.matches(s)).collect()
}
