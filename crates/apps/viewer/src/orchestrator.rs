use catalog::{CatalogError, Dataset, DatasetSource, ExchangeServer, Provider, ServerStatus};
use chrono::{DateTime, Utc};
use compute::{ShowingSummary, TrendSeries, trend_window};
use layers::{
    ConnectionSet, ConnectionsLayer, HeatmapConfig, HeatmapLayer, HeatmapPoint, MarkersLayer,
    RegionsLayer,
};
use runtime::{AssetError, AssetKind, AssetTracker, Event, EventBus, EventKind, Frame};
use scene::{DisplayLayer, TimeRange, ViewState};
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn texture(&self) -> AssetKind {
        match self {
            Theme::Light => AssetKind::GlobeTextureLight,
            Theme::Dark => AssetKind::GlobeTextureDark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewerConfig {
    pub heatmap: HeatmapConfig,
    /// Limits region outlines to one provider.
    pub region_provider: Option<Provider>,
    pub theme: Theme,
}

/// Collections recomputed from the dataset and the current [`ViewState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedState {
    /// Ids of servers passing the filters, in dataset order.
    pub filtered: Vec<String>,
    /// Present only while connections are shown and a server is selected.
    pub connections: Option<ConnectionSet>,
    /// Empty unless the heatmap is shown.
    pub heatmap: Vec<HeatmapPoint>,
}

/// How many times each derived collection has been rebuilt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RecomputeStats {
    pub filter: u64,
    pub connections: u64,
    pub heatmap: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Change {
    Initial,
    Filters,
    Display,
    Selection,
    TimeRange,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ViewerLayers {
    pub(crate) markers: MarkersLayer,
    pub(crate) connections: ConnectionsLayer,
    pub(crate) heatmap: HeatmapLayer,
    pub(crate) regions: RegionsLayer,
}

/// Single owner of the view state.
///
/// Every mutator records an event and recomputes the derived collections
/// before returning, so readers never observe a stale [`DerivedState`].
#[derive(Debug)]
pub struct Viewer {
    dataset: Dataset,
    state: ViewState,
    derived: DerivedState,
    filtered_indices: Vec<usize>,
    pub(crate) config: ViewerConfig,
    pub(crate) layers: ViewerLayers,
    pub(crate) events: EventBus,
    pub(crate) assets: AssetTracker,
    pub(crate) frame: Frame,
    stats: RecomputeStats,
}

impl Viewer {
    pub fn new(dataset: Dataset, config: ViewerConfig) -> Self {
        let mut regions = RegionsLayer::new(4);
        regions.provider = config.region_provider;
        let layers = ViewerLayers {
            markers: MarkersLayer::new(1),
            connections: ConnectionsLayer::new(2),
            heatmap: HeatmapLayer::new(3, config.heatmap),
            regions,
        };

        let mut assets = AssetTracker::new();
        assets.request(AssetKind::GlobeTextureLight);
        assets.request(AssetKind::GlobeTextureDark);

        if let Ok(hash) = dataset.content_hash() {
            info!(
                servers = dataset.servers.len(),
                regions = dataset.regions.len(),
                %hash,
                "viewer dataset loaded"
            );
        }

        let mut viewer = Self {
            dataset,
            state: ViewState::default(),
            derived: DerivedState::default(),
            filtered_indices: Vec::new(),
            config,
            layers,
            events: EventBus::new(),
            assets,
            frame: Frame::default(),
            stats: RecomputeStats::default(),
        };
        viewer.recompute(Change::Initial);
        viewer
    }

    pub fn from_source(
        source: &dyn DatasetSource,
        config: ViewerConfig,
    ) -> Result<Self, CatalogError> {
        info!(source = %source.describe(), "loading dataset");
        Ok(Self::new(source.load()?, config))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn stats(&self) -> RecomputeStats {
        self.stats
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn assets(&self) -> &AssetTracker {
        &self.assets
    }

    /// Filtered servers in dataset order.
    pub fn filtered_servers(&self) -> Vec<&ExchangeServer> {
        self.filtered_indices
            .iter()
            .filter_map(|&i| self.dataset.servers.get(i))
            .collect()
    }

    pub fn selected_server(&self) -> Option<&ExchangeServer> {
        self.state
            .selected_server_id()
            .and_then(|id| self.dataset.server(id))
    }

    pub fn showing_summary(&self) -> ShowingSummary {
        ShowingSummary {
            shown: self.filtered_indices.len(),
            total: self.dataset.servers.len(),
        }
    }

    /// Trend of the selected server over the current time range.
    pub fn selected_trend(&self, now: DateTime<Utc>) -> Option<TrendSeries> {
        self.selected_server()
            .map(|server| trend_window(server, self.state.time_range, now))
    }

    pub fn advance_frame(&mut self) -> Frame {
        self.frame = self.frame.next();
        self.frame
    }

    pub fn toggle_provider(&mut self, provider: Provider) -> bool {
        let allowed = self.state.filters.toggle_provider(provider);
        self.emit(EventKind::FilterChanged, format!("provider {provider} allowed={allowed}"));
        self.recompute(Change::Filters);
        allowed
    }

    pub fn toggle_status(&mut self, status: ServerStatus) -> bool {
        let allowed = self.state.filters.toggle_status(status);
        self.emit(EventKind::FilterChanged, format!("status {status} allowed={allowed}"));
        self.recompute(Change::Filters);
        allowed
    }

    /// Slider input: the lower bound stays at 0, the ceiling is clamped to 0..=500.
    pub fn set_latency_ceiling(&mut self, max_ms: f64) {
        self.state.filters.set_latency_ceiling(max_ms);
        let range = self.state.filters.latency_range;
        self.emit(EventKind::FilterChanged, format!("latency 0..={}", range.max()));
        self.recompute(Change::Filters);
    }

    pub fn set_latency_range(&mut self, min_ms: f64, max_ms: f64) {
        self.state.filters.set_latency_range(min_ms, max_ms);
        let range = self.state.filters.latency_range;
        self.emit(
            EventKind::FilterChanged,
            format!("latency {}..={}", range.min(), range.max()),
        );
        self.recompute(Change::Filters);
    }

    pub fn toggle_connections(&mut self) -> bool {
        self.toggle_layer(DisplayLayer::Connections)
    }

    pub fn toggle_regions(&mut self) -> bool {
        self.toggle_layer(DisplayLayer::Regions)
    }

    pub fn toggle_heatmap(&mut self) -> bool {
        self.toggle_layer(DisplayLayer::Heatmap)
    }

    /// Selects `id`; selecting the current server again clears the selection.
    /// Returns the selection after the call.
    pub fn select(&mut self, id: Option<&str>) -> Option<&str> {
        let changed = self.state.selection.toggle(id);
        let msg = match self.state.selected_server_id() {
            Some(current) => format!("selected {current} changed={changed}"),
            None => format!("selection cleared changed={changed}"),
        };
        self.emit(EventKind::SelectionChanged, msg);
        self.recompute(Change::Selection);
        self.state.selected_server_id()
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.state.time_range = range;
        self.emit(EventKind::TimeRangeChanged, format!("time range {range}"));
        self.recompute(Change::TimeRange);
    }

    pub fn complete_asset(&mut self, kind: AssetKind) -> Result<(), AssetError> {
        self.assets.complete(kind)?;
        self.emit(EventKind::AssetReady, kind.as_str());
        Ok(())
    }

    pub fn fail_asset(&mut self, kind: AssetKind, reason: &str) -> Result<(), AssetError> {
        self.assets.fail(kind, reason)?;
        self.emit(EventKind::AssetFailed, format!("{}: {reason}", kind.as_str()));
        Ok(())
    }

    pub(crate) fn emit(&mut self, kind: EventKind, message: impl Into<String>) {
        self.events.emit(self.frame, kind, message);
    }

    fn toggle_layer(&mut self, layer: DisplayLayer) -> bool {
        let visible = self.state.display.toggle(layer);
        self.emit(
            EventKind::DisplayToggled,
            format!("{} visible={visible}", layer.as_str()),
        );
        self.recompute(Change::Display);
        visible
    }

    fn recompute(&mut self, change: Change) {
        if matches!(change, Change::Initial | Change::Filters) {
            let filters = &self.state.filters;
            self.filtered_indices = self
                .dataset
                .servers
                .iter()
                .enumerate()
                .filter(|(_, s)| filters.matches(s))
                .map(|(i, _)| i)
                .collect();
            self.derived.filtered = self
                .filtered_indices
                .iter()
                .filter_map(|&i| self.dataset.servers.get(i))
                .map(|s| s.id.clone())
                .collect();
            self.stats.filter += 1;
        }

        let servers: Vec<&ExchangeServer> = self
            .filtered_indices
            .iter()
            .filter_map(|&i| self.dataset.servers.get(i))
            .collect();
        let selected = self.state.selected_server_id();
        let display = self.state.display;

        self.derived.connections = match selected {
            Some(id) if display.show_connections => {
                self.stats.connections += 1;
                Some(
                    self.layers
                        .connections
                        .extract(servers.iter().copied(), &self.dataset.regions, Some(id)),
                )
            }
            _ => None,
        };

        self.derived.heatmap = if display.show_heatmap {
            self.stats.heatmap += 1;
            self.layers
                .heatmap
                .extract(servers.iter().copied().filter(|s| s.has_coordinates()))
        } else {
            Vec::new()
        };

        let summary = format!(
            "{change:?}: {} servers, {} links, {} heat points",
            self.derived.filtered.len(),
            self.derived.connections.as_ref().map_or(0, ConnectionSet::len),
            self.derived.heatmap.len()
        );
        self.events.emit(self.frame, EventKind::Recomputed, summary);
    }
}
