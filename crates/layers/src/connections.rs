use std::collections::{HashMap, HashSet};

use catalog::{CloudRegion, ExchangeServer, Provider};
use foundation::math::{Arc, LINK_ELEVATION, OVERLAY_RADIUS, REGION_LINK_ELEVATION, build_arc};
use tracing::{debug, trace};

use crate::layer::{Layer, LayerId};
use crate::symbology::{LatencyBand, LinkStyle, Rgba, connection_color, provider_color};

/// Order-independent identity of a server pair: ids sorted, joined by `_`.
pub fn canonical_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

/// Identity of a server-to-region link.
pub fn region_link_key(server_id: &str, region_id: &str) -> String {
    format!("{server_id}_{region_id}")
}

/// One logical server pair. `from` is the server whose declaration won.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerLink {
    pub from: String,
    pub to: String,
    pub latency_ms: f64,
    pub band: LatencyBand,
    pub highlighted: bool,
    pub arc: Arc,
    pub color: Rgba,
    pub style: LinkStyle,
}

impl ServerLink {
    fn new(
        from: &ExchangeServer,
        to: &ExchangeServer,
        latency_ms: f64,
        selected_id: Option<&str>,
    ) -> Self {
        let band = LatencyBand::classify(latency_ms);
        let highlighted = selected_id.is_some_and(|id| id == from.id || id == to.id);
        let arc = build_arc(
            from.position().to_vec3(OVERLAY_RADIUS),
            to.position().to_vec3(OVERLAY_RADIUS),
            LINK_ELEVATION,
        );
        Self {
            from: from.id.clone(),
            to: to.id.clone(),
            latency_ms,
            band,
            highlighted,
            arc,
            color: connection_color(band, highlighted),
            style: LinkStyle::for_link(band, highlighted),
        }
    }

    pub fn key(&self) -> String {
        canonical_key(&self.from, &self.to)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionLink {
    pub server_id: String,
    pub region_id: String,
    pub provider: Provider,
    pub latency_ms: Option<f64>,
    pub highlighted: bool,
    pub arc: Arc,
    pub color: Rgba,
    pub style: LinkStyle,
}

impl RegionLink {
    fn new(
        server: &ExchangeServer,
        region: &CloudRegion,
        latency_ms: Option<f64>,
        selected_id: Option<&str>,
    ) -> Self {
        let highlighted = selected_id.is_some_and(|id| id == server.id);
        Self {
            server_id: server.id.clone(),
            region_id: region.id.clone(),
            provider: region.provider,
            latency_ms,
            highlighted,
            arc: build_arc(
                server.position().to_vec3(OVERLAY_RADIUS),
                region.center().to_vec3(OVERLAY_RADIUS),
                REGION_LINK_ELEVATION,
            ),
            color: provider_color(region.provider),
            style: LinkStyle::for_region_link(highlighted),
        }
    }

    pub fn key(&self) -> String {
        region_link_key(&self.server_id, &self.region_id)
    }
}

/// Resolved links partitioned by band, each list in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionSet {
    pub low: Vec<ServerLink>,
    pub medium: Vec<ServerLink>,
    pub high: Vec<ServerLink>,
    pub region: Vec<RegionLink>,
}

impl ConnectionSet {
    pub fn band(&self, band: LatencyBand) -> &[ServerLink] {
        match band {
            LatencyBand::Low => &self.low,
            LatencyBand::Medium => &self.medium,
            LatencyBand::High => &self.high,
        }
    }

    /// Server-to-server links, low band first.
    pub fn server_links(&self) -> impl Iterator<Item = &ServerLink> {
        self.low.iter().chain(&self.medium).chain(&self.high)
    }

    pub fn server_link_count(&self) -> usize {
        self.low.len() + self.medium.len() + self.high.len()
    }

    pub fn len(&self) -> usize {
        self.server_link_count() + self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highlighted links of both kinds.
    pub fn highlighted_count(&self) -> usize {
        self.server_links().filter(|l| l.highlighted).count()
            + self.region.iter().filter(|l| l.highlighted).count()
    }

    pub fn find(&self, a: &str, b: &str) -> Option<&ServerLink> {
        let key = canonical_key(a, b);
        self.server_links().find(|l| l.key() == key)
    }

    fn push(&mut self, link: ServerLink) {
        match link.band {
            LatencyBand::Low => self.low.push(link),
            LatencyBand::Medium => self.medium.push(link),
            LatencyBand::High => self.high.push(link),
        }
    }
}

/// Builds the de-duplicated connection set.
///
/// For each unordered pair the first declaration encountered in server
/// order wins, including its latency. Targets and regions that are not
/// present are dropped. Servers without coordinates take no part.
pub fn resolve_connections<'a, I>(
    servers: I,
    regions: &[CloudRegion],
    selected_id: Option<&str>,
) -> ConnectionSet
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    let placed: Vec<&ExchangeServer> = servers
        .into_iter()
        .filter(|s| {
            if !s.has_coordinates() {
                debug!(server = %s.id, "server has no coordinates; skipping its links");
                return false;
            }
            true
        })
        .collect();

    let mut servers_by_id: HashMap<&str, &ExchangeServer> = HashMap::with_capacity(placed.len());
    for s in placed.iter().copied() {
        servers_by_id.entry(s.id.as_str()).or_insert(s);
    }
    let mut regions_by_id: HashMap<&str, &CloudRegion> = HashMap::with_capacity(regions.len());
    for r in regions {
        regions_by_id.entry(r.id.as_str()).or_insert(r);
    }

    let mut out = ConnectionSet::default();
    let mut seen_pairs: HashSet<String> = HashSet::new();
    let mut seen_region_links: HashSet<String> = HashSet::new();

    for server in &placed {
        for decl in &server.connections {
            let Some(target) = servers_by_id.get(decl.target_id.as_str()) else {
                trace!(from = %server.id, to = %decl.target_id, "dropping link to unknown server");
                continue;
            };
            if !seen_pairs.insert(canonical_key(&server.id, &target.id)) {
                continue;
            }
            out.push(ServerLink::new(server, target, decl.latency, selected_id));
        }

        for decl in &server.region_connections {
            let Some(region) = regions_by_id.get(decl.region_id.as_str()) else {
                trace!(
                    from = %server.id,
                    region = %decl.region_id,
                    "dropping link to unknown region"
                );
                continue;
            };
            if !seen_region_links.insert(region_link_key(&server.id, &region.id)) {
                continue;
            }
            out.region
                .push(RegionLink::new(server, region, decl.latency, selected_id));
        }
    }

    debug!(
        low = out.low.len(),
        medium = out.medium.len(),
        high = out.high.len(),
        region = out.region.len(),
        "resolved connections"
    );
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConnectionsLayer {
    id: LayerId,
}

impl ConnectionsLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    pub fn extract<'a, I>(
        &self,
        servers: I,
        regions: &[CloudRegion],
        selected_id: Option<&str>,
    ) -> ConnectionSet
    where
        I: IntoIterator<Item = &'a ExchangeServer>,
    {
        resolve_connections(servers, regions, selected_id)
    }
}

impl Layer for ConnectionsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "connections"
    }
}
