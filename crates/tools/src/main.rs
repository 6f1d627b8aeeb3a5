use std::path::PathBuf;

use catalog::{ExchangeServer, JsonFileSource, Provider, ServerStatus};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use compute::{
    current_latency_stats, provider_counts, regions_by_continent, status_color, status_counts,
};
use layers::{RegionLink, ServerLink, latency_badge_color};
use runtime::AssetKind;
use scene::TimeRange;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use viewer::{Theme, Viewer, ViewerConfig};

mod config;
mod sink;

use config::CliConfig;
use sink::DirectorySink;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Exchange server latency globe: filters, links, heatmap and exports"
)]
struct Args {
    /// Dataset JSON (default: $LATENCY_GLOBE_DATASET)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Providers to keep, comma separated (AWS,GCP,Azure)
    #[arg(long, global = true, value_delimiter = ',')]
    provider: Vec<String>,

    /// Statuses to keep, comma separated (online,degraded,offline)
    #[arg(long, global = true, value_delimiter = ',')]
    status: Vec<String>,

    /// Lower latency bound in ms
    #[arg(long, global = true)]
    min_latency: Option<f64>,

    /// Upper latency bound in ms (capped at 500)
    #[arg(long, global = true)]
    max_latency: Option<f64>,

    /// Globe theme: light or dark
    #[arg(long, global = true, default_value = "dark")]
    theme: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts, latency statistics and region groups for the filtered servers
    Summary,

    /// List the servers that pass the filters
    Filter,

    /// Resolve latency links around a selected server
    Connections {
        #[arg(long)]
        select: String,
    },

    /// Heatmap points for the filtered servers
    Heatmap {
        #[arg(long)]
        intensity: Option<f64>,
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Cloud region outlines
    Regions {
        /// Only outline this provider's regions
        #[arg(long)]
        only: Option<String>,
    },

    /// Latency history of one server
    Trend {
        id: String,

        /// 1h, 6h, 24h or 7d
        #[arg(long, default_value = "6h")]
        range: String,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Export the server list to the export directory
    Export {
        /// json, csv or png
        #[arg(long)]
        format: String,

        #[arg(long)]
        select: Option<String>,

        /// Output directory (default: $LATENCY_GLOBE_EXPORT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let mut cfg = CliConfig::from_env();
    if let Some(dataset) = &args.dataset {
        cfg.dataset = dataset.clone();
    }

    let mut config = ViewerConfig {
        heatmap: cfg.heatmap,
        theme: parse_theme(&args.theme)?,
        ..ViewerConfig::default()
    };
    match &args.command {
        Command::Heatmap { intensity, radius } => {
            if let Some(v) = intensity {
                config.heatmap.intensity_scale = *v;
            }
            if let Some(v) = radius {
                config.heatmap.point_radius = *v;
            }
        }
        Command::Regions { only: Some(p) } => {
            config.region_provider = Some(parse_provider(p)?);
        }
        _ => {}
    }

    let source = JsonFileSource::new(&cfg.dataset);
    let mut viewer = Viewer::from_source(&source, config)
        .map_err(|e| format!("{}: {e}", cfg.dataset.display()))?;
    resolve_textures(&mut viewer, &cfg);
    apply_filters(&mut viewer, &args)?;

    let result = match args.command {
        Command::Summary => cmd_summary(&viewer),
        Command::Filter => cmd_filter(&viewer),
        Command::Connections { select } => cmd_connections(&mut viewer, &select),
        Command::Heatmap { .. } => cmd_heatmap(&mut viewer),
        Command::Regions { .. } => cmd_regions(&mut viewer),
        Command::Trend { id, range, now } => cmd_trend(&mut viewer, &id, &range, now.as_deref()),
        Command::Export { format, select, out } => {
            cmd_export(&mut viewer, &format, select.as_deref(), out.unwrap_or(cfg.export_dir))
        }
    };
    for event in viewer.drain_events() {
        debug!(frame = event.frame_index, kind = event.kind.as_str(), "{}", event.message);
    }
    result
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    match s.to_ascii_lowercase().as_str() {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        _ => Err(format!("unknown theme: {s} (expected light or dark)")),
    }
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::from_str(s.trim()).ok_or_else(|| format!("unknown provider: {s}"))
}

fn parse_status(s: &str) -> Result<ServerStatus, String> {
    ServerStatus::from_str(s.trim()).ok_or_else(|| format!("unknown status: {s}"))
}

// Textures are only checked for presence; the core tracks readiness.
fn resolve_textures(viewer: &mut Viewer, cfg: &CliConfig) {
    for (kind, path) in [
        (AssetKind::GlobeTextureLight, &cfg.texture_light),
        (AssetKind::GlobeTextureDark, &cfg.texture_dark),
    ] {
        let result = if path.exists() {
            viewer.complete_asset(kind)
        } else {
            viewer.fail_asset(kind, &format!("{} not found", path.display()))
        };
        if let Err(e) = result {
            warn!("{e}");
        }
    }
}

fn apply_filters(viewer: &mut Viewer, args: &Args) -> Result<(), String> {
    if !args.provider.is_empty() {
        let keep = args
            .provider
            .iter()
            .map(|s| parse_provider(s))
            .collect::<Result<Vec<_>, _>>()?;
        for p in Provider::ALL {
            if !keep.contains(&p) {
                viewer.toggle_provider(p);
            }
        }
    }
    if !args.status.is_empty() {
        let keep = args
            .status
            .iter()
            .map(|s| parse_status(s))
            .collect::<Result<Vec<_>, _>>()?;
        for s in ServerStatus::ALL {
            if !keep.contains(&s) {
                viewer.toggle_status(s);
            }
        }
    }
    match (args.min_latency, args.max_latency) {
        (None, None) => {}
        (None, Some(max)) => viewer.set_latency_ceiling(max),
        (min, max) => viewer.set_latency_range(
            min.unwrap_or(0.0),
            max.unwrap_or(scene::MAX_LATENCY_CEILING_MS),
        ),
    }
    info!(summary = %viewer.showing_summary(), "filters applied");
    Ok(())
}

fn require_server(viewer: &mut Viewer, id: &str) -> Result<(), String> {
    if viewer.dataset().server(id).is_none() {
        return Err(format!("unknown server: {id}"));
    }
    viewer.select(Some(id));
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

#[derive(Serialize)]
struct CountOut {
    key: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct LatencyOut {
    count: usize,
    mean: f64,
    min: f64,
    max: f64,
}

#[derive(Serialize)]
struct ContinentOut {
    continent: String,
    regions: Vec<String>,
}

#[derive(Serialize)]
struct SummaryOut {
    showing: String,
    shown: usize,
    total: usize,
    providers: Vec<CountOut>,
    statuses: Vec<CountOut>,
    current_latency: Option<LatencyOut>,
    continents: Vec<ContinentOut>,
    globe_texture_ready: bool,
}

fn cmd_summary(viewer: &Viewer) -> Result<(), String> {
    let servers = viewer.filtered_servers();
    let out = SummaryOut {
        showing: viewer.showing_summary().to_string(),
        shown: servers.len(),
        total: viewer.dataset().servers.len(),
        providers: provider_counts(servers.iter().copied())
            .into_iter()
            .map(|(p, count)| CountOut { key: p.as_str(), count })
            .collect(),
        statuses: status_counts(servers.iter().copied())
            .into_iter()
            .map(|(s, count)| CountOut { key: s.as_str(), count })
            .collect(),
        current_latency: current_latency_stats(servers.iter().copied()).map(|s| LatencyOut {
            count: s.count,
            mean: s.mean,
            min: s.min,
            max: s.max,
        }),
        continents: regions_by_continent(&viewer.dataset().regions)
            .into_iter()
            .map(|g| ContinentOut {
                continent: g.continent,
                regions: g.regions.iter().map(|r| r.id.clone()).collect(),
            })
            .collect(),
        globe_texture_ready: viewer.assets().is_ready(viewer.config().theme.texture()),
    };
    print_json(&out)
}

#[derive(Serialize)]
struct ServerOut<'a> {
    id: &'a str,
    name: &'a str,
    provider: &'static str,
    status: &'static str,
    region: &'a str,
    latency_ms: f64,
    badge_color: String,
}

impl<'a> From<&'a ExchangeServer> for ServerOut<'a> {
    fn from(s: &'a ExchangeServer) -> Self {
        let latency_ms = s.effective_latency();
        Self {
            id: &s.id,
            name: &s.name,
            provider: s.provider.as_str(),
            status: s.status.as_str(),
            region: &s.region,
            latency_ms,
            badge_color: latency_badge_color(latency_ms).to_hex(),
        }
    }
}

fn cmd_filter(viewer: &Viewer) -> Result<(), String> {
    let out: Vec<ServerOut<'_>> = viewer
        .filtered_servers()
        .into_iter()
        .map(ServerOut::from)
        .collect();
    print_json(&out)
}

#[derive(Serialize)]
struct LinkOut {
    from: String,
    to: String,
    latency_ms: f64,
    band: &'static str,
    highlighted: bool,
    color: String,
    line_width: f32,
}

impl From<&ServerLink> for LinkOut {
    fn from(link: &ServerLink) -> Self {
        Self {
            from: link.from.clone(),
            to: link.to.clone(),
            latency_ms: link.latency_ms,
            band: link.band.as_str(),
            highlighted: link.highlighted,
            color: link.color.to_hex(),
            line_width: link.style.line_width,
        }
    }
}

#[derive(Serialize)]
struct RegionLinkOut {
    server_id: String,
    region_id: String,
    provider: &'static str,
    latency_ms: Option<f64>,
    highlighted: bool,
}

impl From<&RegionLink> for RegionLinkOut {
    fn from(link: &RegionLink) -> Self {
        Self {
            server_id: link.server_id.clone(),
            region_id: link.region_id.clone(),
            provider: link.provider.as_str(),
            latency_ms: link.latency_ms,
            highlighted: link.highlighted,
        }
    }
}

#[derive(Serialize)]
struct ConnectionsOut {
    selected: String,
    links: Vec<LinkOut>,
    region_links: Vec<RegionLinkOut>,
    highlighted: usize,
}

fn cmd_connections(viewer: &mut Viewer, id: &str) -> Result<(), String> {
    require_server(viewer, id)?;
    if !viewer.state().display.show_connections {
        viewer.toggle_connections();
    }
    let Some(set) = viewer.derived().connections.as_ref() else {
        return Err(format!("no connections resolved for {id}"));
    };
    let out = ConnectionsOut {
        selected: id.to_string(),
        links: set.server_links().map(LinkOut::from).collect(),
        region_links: set.region.iter().map(RegionLinkOut::from).collect(),
        highlighted: set.highlighted_count(),
    };
    print_json(&out)
}

#[derive(Serialize)]
struct HeatPointOut {
    server_id: String,
    position: [f64; 3],
    normalized: f64,
    color: String,
    intensity: f64,
    opacity: f64,
    size: f64,
}

fn cmd_heatmap(viewer: &mut Viewer) -> Result<(), String> {
    if !viewer.state().display.show_heatmap {
        viewer.toggle_heatmap();
    }
    let out: Vec<HeatPointOut> = viewer
        .derived()
        .heatmap
        .iter()
        .map(|p| HeatPointOut {
            server_id: p.server_id.clone(),
            position: [p.position.x, p.position.y, p.position.z],
            normalized: p.normalized,
            color: p.color.to_hex(),
            intensity: p.intensity,
            opacity: p.opacity,
            size: p.size,
        })
        .collect();
    print_json(&out)
}

#[derive(Serialize)]
struct RegionOut {
    id: String,
    name: String,
    provider: &'static str,
    color: String,
    ring: Vec<[f64; 3]>,
}

fn cmd_regions(viewer: &mut Viewer) -> Result<(), String> {
    if !viewer.state().display.show_regions {
        viewer.toggle_regions();
    }
    let out: Vec<RegionOut> = viewer
        .render_frame()
        .regions
        .into_iter()
        .map(|r| RegionOut {
            id: r.region_id,
            name: r.name,
            provider: r.provider.as_str(),
            color: r.color.to_hex(),
            ring: r.ring.iter().map(|v| [v.x, v.y, v.z]).collect(),
        })
        .collect();
    print_json(&out)
}

#[derive(Serialize)]
struct SampleOut {
    timestamp: String,
    latency_ms: f64,
    status: &'static str,
    color: &'static str,
}

#[derive(Serialize)]
struct TrendOut {
    server_id: String,
    range: &'static str,
    cutoff: String,
    samples: Vec<SampleOut>,
    mean_ms: Option<f64>,
    y_axis_max: Option<f64>,
}

fn cmd_trend(viewer: &mut Viewer, id: &str, range: &str, now: Option<&str>) -> Result<(), String> {
    let range = TimeRange::from_str(range)
        .ok_or_else(|| format!("unknown range: {range} (expected 1h, 6h, 24h or 7d)"))?;
    let now = match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("--now: {e}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    require_server(viewer, id)?;
    viewer.set_time_range(range);

    let Some(series) = viewer.selected_trend(now) else {
        return Err(format!("unknown server: {id}"));
    };
    let out = TrendOut {
        server_id: series.server_id.clone(),
        range: series.range.as_str(),
        cutoff: series.cutoff.to_rfc3339(),
        samples: series
            .samples
            .iter()
            .map(|s| SampleOut {
                timestamp: s.timestamp.to_rfc3339(),
                latency_ms: s.latency,
                status: s.status.as_str(),
                color: status_color(s.status),
            })
            .collect(),
        mean_ms: series.mean_latency(),
        y_axis_max: series.y_axis_max(),
    };
    print_json(&out)
}

#[derive(Serialize)]
struct ExportOut {
    format: String,
    file: String,
}

fn cmd_export(
    viewer: &mut Viewer,
    format: &str,
    select: Option<&str>,
    out_dir: PathBuf,
) -> Result<(), String> {
    if let Some(id) = select {
        require_server(viewer, id)?;
    }
    let mut sink = DirectorySink::new(out_dir);
    // No render surface in a terminal, so PNG reports the missing surface.
    let filename = viewer
        .export_named(format, Utc::now().date_naive(), None, &mut sink)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("unsupported export format: {format} (expected json, csv or png)"))?;
    let file = sink
        .written()
        .last()
        .map(|p| p.display().to_string())
        .unwrap_or(filename);
    print_json(&ExportOut {
        format: format.to_ascii_lowercase(),
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::{Args, ServerOut, apply_filters, parse_theme};
    use catalog::Dataset;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use viewer::{Theme, Viewer, ViewerConfig};

    fn fixture() -> Viewer {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/exchanges.json");
        Viewer::new(Dataset::load(path).expect("load dataset"), ViewerConfig::default())
    }

    fn filtered_ids(v: &Viewer) -> Vec<String> {
        v.filtered_servers().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn flags_select_exact_provider_and_status_sets() {
        let args = Args::try_parse_from([
            "latency-globe",
            "--provider",
            "AWS",
            "--status",
            "online",
            "--max-latency",
            "80",
            "filter",
        ])
        .expect("args");
        let mut v = fixture();
        apply_filters(&mut v, &args).expect("filters");

        let expected: Vec<String> = v
            .dataset()
            .servers
            .iter()
            .filter(|s| {
                s.provider == catalog::Provider::Aws
                    && s.status == catalog::ServerStatus::Online
                    && s.effective_latency() <= 80.0
            })
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(filtered_ids(&v), expected);
    }

    #[test]
    fn no_flags_keep_everything() {
        let args = Args::try_parse_from(["latency-globe", "summary"]).expect("args");
        let mut v = fixture();
        apply_filters(&mut v, &args).expect("filters");
        assert_eq!(v.showing_summary().to_string(), "Showing 9 of 9 servers");
    }

    #[test]
    fn bad_flag_values_are_errors() {
        let argv = ["latency-globe", "--provider", "oracle", "filter"];
        let args = Args::try_parse_from(argv).expect("args");
        let mut v = fixture();
        assert!(apply_filters(&mut v, &args).is_err());
        assert!(parse_theme("sepia").is_err());
        assert_eq!(parse_theme("Light"), Ok(Theme::Light));
    }

    #[test]
    fn subcommand_args_parse() {
        let args = Args::try_parse_from([
            "latency-globe",
            "export",
            "--format",
            "csv",
            "--select",
            "okx-hk",
        ])
        .expect("args");
        match args.command {
            super::Command::Export { format, select, out } => {
                assert_eq!(format, "csv");
                assert_eq!(select.as_deref(), Some("okx-hk"));
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn filter_rows_carry_latency_badge() {
        let v = fixture();
        let rows: Vec<(String, String)> = v
            .filtered_servers()
            .into_iter()
            .map(ServerOut::from)
            .filter(|row| {
                matches!(row.id, "binance-sg" | "bybit-tokyo" | "custom-mumbai" | "kraken-sf")
            })
            .map(|row| (row.id.to_string(), row.badge_color))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("binance-sg".to_string(), "#10b981".to_string()),
                ("bybit-tokyo".to_string(), "#f59e0b".to_string()),
                ("kraken-sf".to_string(), "#10b981".to_string()),
                ("custom-mumbai".to_string(), "#f97316".to_string()),
            ]
        );
    }
}
