use base64::Engine as _;
use catalog::ExchangeServer;
use chrono::NaiveDate;
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Png];

    /// Unknown names are logged and yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "png" => Some(ExportFormat::Png),
            other => {
                warn!(format = other, "unsupported export format");
                None
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Png => "png",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Png => "image/png",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    Serialize(String),
    Surface(String),
    Encode(String),
    Io(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Serialize(msg) => write!(f, "export serialization failed: {msg}"),
            ExportError::Surface(msg) => write!(f, "render surface unavailable: {msg}"),
            ExportError::Encode(msg) => write!(f, "image encoding failed: {msg}"),
            ExportError::Io(msg) => write!(f, "export write failed: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// A finished export, ready to be written or handed out as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// UTF-8 body for text formats.
    pub fn text(&self) -> Option<&str> {
        match self.format {
            ExportFormat::Json | ExportFormat::Csv => std::str::from_utf8(&self.bytes).ok(),
            ExportFormat::Png => None,
        }
    }

    pub fn data_uri(&self) -> String {
        match self.text() {
            Some(text) => format!(
                "data:{};charset=utf-8,{}",
                self.mime(),
                urlencoding::encode(text)
            ),
            None => format!(
                "data:{};base64,{}",
                self.mime(),
                base64::engine::general_purpose::STANDARD.encode(&self.bytes)
            ),
        }
    }
}

/// `server-<id>-<date>.<ext>` when scoped to one server, else
/// `servers-<date>.<ext>`.
pub fn export_filename(selected_id: Option<&str>, date: NaiveDate, format: ExportFormat) -> String {
    let day = date.format("%Y-%m-%d");
    match selected_id {
        Some(id) => format!("server-{id}-{day}.{}", format.extension()),
        None => format!("servers-{day}.{}", format.extension()),
    }
}

/// With a selection, the matching record or `null`; otherwise the whole list.
pub fn to_json(
    servers: &[&ExchangeServer],
    selected_id: Option<&str>,
) -> Result<String, ExportError> {
    let out = match selected_id {
        Some(id) => {
            let record = servers.iter().find(|s| s.id == id);
            serde_json::to_string_pretty(&record)
        }
        None => serde_json::to_string_pretty(servers),
    };
    out.map_err(|e| ExportError::Serialize(e.to_string()))
}

pub const CSV_HEADER: [&str; 11] = [
    "id",
    "name",
    "provider",
    "region",
    "country",
    "city",
    "lat",
    "lon",
    "status",
    "currentLatency",
    "lastUpdated",
];

const MISSING: &str = "undefined";

fn coordinate(v: f64) -> Option<String> {
    v.is_finite().then(|| v.to_string())
}

fn csv_cell(value: Option<String>) -> String {
    let raw = value.unwrap_or_else(|| MISSING.to_string());
    format!("\"{}\"", raw.replace('"', "\\\""))
}

fn csv_row(server: &ExchangeServer) -> String {
    let values = [
        Some(server.id.clone()),
        Some(server.name.clone()),
        Some(server.provider.as_str().to_string()),
        Some(server.region.clone()),
        server.country.clone(),
        server.city.clone(),
        coordinate(server.lat),
        coordinate(server.lon),
        Some(server.status.as_str().to_string()),
        server.current_latency.map(|v| v.to_string()),
        server.last_updated.clone(),
    ];
    values.into_iter().map(csv_cell).collect::<Vec<_>>().join(",")
}

/// Header plus one quoted row per server (only the selected one when set).
///
/// Cells are always quoted and quotes are backslash-escaped; absent values
/// are written as `undefined`. Lines are joined by `\n` without a trailing
/// newline.
pub fn to_csv(servers: &[&ExchangeServer], selected_id: Option<&str>) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];
    lines.extend(
        servers
            .iter()
            .filter(|s| selected_id.is_none_or(|id| s.id == id))
            .map(|s| csv_row(s)),
    );
    lines.join("\n")
}

pub fn export_json(
    servers: &[&ExchangeServer],
    selected_id: Option<&str>,
    date: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    let body = to_json(servers, selected_id)?;
    let filename = export_filename(selected_id, date, ExportFormat::Json);
    debug!(%filename, bytes = body.len(), "json export ready");
    Ok(ExportArtifact {
        format: ExportFormat::Json,
        filename,
        bytes: body.into_bytes(),
    })
}

pub fn export_csv(
    servers: &[&ExchangeServer],
    selected_id: Option<&str>,
    date: NaiveDate,
) -> ExportArtifact {
    let body = to_csv(servers, selected_id);
    let filename = export_filename(selected_id, date, ExportFormat::Csv);
    debug!(%filename, bytes = body.len(), "csv export ready");
    ExportArtifact {
        format: ExportFormat::Csv,
        filename,
        bytes: body.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CSV_HEADER, ExportFormat, export_csv, export_filename, export_json, to_csv, to_json,
    };
    use catalog::{Dataset, ExchangeServer};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixture() -> Dataset {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/exchanges.json");
        Dataset::load(path).expect("load dataset")
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("date")
    }

    fn refs(dataset: &Dataset) -> Vec<&ExchangeServer> {
        dataset.servers.iter().collect()
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("png"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn filenames() {
        assert_eq!(
            export_filename(Some("binance-sg"), day(), ExportFormat::Json),
            "server-binance-sg-2025-01-15.json"
        );
        assert_eq!(export_filename(None, day(), ExportFormat::Csv), "servers-2025-01-15.csv");
    }

    #[test]
    fn csv_has_header_plus_one_line_per_server() {
        let dataset = fixture();
        let servers = refs(&dataset);
        let csv = to_csv(&servers, None);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), servers.len() + 1);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[0],
            "id,name,provider,region,country,city,lat,lon,status,currentLatency,lastUpdated"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_quotes_every_cell_and_marks_missing_values() {
        let dataset = fixture();
        let servers = refs(&dataset);

        let csv = to_csv(&servers, Some("okx-fra"));
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"okx-fra\","));
        assert!(lines[1].contains("\"Azure\""));
        assert!(lines[1].ends_with("\"online\",\"undefined\",\"undefined\""));

        let relay = to_csv(&servers, Some("bitmex-relay"));
        let row = relay.split('\n').nth(1).expect("row");
        let tail = "\"undefined\",\"undefined\",\"undefined\",\"undefined\",\"online\",\"58\"";
        assert!(row.contains(tail));
    }

    #[test]
    fn csv_numbers_print_without_trailing_zero() {
        let dataset = fixture();
        let servers = refs(&dataset);
        let csv = to_csv(&servers, Some("binance-sg"));
        let row = csv.split('\n').nth(1).expect("row");
        assert!(row.contains("\"1.3521\",\"103.8198\",\"online\",\"38\",\"2025-01-15T10:00:00Z\""));
    }

    #[test]
    fn csv_escapes_quotes_with_backslash() {
        let dataset = fixture();
        let mut server = dataset.servers[0].clone();
        server.name = "Binance \"SG\"".to_string();
        let csv = to_csv(&[&server], None);
        assert!(csv.contains("\"Binance \\\"SG\\\"\""));
    }

    #[test]
    fn csv_with_unknown_selection_is_header_only() {
        let dataset = fixture();
        let servers = refs(&dataset);
        assert_eq!(to_csv(&servers, Some("ghost-node")), CSV_HEADER.join(","));
    }

    #[test]
    fn json_unknown_selection_is_null() {
        let dataset = fixture();
        let servers = refs(&dataset);
        assert_eq!(to_json(&servers, Some("ghost-node")).expect("json"), "null");
    }

    #[test]
    fn json_selection_and_full_list() {
        let dataset = fixture();
        let servers = refs(&dataset);

        let one: serde_json::Value =
            serde_json::from_str(&to_json(&servers, Some("okx-hk")).expect("json")).expect("parse");
        assert_eq!(one["id"], "okx-hk");
        assert_eq!(one["provider"], "Azure");

        let all = to_json(&servers, None).expect("json");
        assert!(all.starts_with("[\n  {"));
        let parsed: serde_json::Value = serde_json::from_str(&all).expect("parse");
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(9));
    }

    #[test]
    fn artifacts_and_data_uris() {
        let dataset = fixture();
        let servers = refs(&dataset);

        let json = export_json(&servers, Some("okx-hk"), day()).expect("json");
        assert_eq!(json.filename, "server-okx-hk-2025-01-15.json");
        assert_eq!(json.mime(), "application/json");
        let uri = json.data_uri();
        assert!(uri.starts_with("data:application/json;charset=utf-8,%7B"));
        assert!(!uri.contains(' '));

        let csv = export_csv(&servers, None, day());
        assert_eq!(csv.filename, "servers-2025-01-15.csv");
        assert!(csv.data_uri().starts_with("data:text/csv;charset=utf-8,id%2Cname"));
        assert_eq!(csv.text().map(|t| t.lines().count()), Some(10));
    }
}
