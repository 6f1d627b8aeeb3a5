use chrono::NaiveDate;
use formats::{
    ExportArtifact, ExportError, ExportFormat, RenderSurface, export_csv, export_json, export_png,
};
use runtime::{AssetKind, EventKind};
use tracing::info;

use crate::orchestrator::Viewer;

/// Destination for finished exports (download, file, clipboard).
pub trait ExportSink {
    fn emit(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError>;
}

/// Keeps artifacts in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub artifacts: Vec<ExportArtifact>,
}

impl ExportSink for MemorySink {
    fn emit(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

impl Viewer {
    /// Builds and emits one export of the full server list, scoped to the
    /// selected server when it exists in the dataset.
    ///
    /// PNG captures `surface`; JSON and CSV ignore it. Nothing reaches the
    /// sink on error. Returns the emitted filename.
    pub fn export(
        &mut self,
        format: ExportFormat,
        date: NaiveDate,
        surface: Option<&dyn RenderSurface>,
        sink: &mut dyn ExportSink,
    ) -> Result<String, ExportError> {
        if self.assets.request(AssetKind::Exporter) {
            // Loading is synchronous here; the flag still gates the first use.
            if self.assets.complete(AssetKind::Exporter).is_ok() {
                self.emit(EventKind::AssetReady, AssetKind::Exporter.as_str());
            }
        }

        let artifact = {
            let servers: Vec<_> = self.dataset().servers.iter().collect();
            let scope = self.selected_server().map(|s| s.id.as_str());
            match format {
                ExportFormat::Json => export_json(&servers, scope, date)?,
                ExportFormat::Csv => export_csv(&servers, scope, date),
                ExportFormat::Png => export_png(surface, date)?,
            }
        };

        sink.emit(&artifact)?;
        info!(filename = %artifact.filename, bytes = artifact.bytes.len(), "export emitted");
        self.emit(EventKind::Exported, artifact.filename.clone());
        Ok(artifact.filename)
    }

    /// Like [`Viewer::export`] with a format name. Unknown formats produce
    /// no output and `Ok(None)`.
    pub fn export_named(
        &mut self,
        format: &str,
        date: NaiveDate,
        surface: Option<&dyn RenderSurface>,
        sink: &mut dyn ExportSink,
    ) -> Result<Option<String>, ExportError> {
        match ExportFormat::parse(format) {
            Some(format) => self.export(format, date, surface, sink).map(Some),
            None => Ok(None),
        }
    }
}
