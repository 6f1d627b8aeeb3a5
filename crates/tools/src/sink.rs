use std::fs;
use std::path::{Path, PathBuf};

use formats::{ExportArtifact, ExportError};
use tracing::debug;
use viewer::ExportSink;

/// Writes each artifact into `dir` under its own filename, replacing any
/// earlier file of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DirectorySink {
    fn emit(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ExportError::Io(format!("create {:?}: {e}", self.dir)))?;
        let path = self.dir.join(safe_name(&artifact.filename)?);
        fs::write(&path, &artifact.bytes)
            .map_err(|e| ExportError::Io(format!("write {path:?}: {e}")))?;
        debug!(path = %path.display(), bytes = artifact.bytes.len(), "artifact written");
        self.written.push(path);
        Ok(())
    }
}

// Server ids end up in filenames; keep the artifact inside the directory.
fn safe_name(filename: &str) -> Result<&Path, ExportError> {
    let path = Path::new(filename);
    match path.file_name() {
        Some(name) if name == path.as_os_str() => Ok(path),
        _ => Err(ExportError::Io(format!("refusing to write outside export dir: {filename}"))),
    }
}
