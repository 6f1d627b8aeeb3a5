use std::path::PathBuf;

use crate::dataset::{CatalogError, Dataset};

/// Where a dataset comes from. The viewer only ever sees a loaded
/// [`Dataset`], so a live feed can replace the static file later.
pub trait DatasetSource {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Dataset, CatalogError>;
}

/// JSON document on disk: `{ "servers": [...], "regions": [...] }`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> Result<Dataset, CatalogError> {
        Dataset::load(&self.path)
    }
}

/// Dataset already held in memory (embedded sample data, tests).
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for StaticSource {
    fn describe(&self) -> String {
        format!(
            "static:{} servers/{} regions",
            self.dataset.servers.len(),
            self.dataset.regions.len()
        )
    }

    fn load(&self) -> Result<Dataset, CatalogError> {
        Ok(self.dataset.clone())
    }
}
