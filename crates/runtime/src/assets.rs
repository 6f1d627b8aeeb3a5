use std::collections::BTreeMap;

use tracing::{info, warn};

/// Deferred resources whose readiness gates parts of the render step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    GlobeTextureLight,
    GlobeTextureDark,
    Exporter,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::GlobeTextureLight => "globe_texture_light",
            AssetKind::GlobeTextureDark => "globe_texture_dark",
            AssetKind::Exporter => "exporter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotRequested(AssetKind),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::NotRequested(kind) => {
                write!(f, "asset {} was never requested", kind.as_str())
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Fire-and-forget load tracking.
///
/// Each asset is requested at most once. Completion flips a flag that the
/// render step polls; abandoned loads simply stay `Pending`.
#[derive(Debug, Default, Clone)]
pub struct AssetTracker {
    entries: BTreeMap<AssetKind, Readiness>,
}

impl AssetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `kind` as pending. Returns `false` if it was already requested.
    pub fn request(&mut self, kind: AssetKind) -> bool {
        if self.entries.contains_key(&kind) {
            return false;
        }
        self.entries.insert(kind, Readiness::Pending);
        true
    }

    pub fn complete(&mut self, kind: AssetKind) -> Result<(), AssetError> {
        let entry = self
            .entries
            .get_mut(&kind)
            .ok_or(AssetError::NotRequested(kind))?;
        *entry = Readiness::Ready;
        info!(asset = kind.as_str(), "asset ready");
        Ok(())
    }

    pub fn fail(&mut self, kind: AssetKind, reason: impl Into<String>) -> Result<(), AssetError> {
        let entry = self
            .entries
            .get_mut(&kind)
            .ok_or(AssetError::NotRequested(kind))?;
        let reason = reason.into();
        warn!(asset = kind.as_str(), "asset failed: {reason}");
        *entry = Readiness::Failed(reason);
        Ok(())
    }

    pub fn state(&self, kind: AssetKind) -> Option<&Readiness> {
        self.entries.get(&kind)
    }

    pub fn is_ready(&self, kind: AssetKind) -> bool {
        matches!(self.entries.get(&kind), Some(Readiness::Ready))
    }
}
