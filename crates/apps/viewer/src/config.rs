use std::fs;
use std::path::Path;

use anyhow::Context;
use camera::{CameraConfig, Viewport};
use layers::LabelSyncConfig;
use particles::{NoteConfig, SparkConfig};
use scene::InteractionConfig;
use scene::globe::DEFAULT_SPIN_PER_FRAME;
use scene::hierarchy::DEFAULT_GLOBE_RADIUS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub radius: f64,
    /// Yaw added per reference frame while the globe is idle.
    pub spin_per_frame: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_GLOBE_RADIUS,
            spin_per_frame: DEFAULT_SPIN_PER_FRAME,
        }
    }
}

/// Top-level viewer configuration file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport: Viewport,
    pub globe: GlobeConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
    pub sparks: SparkConfig,
    pub notes: NoteConfig,
    pub labels: LabelSyncConfig,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let payload = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&payload)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
