use std::fs;
use std::path::{Path, PathBuf};

use scene::{NodeHierarchy, NodeKind, NodeSpec, SceneError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse hierarchy document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Hierarchy(#[from] SceneError),
}

/// One entry of the hierarchy document, as authored.
///
/// The root usually carries `name` and `unit` (its subtitle) instead of a
/// `label`; the displayed label falls back to `name`, then to `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "unit", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }

    pub fn to_spec(&self) -> NodeSpec {
        NodeSpec {
            id: self.id.clone(),
            kind: self.kind,
            label: self.display_label().to_string(),
            name: self.name.clone(),
            subtitle: self.subtitle.clone(),
            lat: self.lat,
            lon: self.lon,
            children: self.children.iter().map(NodeDocument::to_spec).collect(),
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(NodeDocument::count).sum::<usize>()
    }
}

/// Hierarchy description file: the root node object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyDocument {
    pub root: NodeDocument,
}

impl HierarchyDocument {
    pub fn from_json_str(payload: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_json_str(&payload)?;
        debug!(path = %path.display(), nodes = document.node_count(), "loaded hierarchy document");
        Ok(document)
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    pub fn to_spec(&self) -> NodeSpec {
        self.root.to_spec()
    }

    /// Validates the document and places every node on a globe of `radius`.
    pub fn build(&self, radius: f64) -> Result<NodeHierarchy, DocumentError> {
        Ok(NodeHierarchy::build(&self.to_spec(), radius)?)
    }
}
