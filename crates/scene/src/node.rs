use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::connector::Connector;

/// Dense index of a node inside its [`crate::NodeHierarchy`].
///
/// Indices follow depth-first construction order; the root is always `0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    #[serde(rename = "level-1")]
    Level1,
    #[serde(rename = "level-2")]
    Level2,
}

impl NodeKind {
    /// Kind a child of this node must have, if children are allowed.
    pub fn child_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Root => Some(NodeKind::Level1),
            NodeKind::Level1 => Some(NodeKind::Level2),
            NodeKind::Level2 => None,
        }
    }
}

/// Static description of one hierarchy entry and its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            name: None,
            subtitle: None,
            lat,
            lon,
            children: Vec::new(),
        }
    }

    pub fn root(id: impl Into<String>, label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Root, label, lat, lon)
    }

    pub fn level1(id: impl Into<String>, label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Level1, label, lat, lon)
    }

    pub fn level2(id: impl Into<String>, label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Level2, label, lat, lon)
    }

    pub fn with_identity(mut self, name: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }
}

/// Runtime node. Placement is fixed at construction; only the expansion and
/// visibility flags change afterwards, and only through the interaction
/// machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) kind: NodeKind,
    pub(crate) label: String,
    pub(crate) name: Option<String>,
    pub(crate) subtitle: Option<String>,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) local_position: Vec3,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) connector: Option<Connector>,
    pub(crate) expanded: bool,
    pub(crate) visible: bool,
    pub(crate) connector_visible: bool,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn lat_lon(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Position on the unrotated globe.
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Curve from the parent; `None` for the root.
    pub fn connector(&self) -> Option<&Connector> {
        self.connector.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_connector_visible(&self) -> bool {
        self.connector.is_some() && self.connector_visible
    }
}
