use std::collections::HashMap;

use foundation::math::spherical::to_cartesian;
use tracing::debug;

use crate::connector::Connector;
use crate::error::SceneError;
use crate::node::{Node, NodeIndex, NodeKind, NodeSpec};

pub const DEFAULT_GLOBE_RADIUS: f64 = 15.0;

/// Flat, index-addressed node tree built once from a [`NodeSpec`].
///
/// Ordering contract:
/// - Nodes are stored depth-first in description order, root first.
/// - Children keep their description order.
#[derive(Debug, Clone)]
pub struct NodeHierarchy {
    radius: f64,
    nodes: Vec<Node>,
    by_id: HashMap<String, NodeIndex>,
}

impl NodeHierarchy {
    pub fn build(spec: &NodeSpec, radius: f64) -> Result<Self, SceneError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }
        if spec.kind != NodeKind::Root {
            return Err(SceneError::InvalidHierarchy {
                id: spec.id.clone(),
                reason: "top-level node must be the root",
            });
        }

        let mut hierarchy = Self {
            radius,
            nodes: Vec::new(),
            by_id: HashMap::new(),
        };
        hierarchy.insert(spec, None)?;

        debug!(nodes = hierarchy.nodes.len(), radius, "built node hierarchy");
        Ok(hierarchy)
    }

    fn insert(
        &mut self,
        spec: &NodeSpec,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, SceneError> {
        if !(spec.lat.is_finite() && spec.lon.is_finite()) {
            return Err(SceneError::InvalidHierarchy {
                id: spec.id.clone(),
                reason: "coordinates must be finite",
            });
        }
        if self.by_id.contains_key(&spec.id) {
            return Err(SceneError::DuplicateNodeId(spec.id.clone()));
        }

        let index = NodeIndex(self.nodes.len() as u32);
        let local_position = to_cartesian(spec.lat, spec.lon, self.radius);
        let connector = parent.map(|p| {
            let from = self.nodes[p.index()].local_position;
            Connector::between(from, local_position, self.radius)
        });
        // Level-1 arcs hang off the always-visible root.
        let shown = matches!(spec.kind, NodeKind::Root | NodeKind::Level1);

        self.nodes.push(Node {
            id: spec.id.clone(),
            kind: spec.kind,
            label: spec.label.clone(),
            name: spec.name.clone(),
            subtitle: spec.subtitle.clone(),
            lat: spec.lat,
            lon: spec.lon,
            local_position,
            parent,
            children: Vec::with_capacity(spec.children.len()),
            connector,
            expanded: false,
            visible: shown,
            connector_visible: shown,
        });
        self.by_id.insert(spec.id.clone(), index);

        for child in &spec.children {
            if spec.kind.child_kind() != Some(child.kind) {
                return Err(SceneError::InvalidHierarchy {
                    id: child.id.clone(),
                    reason: match spec.kind {
                        NodeKind::Root => "children of the root must be level-1",
                        NodeKind::Level1 => "children of a level-1 node must be level-2",
                        NodeKind::Level2 => "level-2 nodes cannot have children",
                    },
                });
            }
            let child_index = self.insert(child, Some(index))?;
            self.nodes[index.index()].children.push(child_index);
        }

        Ok(index)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|i| &self.nodes[i.index()])
    }

    pub fn index_of(&self, id: &str) -> Result<NodeIndex, SceneError> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| SceneError::InvalidNodeId(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex(i as u32), n))
    }

    pub fn level1(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.iter().filter(|(_, n)| n.kind == NodeKind::Level1)
    }

    /// The expanded level-1 node, if any. At most one exists at a time.
    pub fn expanded_level1(&self) -> Option<NodeIndex> {
        self.level1().find(|(_, n)| n.expanded).map(|(i, _)| i)
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> NodeSpec {
        NodeSpec::root("root", "Root", 60.0, 0.0).with_children(vec![
            NodeSpec::level1("a", "A", 20.0, -60.0),
            NodeSpec::level1("b", "B", 0.0, 0.0).with_children(vec![
                NodeSpec::level2("b1", "B1", -10.0, -25.0),
                NodeSpec::level2("b2", "B2", -20.0, 0.0),
            ]),
        ])
    }

    #[test]
    fn builds_depth_first() {
        let h = NodeHierarchy::build(&sample(), DEFAULT_GLOBE_RADIUS).expect("valid");
        let ids: Vec<&str> = h.iter().map(|(_, n)| n.id()).collect();
        assert_eq!(ids, vec!["root", "a", "b", "b1", "b2"]);

        let b = h.get("b").expect("b");
        let children: Vec<&str> = b
            .children()
            .iter()
            .filter_map(|&c| h.node(c))
            .map(|n| n.id())
            .collect();
        assert_eq!(children, vec!["b1", "b2"]);
        assert_eq!(h.get("b1").and_then(|n| n.parent()), h.index_of("b").ok());
    }

    #[test]
    fn initial_visibility() {
        let h = NodeHierarchy::build(&sample(), DEFAULT_GLOBE_RADIUS).expect("valid");
        assert!(h.root().is_visible());
        assert!(!h.root().is_connector_visible());
        assert!(h.root().connector().is_none());

        let a = h.get("a").expect("a");
        assert!(a.is_visible() && a.is_connector_visible());
        let b1 = h.get("b1").expect("b1");
        assert!(!b1.is_visible() && !b1.is_connector_visible());
        assert!(h.expanded_level1().is_none());
    }

    #[test]
    fn positions_sit_on_the_sphere() {
        let h = NodeHierarchy::build(&sample(), DEFAULT_GLOBE_RADIUS).expect("valid");
        for (_, n) in h.iter() {
            assert!((n.local_position().length() - DEFAULT_GLOBE_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let spec = NodeSpec::root("root", "Root", 0.0, 0.0).with_children(vec![
            NodeSpec::level1("x", "X", 0.0, 0.0),
            NodeSpec::level1("x", "X again", 10.0, 0.0),
        ]);
        let err = NodeHierarchy::build(&spec, 15.0).unwrap_err();
        assert_eq!(err, SceneError::DuplicateNodeId("x".to_string()));
    }

    #[test]
    fn rejects_wrong_nesting() {
        let spec = NodeSpec::root("root", "Root", 0.0, 0.0)
            .with_children(vec![NodeSpec::level2("leaf", "Leaf", 0.0, 0.0)]);
        assert!(matches!(
            NodeHierarchy::build(&spec, 15.0),
            Err(SceneError::InvalidHierarchy { ref id, .. }) if id == "leaf"
        ));

        let spec = NodeSpec::level1("top", "Top", 0.0, 0.0);
        assert!(matches!(
            NodeHierarchy::build(&spec, 15.0),
            Err(SceneError::InvalidHierarchy { .. })
        ));

        let spec = NodeSpec::root("root", "Root", 0.0, 0.0).with_children(vec![
            NodeSpec::level1("a", "A", 0.0, 0.0).with_children(vec![
                NodeSpec::level2("a1", "A1", 0.0, 0.0)
                    .with_children(vec![NodeSpec::level2("a11", "A11", 0.0, 0.0)]),
            ]),
        ]);
        assert!(matches!(
            NodeHierarchy::build(&spec, 15.0),
            Err(SceneError::InvalidHierarchy { ref id, .. }) if id == "a11"
        ));
    }

    #[test]
    fn rejects_bad_radius_and_coordinates() {
        assert_eq!(
            NodeHierarchy::build(&sample(), 0.0).unwrap_err(),
            SceneError::InvalidRadius(0.0)
        );
        let spec = NodeSpec::root("root", "Root", f64::NAN, 0.0);
        assert!(matches!(
            NodeHierarchy::build(&spec, 15.0),
            Err(SceneError::InvalidHierarchy { .. })
        ));
    }

    #[test]
    fn unknown_id_is_invalid_node_id() {
        let h = NodeHierarchy::build(&sample(), DEFAULT_GLOBE_RADIUS).expect("valid");
        assert_eq!(
            h.index_of("nope").unwrap_err(),
            SceneError::InvalidNodeId("nope".to_string())
        );
    }
}
