use camera::{PerspectiveCamera, Viewport};
use foundation::math::{Vec2, Vec3};
use scene::{GlobeTransform, NodeHierarchy, NodeIndex, NodeKind};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where hidden labels are parked, well outside any viewport.
pub const OFFSCREEN_PX: Vec2 = Vec2 {
    x: -10_000.0,
    y: -10_000.0,
};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSyncConfig {
    /// Labels whose node lies further than this angle from the camera
    /// direction (seen from the globe center) are treated as behind the
    /// globe.
    pub occlusion_threshold_rad: f64,
}

impl Default for LabelSyncConfig {
    fn default() -> Self {
        Self {
            occlusion_threshold_rad: std::f64::consts::PI / 2.1,
        }
    }
}

/// Maps world positions to screen pixels.
pub trait LabelProjector {
    fn project(&self, world: Vec3) -> Option<Vec2>;
}

#[derive(Debug, Copy, Clone)]
pub struct CameraProjector<'a> {
    camera: &'a PerspectiveCamera,
    viewport: Viewport,
}

impl<'a> CameraProjector<'a> {
    pub fn new(camera: &'a PerspectiveCamera, viewport: Viewport) -> Self {
        Self { camera, viewport }
    }
}

impl LabelProjector for CameraProjector<'_> {
    fn project(&self, world: Vec3) -> Option<Vec2> {
        let ndc = self.camera.project(world)?;
        Some(ndc_to_pixels(ndc, self.viewport))
    }
}

/// NDC to top-left-origin pixels.
pub fn ndc_to_pixels(ndc: Vec3, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.width,
        (-ndc.y * 0.5 + 0.5) * viewport.height,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub node: NodeIndex,
    pub kind: NodeKind,
    pub text: String,
    pub screen_px: Vec2,
    /// Either `0.0` or `1.0`.
    pub opacity: f32,
}

impl PlacedLabel {
    pub fn is_shown(&self) -> bool {
        self.opacity > 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelFrame {
    pub labels: Vec<PlacedLabel>,
}

impl LabelFrame {
    pub fn shown(&self) -> usize {
        self.labels.iter().filter(|l| l.is_shown()).count()
    }

    pub fn get(&self, node: NodeIndex) -> Option<&PlacedLabel> {
        self.labels.iter().find(|l| l.node == node)
    }
}

/// Places every node's label for this frame, in hierarchy order.
pub fn sync_labels(
    hierarchy: &NodeHierarchy,
    camera: &PerspectiveCamera,
    globe: &GlobeTransform,
    viewport: Viewport,
    config: &LabelSyncConfig,
) -> LabelFrame {
    let projector = CameraProjector::new(camera, viewport);
    sync_labels_with(hierarchy, globe, camera.position, &projector, config)
}

pub fn sync_labels_with<P: LabelProjector>(
    hierarchy: &NodeHierarchy,
    globe: &GlobeTransform,
    camera_position: Vec3,
    projector: &P,
    config: &LabelSyncConfig,
) -> LabelFrame {
    let mut labels = Vec::with_capacity(hierarchy.len());

    for (index, node) in hierarchy.iter() {
        let placed = if node.is_visible() {
            let world = globe.local_to_world(node.local_position());
            place(world, camera_position, projector, config)
        } else {
            None
        };
        if placed.is_none() && node.is_visible() {
            trace!(node = node.id(), "label hidden");
        }

        labels.push(PlacedLabel {
            node: index,
            kind: node.kind(),
            text: node.label().to_string(),
            screen_px: placed.unwrap_or(OFFSCREEN_PX),
            opacity: if placed.is_some() { 1.0 } else { 0.0 },
        });
    }

    LabelFrame { labels }
}

fn place<P: LabelProjector>(
    world: Vec3,
    camera_position: Vec3,
    projector: &P,
    config: &LabelSyncConfig,
) -> Option<Vec2> {
    let angle = world.angle_to(camera_position);
    // NaN compares false, so a broken angle never counts as in front.
    if !(angle <= config.occlusion_threshold_rad) {
        return None;
    }
    projector.project(world).filter(|p| p.is_finite())
}
