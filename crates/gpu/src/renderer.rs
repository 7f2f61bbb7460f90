use camera::{PerspectiveCamera, Viewport};
use foundation::math::{Mat4, Quat, Vec3};
use layers::{LabelFrame, PlacedLabel};
use particles::{NoteField, SparkPool};
use runtime::FrameError;
use scene::{Connector, GlobeTransform, NodeHierarchy, NodeIndex, NodeKind};
use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    pub view_proj: Mat4,
}

/// One hierarchy node as the backend draws it.
///
/// `world` already includes the globe rotation. Connector points stay in
/// globe-local space and are drawn under [`RenderFrame::globe_rotation`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeDraw<'a> {
    pub node: NodeIndex,
    pub kind: NodeKind,
    pub world: Vec3,
    pub visible: bool,
    pub expanded: bool,
    pub connector: Option<&'a Connector>,
    pub connector_visible: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SparkBuffers<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
}

impl SparkBuffers<'_> {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Note sprites in group-local space, drawn under `group_rotation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteBuffers<'a> {
    pub positions: &'a [f32],
    pub scales: &'a [f32],
    pub group_yaw: f64,
    pub group_rotation: Quat,
}

impl NoteBuffers<'_> {
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

/// Particle systems drawn around the globe.
#[derive(Debug, Copy, Clone)]
pub struct Atmosphere<'a> {
    pub sparks: &'a SparkPool,
    pub notes: &'a NoteField,
}

/// Everything a backend needs to draw one frame. Borrowed from the
/// simulation state; nothing is copied except per-node world positions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    pub frame_index: u64,
    pub camera: CameraSnapshot,
    pub viewport: Viewport,
    pub globe_yaw: f64,
    pub globe_rotation: Quat,
    /// The backdrop sphere turns with the globe and holds still with it.
    pub backdrop_yaw: f64,
    pub nodes: Vec<NodeDraw<'a>>,
    pub sparks: SparkBuffers<'a>,
    pub notes: NoteBuffers<'a>,
    pub labels: &'a [PlacedLabel],
}

impl RenderFrame<'_> {
    pub fn visible_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.visible).count()
    }

    pub fn visible_connectors(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.connector.is_some() && n.connector_visible)
            .count()
    }
}

/// Drawing surface the frame loop hands its snapshot to.
pub trait RenderBackend {
    fn resize(&mut self, viewport: Viewport);

    fn submit(&mut self, frame: &RenderFrame<'_>) -> Result<(), FrameError>;
}

pub struct Renderer;

impl Renderer {
    /// Builds the render snapshot for the current frame.
    ///
    /// Fails when the camera has gone non-finite, so the backend never sees
    /// a broken view matrix.
    pub fn collect<'a>(
        frame_index: u64,
        camera: &PerspectiveCamera,
        viewport: Viewport,
        globe: &GlobeTransform,
        hierarchy: &'a NodeHierarchy,
        atmosphere: Atmosphere<'a>,
        labels: &'a LabelFrame,
    ) -> Result<RenderFrame<'a>, FrameError> {
        if !camera.position.is_finite() {
            return Err(FrameError::NonFinite {
                what: "camera position",
            });
        }
        let view_proj = camera.view_proj();
        if view_proj.iter().flatten().any(|v| !v.is_finite()) {
            return Err(FrameError::NonFinite {
                what: "view-projection matrix",
            });
        }

        let nodes = hierarchy
            .iter()
            .map(|(index, node)| NodeDraw {
                node: index,
                kind: node.kind(),
                world: globe.local_to_world(node.local_position()),
                visible: node.is_visible(),
                expanded: node.is_expanded(),
                connector: node.connector(),
                connector_visible: node.is_connector_visible(),
            })
            .collect();

        Ok(RenderFrame {
            frame_index,
            camera: CameraSnapshot {
                position: camera.position,
                target: camera.target,
                view_proj,
            },
            viewport,
            globe_yaw: globe.yaw(),
            globe_rotation: globe.rotation(),
            backdrop_yaw: globe.yaw(),
            nodes,
            sparks: SparkBuffers {
                positions: atmosphere.sparks.positions(),
                colors: atmosphere.sparks.colors(),
                sizes: atmosphere.sparks.sizes(),
            },
            notes: NoteBuffers {
                positions: atmosphere.notes.positions(),
                scales: atmosphere.notes.scales(),
                group_yaw: atmosphere.notes.yaw(),
                group_rotation: atmosphere.notes.rotation(),
            },
            labels: &labels.labels,
        })
    }
}

/// Summary a [`RecordingBackend`] keeps per submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub frame_index: u64,
    pub camera_position: Vec3,
    pub globe_yaw: f64,
    pub note_yaw: f64,
    pub visible_nodes: usize,
    pub visible_connectors: usize,
    pub sparks: usize,
    pub notes: usize,
    pub labels_shown: usize,
}

/// Headless backend: records a summary of each frame instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    viewport: Option<Viewport>,
    frames: Vec<RecordedFrame>,
    keep_last: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `n` recent frames.
    pub fn keep_last(n: usize) -> Self {
        Self {
            keep_last: Some(n.max(1)),
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn submit(&mut self, frame: &RenderFrame<'_>) -> Result<(), FrameError> {
        let record = RecordedFrame {
            frame_index: frame.frame_index,
            camera_position: frame.camera.position,
            globe_yaw: frame.globe_yaw,
            note_yaw: frame.notes.group_yaw,
            visible_nodes: frame.visible_nodes(),
            visible_connectors: frame.visible_connectors(),
            sparks: frame.sparks.len(),
            notes: frame.notes.len(),
            labels_shown: frame.labels.iter().filter(|l| l.is_shown()).count(),
        };
        trace!(?record, "frame recorded");

        self.frames.push(record);
        if let Some(limit) = self.keep_last
            && self.frames.len() > limit
        {
            let excess = self.frames.len() - limit;
            self.frames.drain(..excess);
        }
        Ok(())
    }
}
