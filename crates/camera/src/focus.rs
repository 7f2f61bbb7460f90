use foundation::math::Vec3;
use scene::{FocusKind, FocusRequest, GlobeTransform, NodeHierarchy, NodeIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::easing::Easing;
use crate::perspective::PerspectiveCamera;
use crate::tween::{CameraTween, CompletionHook, TweenKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub entrance_start: [f64; 3],
    pub entrance_target: [f64; 3],
    pub entrance_duration_s: f64,
    pub entrance_easing: Easing,
    pub focus_easing: Easing,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            entrance_start: [0.0, 200.0, 800.0],
            entrance_target: [0.0, 20.0, 50.0],
            entrance_duration_s: 2.5,
            entrance_easing: Easing::QuinticOut,
            focus_easing: Easing::CubicOut,
        }
    }
}

impl FocusConfig {
    pub fn entrance_start(&self) -> Vec3 {
        let [x, y, z] = self.entrance_start;
        Vec3::new(x, y, z)
    }

    pub fn entrance_target(&self) -> Vec3 {
        let [x, y, z] = self.entrance_target;
        Vec3::new(x, y, z)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FocusError {
    #[error("focus target {0:?} is not part of the hierarchy")]
    UnknownNode(NodeIndex),
}

/// Camera position that puts `node` in front of the viewer while keeping the
/// current viewing distance. Uses the globe rotation as of this call.
pub fn focus_target(
    camera: &PerspectiveCamera,
    hierarchy: &NodeHierarchy,
    globe: &GlobeTransform,
    node: NodeIndex,
) -> Result<Vec3, FocusError> {
    let node = hierarchy.node(node).ok_or(FocusError::UnknownNode(node))?;
    let world = globe.local_to_world(node.local_position());
    let distance = camera.position.length();
    Ok(world.normalize_or_zero() * distance)
}

/// Owns the single in-flight camera tween.
///
/// A new request replaces the active tween wholesale. A completion hook on
/// the replaced tween is carried over to the replacement so it still fires.
#[derive(Debug, Clone, Default)]
pub struct FocusOrchestrator {
    config: FocusConfig,
    active: Option<CameraTween>,
}

impl FocusOrchestrator {
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&CameraTween> {
        self.active.as_ref()
    }

    pub fn focus_on(
        &mut self,
        camera: &PerspectiveCamera,
        hierarchy: &NodeHierarchy,
        globe: &GlobeTransform,
        request: &FocusRequest,
    ) -> Result<Vec3, FocusError> {
        let target = focus_target(camera, hierarchy, globe, request.node)?;
        let kind = match request.kind {
            FocusKind::Node => TweenKind::NodeFocus,
            FocusKind::Overlay => TweenKind::OverlayFocus,
        };
        self.fly_to(camera, target, request.duration_s, self.config.focus_easing, kind);
        Ok(target)
    }

    /// Starts the fly-in from wherever the camera is now.
    pub fn begin_entrance(&mut self, camera: &PerspectiveCamera) {
        let target = self.config.entrance_target();
        let duration = self.config.entrance_duration_s;
        let easing = self.config.entrance_easing;
        self.fly_to(camera, target, duration, easing, TweenKind::Entrance);
        if let Some(tween) = self.active.take() {
            self.active = Some(tween.with_hook(CompletionHook::EnterScene));
        }
    }

    pub fn fly_to(
        &mut self,
        camera: &PerspectiveCamera,
        target: Vec3,
        duration_s: f64,
        easing: Easing,
        kind: TweenKind,
    ) {
        let mut tween = CameraTween::new(camera.position, target, duration_s, easing, kind);
        if let Some(previous) = self.active.take() {
            debug!(replaced = ?previous.kind(), with = ?kind, "camera tween preempted");
            if let Some(hook) = previous.hook() {
                tween = tween.with_hook(hook);
            }
        }
        self.active = Some(tween);
    }

    /// Moves the camera along the active tween. Returns the completion hook
    /// when the tween finishes this frame.
    pub fn advance(
        &mut self,
        camera: &mut PerspectiveCamera,
        dt_s: f64,
    ) -> Option<CompletionHook> {
        let tween = self.active.as_mut()?;
        let step = tween.advance(dt_s);
        if step.position.is_finite() {
            camera.position = step.position;
        }
        if !step.finished {
            return None;
        }
        let hook = tween.hook();
        debug!(kind = ?tween.kind(), "camera tween finished");
        self.active = None;
        hook
    }
}
