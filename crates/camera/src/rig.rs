use scene::{FocusRequest, GlobeTransform, NodeHierarchy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::focus::{FocusConfig, FocusError, FocusOrchestrator};
use crate::orbit::{OrbitConfig, OrbitControls};
use crate::perspective::{LensConfig, PerspectiveCamera, Viewport};
use crate::tween::CompletionHook;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub lens: LensConfig,
    pub orbit: OrbitConfig,
    pub focus: FocusConfig,
}

/// Camera, orbit controls and focus tweens, advanced together by the frame
/// stages.
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    focus: FocusOrchestrator,
    viewport: Viewport,
}

impl CameraRig {
    /// Places the camera at the entrance start with controls disabled.
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        let camera = PerspectiveCamera::new(config.focus.entrance_start(), config.lens, viewport);
        let mut controls = OrbitControls::new(config.orbit);
        controls.set_viewport_height(viewport.height);
        Self {
            camera,
            controls,
            focus: FocusOrchestrator::new(config.focus),
            viewport,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn focus(&self) -> &FocusOrchestrator {
        &self.focus
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn enter_scene(&mut self) {
        debug!("starting entrance fly-in");
        self.focus.begin_entrance(&self.camera);
    }

    /// Hands the camera to the user once the fly-in lands.
    pub fn complete_entrance(&mut self) {
        self.controls.set_enabled(true);
    }

    pub fn focus_on(
        &mut self,
        hierarchy: &NodeHierarchy,
        globe: &GlobeTransform,
        request: &FocusRequest,
    ) -> Result<(), FocusError> {
        self.focus
            .focus_on(&self.camera, hierarchy, globe, request)
            .map(|_| ())
    }

    /// Animation stage: advances the active tween.
    pub fn animate(&mut self, dt_s: f64) -> Option<CompletionHook> {
        self.focus.advance(&mut self.camera, dt_s)
    }

    /// Controls stage: runs after `animate` so damping sees the tweened
    /// position.
    pub fn update_controls(&mut self, dt_s: f64, auto_rotate: bool) -> bool {
        self.controls.set_auto_rotate(auto_rotate);
        self.controls.update(&mut self.camera, dt_s)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.resize(viewport);
        self.controls.set_viewport_height(viewport.height);
    }
}
