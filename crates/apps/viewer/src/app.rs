//! The viewer's per-frame pipeline.
//!
//! Input (script steps) is applied at the frame boundary, then the stages
//! run in order: animate → controls → particles → labels → render.

use anyhow::Context;
use camera::{CameraRig, CompletionHook, FocusError, Viewport};
use foundation::math::Vec2;
use gpu::{Atmosphere, RecordingBackend, RenderBackend, Renderer};
use layers::{LabelFrame, LabelSyncConfig, sync_labels};
use particles::{NoteField, SparkPool};
use runtime::{
    EventBus, FRAMES_RUN, FRAMES_SKIPPED, Frame, FrameError, FrameFault, FrameOutcome,
    INTENTS_APPLIED, INTENTS_REJECTED, Job, LABELS_VISIBLE, Metrics, PARTICLES_RESPAWNED,
    Scheduler, sanitize_dt,
};
use scene::{
    Command, GlobeTransform, Intent, InteractionMachine, InteractionState, NodeHierarchy,
    SceneError,
};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::content::ContentSlot;
use crate::host::LoggingOverlayHost;
use crate::script::{HostEvent, InputScript, ScriptAction};

/// How many recent [`AppEvent`]s the app holds on to.
pub const EVENT_HISTORY: usize = 256;

/// Notable things that happened, kept in frame order.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    IntentApplied(Intent),
    IntentRejected { intent: Intent, error: SceneError },
    FocusFailed(FocusError),
    EntranceLanded,
    ContentLoaded,
    Resized(Viewport),
    FrameSkipped(FrameFault),
}

/// Everything the frame stages read and write.
pub struct GlobeApp {
    machine: InteractionMachine,
    rig: CameraRig,
    globe: GlobeTransform,
    sparks: SparkPool,
    notes: NoteField,
    label_config: LabelSyncConfig,
    labels: LabelFrame,
    backend: RecordingBackend,
    host: LoggingOverlayHost,
    content: ContentSlot,
    metrics: Metrics,
    events: EventBus<AppEvent>,
}

impl GlobeApp {
    pub fn new(config: &ViewerConfig, hierarchy: NodeHierarchy, content: ContentSlot) -> Self {
        let machine = InteractionMachine::new(
            hierarchy,
            InteractionState::default(),
            config.interaction.clone(),
        );
        let mut backend = RecordingBackend::keep_last(120);
        backend.resize(config.viewport);

        Self {
            machine,
            rig: CameraRig::new(config.camera.clone(), config.viewport),
            globe: GlobeTransform::new(config.globe.spin_per_frame),
            sparks: SparkPool::new(config.sparks.clone()),
            notes: NoteField::new(config.notes.clone()),
            label_config: config.labels,
            labels: LabelFrame::default(),
            backend,
            host: LoggingOverlayHost::new(),
            content,
            metrics: Metrics::new(),
            events: EventBus::keep_last(EVENT_HISTORY),
        }
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn globe(&self) -> &GlobeTransform {
        &self.globe
    }

    pub fn labels(&self) -> &LabelFrame {
        &self.labels
    }

    pub fn backend(&self) -> &RecordingBackend {
        &self.backend
    }

    pub fn host(&self) -> &LoggingOverlayHost {
        &self.host
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn notes(&self) -> &NoteField {
        &self.notes
    }

    pub fn events(&self) -> &EventBus<AppEvent> {
        &self.events
    }

    /// Hands the retained events to the caller and starts a fresh history.
    pub fn drain_events(&mut self) -> Vec<runtime::Event<AppEvent>> {
        self.events.drain()
    }

    /// Applies one script step. Only intents can fail.
    pub fn handle(&mut self, frame: Frame, action: ScriptAction) -> Result<(), SceneError> {
        match action {
            ScriptAction::Intent(intent) => self.apply_intent(frame, intent),
            ScriptAction::Host(event) => {
                self.handle_host(frame, event);
                Ok(())
            }
        }
    }

    pub fn apply_intent(&mut self, frame: Frame, intent: Intent) -> Result<(), SceneError> {
        let result = self.machine.apply(&intent, self.content.lookup());
        match &result {
            Ok(()) => {
                debug!(?intent, phase = ?self.machine.phase(), "intent applied");
                self.metrics.inc_counter(INTENTS_APPLIED, 1);
                self.events.emit(frame, AppEvent::IntentApplied(intent));
            }
            Err(error) => {
                warn!(?intent, %error, "intent rejected");
                self.metrics.inc_counter(INTENTS_REJECTED, 1);
                self.events.emit(
                    frame,
                    AppEvent::IntentRejected {
                        intent,
                        error: error.clone(),
                    },
                );
            }
        }
        self.dispatch_commands(frame);
        result
    }

    fn handle_host(&mut self, frame: Frame, event: HostEvent) {
        match event {
            HostEvent::EnterScene => self.rig.enter_scene(),
            HostEvent::Resize { width, height } => {
                let viewport = Viewport::new(width, height);
                self.rig.resize(viewport);
                self.backend.resize(viewport);
                self.events.emit(frame, AppEvent::Resized(viewport));
            }
            HostEvent::PointerDown { x, y } => {
                if self.rig.controls_mut().on_pointer_down(Vec2::new(x, y)) {
                    // Drag start cannot be rejected.
                    let _ = self.apply_intent(frame, Intent::DragStart);
                }
            }
            HostEvent::PointerMove { x, y } => {
                self.rig.controls_mut().on_pointer_move(Vec2::new(x, y));
            }
            HostEvent::PointerUp => self.rig.controls_mut().on_pointer_up(),
            HostEvent::Wheel { delta } => self.rig.controls_mut().on_wheel(delta),
        }
    }

    /// Routes queued machine commands to the camera and the overlay host.
    fn dispatch_commands(&mut self, frame: Frame) {
        for command in self.machine.drain_commands() {
            match command {
                Command::Focus(request) => {
                    if let Err(err) =
                        self.rig
                            .focus_on(self.machine.hierarchy(), &self.globe, &request)
                    {
                        warn!(%err, "focus request dropped");
                        self.events.emit(frame, AppEvent::FocusFailed(err));
                    }
                }
                Command::Ui(ui) => ui.apply_to(&mut self.host),
                // Orbit auto-rotate is re-read from the state every frame.
                Command::AmbientRotation { enabled } => debug!(enabled, "ambient rotation"),
            }
        }
    }
}

fn animate_stage(app: &mut GlobeApp, frame: Frame) -> Result<(), FrameError> {
    let hook = app.rig.animate(frame.dt_s);
    if app.machine.state().globe_spinning() {
        app.globe.spin(frame.reference_frames());
    }
    if !app.globe.yaw().is_finite() {
        return Err(FrameError::NonFinite { what: "globe yaw" });
    }

    if let Some(CompletionHook::EnterScene) = hook {
        info!(frame = frame.index, "entrance landed");
        app.rig.complete_entrance();
        app.machine.check_resume_rotation();
        app.dispatch_commands(frame);
        app.events.emit(frame, AppEvent::EntranceLanded);
    }
    Ok(())
}

fn controls_stage(app: &mut GlobeApp, frame: Frame) -> Result<(), FrameError> {
    let auto_rotate = app.machine.state().orbit_auto_rotate();
    app.rig.update_controls(frame.dt_s, auto_rotate);
    if !app.rig.camera().position.is_finite() {
        return Err(FrameError::NonFinite {
            what: "camera position",
        });
    }
    Ok(())
}

fn particles_stage(app: &mut GlobeApp, frame: Frame) -> Result<(), FrameError> {
    let step = app.sparks.step(frame.dt_s);
    app.notes.step(frame.dt_s);
    if step.respawned > 0 {
        app.metrics
            .inc_counter(PARTICLES_RESPAWNED, step.respawned as u64);
    }
    Ok(())
}

fn labels_stage(app: &mut GlobeApp, _frame: Frame) -> Result<(), FrameError> {
    app.labels = sync_labels(
        app.machine.hierarchy(),
        app.rig.camera(),
        &app.globe,
        app.rig.viewport(),
        &app.label_config,
    );
    app.metrics
        .set_gauge(LABELS_VISIBLE, app.labels.shown() as i64);
    Ok(())
}

fn render_stage(app: &mut GlobeApp, frame: Frame) -> Result<(), FrameError> {
    let snapshot = Renderer::collect(
        frame.index,
        app.rig.camera(),
        app.rig.viewport(),
        &app.globe,
        app.machine.hierarchy(),
        Atmosphere {
            sparks: &app.sparks,
            notes: &app.notes,
        },
        &app.labels,
    )?;
    app.backend.submit(&snapshot)
}

pub fn build_scheduler() -> Scheduler<GlobeApp> {
    let mut scheduler = Scheduler::new();
    scheduler.add_job(Job::with_priority("animate", 0, animate_stage));
    scheduler.add_job(Job::with_priority("controls", 10, controls_stage));
    scheduler.add_job(Job::with_priority("particles", 20, particles_stage));
    scheduler.add_job(Job::with_priority("labels", 30, labels_stage));
    scheduler.add_job(Job::with_priority("render", 40, render_stage));
    scheduler
}

/// Drives a [`GlobeApp`] frame by frame from an input script.
pub struct FrameLoop {
    app: GlobeApp,
    scheduler: Scheduler<GlobeApp>,
    script: InputScript,
    strict: bool,
    dt_s: f64,
    last: Option<Frame>,
}

impl FrameLoop {
    /// With `strict`, a rejected intent stops the loop instead of being
    /// logged and skipped.
    pub fn new(app: GlobeApp, script: InputScript, dt_s: f64, strict: bool) -> Self {
        Self {
            app,
            scheduler: build_scheduler(),
            script,
            strict,
            dt_s: sanitize_dt(dt_s),
            last: None,
        }
    }

    pub fn app(&self) -> &GlobeApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut GlobeApp {
        &mut self.app
    }

    /// Runs one frame at the configured fixed delta.
    pub fn step(&mut self) -> anyhow::Result<FrameOutcome> {
        self.step_with(self.dt_s)
    }

    /// Runs one frame with an explicit delta, for hosts paced by a real
    /// clock.
    pub fn step_with(&mut self, dt_s: f64) -> anyhow::Result<FrameOutcome> {
        let frame = match self.last {
            Some(previous) => previous.next_with(dt_s),
            None => Frame::first(sanitize_dt(dt_s)),
        };
        self.last = Some(frame);

        if self.app.content.poll() {
            self.app.events.emit(frame, AppEvent::ContentLoaded);
        }

        for action in self.script.due(frame.index) {
            let result = self.app.handle(frame, action);
            if self.strict {
                result.with_context(|| format!("frame {}", frame.index))?;
            }
        }

        let outcome = self.scheduler.run_frame(&mut self.app, frame);
        match &outcome {
            FrameOutcome::Completed { .. } => self.app.metrics.inc_counter(FRAMES_RUN, 1),
            FrameOutcome::Skipped(fault) => {
                self.app.metrics.inc_counter(FRAMES_SKIPPED, 1);
                self.app
                    .events
                    .emit(frame, AppEvent::FrameSkipped(fault.clone()));
            }
        }
        Ok(outcome)
    }

    pub fn run(&mut self, frames: u64) -> anyhow::Result<()> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(())
    }
}
