use foundation::math::Vec3;

use crate::easing::Easing;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TweenKind {
    NodeFocus,
    OverlayFocus,
    Entrance,
}

/// Deferred work that runs once a tween reaches its target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompletionHook {
    /// The fly-in finished: hand control to the user.
    EnterScene,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TweenStep {
    pub position: Vec3,
    pub finished: bool,
}

/// Timed camera-position transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTween {
    start: Vec3,
    target: Vec3,
    duration_s: f64,
    elapsed_s: f64,
    easing: Easing,
    kind: TweenKind,
    on_complete: Option<CompletionHook>,
}

impl CameraTween {
    pub fn new(
        start: Vec3,
        target: Vec3,
        duration_s: f64,
        easing: Easing,
        kind: TweenKind,
    ) -> Self {
        let duration_s = if duration_s.is_finite() {
            duration_s.max(0.0)
        } else {
            0.0
        };
        Self {
            start,
            target,
            duration_s,
            elapsed_s: 0.0,
            easing,
            kind,
            on_complete: None,
        }
    }

    pub fn with_hook(mut self, hook: CompletionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn hook(&self) -> Option<CompletionHook> {
        self.on_complete
    }

    pub fn progress(&self) -> f64 {
        if self.duration_s <= 0.0 {
            1.0
        } else {
            (self.elapsed_s / self.duration_s).min(1.0)
        }
    }

    pub fn advance(&mut self, dt_s: f64) -> TweenStep {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.elapsed_s += dt_s;
        }
        let t = self.progress();
        TweenStep {
            position: self.start.lerp(self.target, self.easing.apply(t)),
            finished: t >= 1.0,
        }
    }
}
