use foundation::time::Time;

/// Reference rate the stylized animation constants were tuned for.
pub const REFERENCE_FPS: f64 = 60.0;

/// Frame metadata handed to every stage.
///
/// `dt_s` is the real elapsed time since the previous frame. Per-frame
/// constants are scaled by [`Frame::reference_frames`] so animation speed does
/// not depend on the host's refresh rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// Fixed-step frame; time is derived from the index.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first(dt_s: f64) -> Self {
        Self::new(0, dt_s)
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            dt_s: self.dt_s,
            time: self.time.advance(self.dt_s),
        }
    }

    /// Next frame with a different delta (variable-rate hosts).
    pub fn next_with(self, dt_s: f64) -> Self {
        Self {
            dt_s: sanitize_dt(dt_s),
            ..self.next()
        }
    }

    /// Elapsed time expressed in reference frames (1.0 at 60 fps).
    pub fn reference_frames(&self) -> f64 {
        self.dt_s * REFERENCE_FPS
    }
}

/// Clamp hostile deltas (negative, NaN, long stalls) to something animatable.
pub fn sanitize_dt(dt_s: f64) -> f64 {
    if !dt_s.is_finite() || dt_s < 0.0 {
        0.0
    } else {
        dt_s.min(0.1)
    }
}
