/// Engine time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn advance(self, dt_s: f64) -> Self {
        Time(self.0 + dt_s)
    }
}

/// Converts a duration in milliseconds to seconds.
#[inline]
pub fn ms_to_s(ms: f64) -> f64 {
    ms / 1000.0
}
