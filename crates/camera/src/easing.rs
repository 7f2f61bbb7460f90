use serde::{Deserialize, Serialize};

/// Ease curves over normalized time `t ∈ [0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    CubicOut,
    QuinticOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        let u = 1.0 - t;
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - u * u * u,
            Easing::QuinticOut => 1.0 - u * u * u * u * u,
        }
    }
}
