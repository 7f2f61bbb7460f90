//! Fixed-size spark pool emitted from the globe's core.
//!
//! Sparks drift outwards under a faint downward pull and are recycled in
//! place once they burn out or leave the shell. The pool never grows or
//! shrinks. All tuning constants are per reference frame (1/60 s) and are
//! scaled by `dt × 60`.

use foundation::Rgb;
use foundation::math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::REFERENCE_FPS;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LIFE_PER_FRAME: f64 = 0.01;
const GRAVITY_PER_FRAME: f64 = 0.001;

pub const SPARK_CORE_COLOR: u32 = 0xffffff;
pub const SPARK_MID_COLOR: u32 = 0xffddaa;
pub const SPARK_EDGE_COLOR: u32 = 0xaa00ff;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    pub count: usize,
    pub globe_radius: f64,
    /// Sparks beyond `globe_radius × respawn_radius_factor` are recycled.
    pub respawn_radius_factor: f64,
    /// Fixed seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            count: 800,
            globe_radius: 15.0,
            respawn_radius_factor: 1.03,
            seed: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f64,
    pub max_life: f64,
    pub base_size: f64,
}

impl Spark {
    pub fn progress(&self) -> f64 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            1.0
        }
    }

    pub fn color(&self) -> Rgb {
        spark_color(self.progress())
    }

    pub fn size(&self) -> f64 {
        self.base_size * (1.0 - self.progress())
    }
}

/// Core white, fading through warm amber to violet as the spark ages.
pub fn spark_color(progress: f64) -> Rgb {
    let core = Rgb::from_hex(SPARK_CORE_COLOR);
    let mid = Rgb::from_hex(SPARK_MID_COLOR);
    let edge = Rgb::from_hex(SPARK_EDGE_COLOR);
    if progress < 0.2 {
        core
    } else if progress < 0.5 {
        core.lerp(mid, ((progress - 0.2) / 0.3) as f32)
    } else {
        mid.lerp(edge, ((progress - 0.5) / 0.5) as f32)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SparkStep {
    pub respawned: usize,
}

#[derive(Debug)]
pub struct SparkPool {
    config: SparkConfig,
    sparks: Vec<Spark>,
    rng: StdRng,
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl SparkPool {
    pub fn new(config: SparkConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let sparks: Vec<Spark> = (0..config.count)
            .map(|_| {
                let base_size = rng.gen_range(1.5..3.0);
                let velocity = random_direction(&mut rng) * rng.gen_range(0.04..0.24);
                Spark {
                    position: Vec3::ZERO,
                    velocity,
                    life: rng.gen_range(0.0..1.0),
                    max_life: rng.gen_range(0.6..1.0),
                    base_size,
                }
            })
            .collect();

        let positions = vec![0.0; sparks.len() * 3];
        let colors = vec![1.0; sparks.len() * 3];
        let sizes = sparks.iter().map(|s| s.base_size as f32).collect();

        debug!(count = sparks.len(), seeded = config.seed.is_some(), "spawned spark pool");
        Self {
            config,
            sparks,
            rng,
            positions,
            colors,
            sizes,
        }
    }

    pub fn config(&self) -> &SparkConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Flat `xyz` positions, one triple per spark.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `rgb` colors, one triple per spark.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn respawn_radius(&self) -> f64 {
        self.config.globe_radius * self.config.respawn_radius_factor
    }

    pub fn step(&mut self, dt_s: f64) -> SparkStep {
        let frames = if dt_s.is_finite() { dt_s.max(0.0) * REFERENCE_FPS } else { 0.0 };
        let limit_sq = self.respawn_radius().powi(2);
        let mut report = SparkStep::default();

        for (i, spark) in self.sparks.iter_mut().enumerate() {
            // Distance is taken before this frame's move.
            let dist_sq = spark.position.length_squared();
            spark.life += LIFE_PER_FRAME * frames;

            if spark.life > spark.max_life || dist_sq > limit_sq {
                spark.life = 0.0;
                spark.position = Vec3::ZERO;
                spark.velocity = random_direction(&mut self.rng) * self.rng.gen_range(0.03..0.08);
                report.respawned += 1;
            } else {
                spark.position += spark.velocity * frames;
                spark.velocity.y -= GRAVITY_PER_FRAME * frames;
            }

            let p = spark.position.to_f32();
            self.positions[i * 3..i * 3 + 3].copy_from_slice(&p);
            self.colors[i * 3..i * 3 + 3].copy_from_slice(&spark.color().as_array());
            self.sizes[i] = spark.size() as f32;
        }

        report
    }
}

/// Uniform sample in the unit cube around the origin, normalized.
fn random_direction(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
        );
        if let Some(dir) = v.try_normalize() {
            return dir;
        }
    }
}
