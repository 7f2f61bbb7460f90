//! Music-note sprites floating in a wide shell around the globe.
//!
//! The field is sampled once and never respawns. Each frame the whole group
//! turns slowly against the globe's idle spin and every sprite bobs
//! vertically on its own phase. Positions stay in group-local space; draw
//! them under [`NoteField::rotation`].

use std::f64::consts::TAU;

use foundation::math::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::REFERENCE_FPS;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NOTE_GLYPHS: [&str; 10] = ["♩", "♪", "♫", "♬", "🎵", "🎶", "𝄞", "𝄢", "♭", "♯"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteConfig {
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Group yaw per reference frame; negative turns against the globe.
    pub spin_per_frame: f64,
    pub bob_amplitude: f64,
    /// Bob phase advance in radians per second.
    pub bob_rate: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub seed: Option<u64>,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            count: 100,
            min_radius: 40.0,
            max_radius: 120.0,
            spin_per_frame: -0.0002,
            bob_amplitude: 3.0,
            bob_rate: 1.0,
            min_scale: 2.0,
            max_scale: 5.0,
            seed: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Note {
    /// Index into [`NOTE_GLYPHS`].
    pub glyph: usize,
    /// Rest position; the bob only moves `y` away from it.
    pub base: Vec3,
    pub position: Vec3,
    pub phase: f64,
    pub scale: f64,
}

impl Note {
    pub fn glyph(&self) -> &'static str {
        NOTE_GLYPHS[self.glyph % NOTE_GLYPHS.len()]
    }
}

#[derive(Debug)]
pub struct NoteField {
    config: NoteConfig,
    notes: Vec<Note>,
    yaw: f64,
    elapsed_s: f64,
    positions: Vec<f32>,
    scales: Vec<f32>,
}

impl NoteField {
    pub fn new(config: NoteConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let notes: Vec<Note> = (0..config.count)
            .map(|_| {
                let glyph = rng.gen_range(0..NOTE_GLYPHS.len());
                let r = sample(&mut rng, config.min_radius, config.max_radius);
                let theta = rng.gen_range(0.0..TAU);
                // Uniform over the sphere rather than bunched at the poles.
                let phi = (2.0 * rng.gen_range(0.0_f64..1.0) - 1.0).acos();
                let base = Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                );
                let scale = sample(&mut rng, config.min_scale, config.max_scale);
                Note {
                    glyph,
                    base,
                    position: base,
                    phase: rng.gen_range(0.0..TAU),
                    scale,
                }
            })
            .collect();

        let positions = notes.iter().flat_map(|n| n.position.to_f32()).collect();
        let scales = notes.iter().map(|n| n.scale as f32).collect();

        debug!(count = notes.len(), seeded = config.seed.is_some(), "spawned note field");
        Self {
            config,
            notes,
            yaw: 0.0,
            elapsed_s: 0.0,
            positions,
            scales,
        }
    }

    pub fn config(&self) -> &NoteConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Flat group-local `xyz` positions, one triple per note.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn step(&mut self, dt_s: f64) {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        let frames = dt_s * REFERENCE_FPS;
        self.yaw = (self.yaw + self.config.spin_per_frame * frames) % TAU;
        self.elapsed_s += dt_s;

        let t = self.elapsed_s * self.config.bob_rate;
        for (i, note) in self.notes.iter_mut().enumerate() {
            note.position.y = note.base.y + (t + note.phase).sin() * self.config.bob_amplitude;
            self.positions[i * 3 + 1] = note.position.y as f32;
        }
    }
}

/// `lo..hi`, or `lo` when the range is empty.
fn sample(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}
