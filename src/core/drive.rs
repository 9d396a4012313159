//! Seeded drive streams in [-1, 1] (the external random input of the engine).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DriveKind {
    #[default]
    White,
    /// Paul Kellet 3-pole pink approximation.
    Pink,
    /// Leaky-integrated white noise.
    Brown,
}

const PINK_GAIN: f32 = 0.25;
const BROWN_POLE: f32 = 0.995;
const BROWN_GAIN: f32 = 8.0;

/// Stateful drive generator.
#[derive(Debug, Clone)]
pub struct Drive {
    kind: DriveKind,
    rng: StdRng,
    b0: f32,
    b1: f32,
    b2: f32,
    y: f32,
}

impl Drive {
    pub fn new(kind: DriveKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            y: 0.0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let white: f32 = self.rng.random_range(-1.0..1.0);
        let v = match self.kind {
            DriveKind::White => white,
            DriveKind::Pink => {
                self.b0 = 0.99765 * self.b0 + white * 0.099_046_0;
                self.b1 = 0.96300 * self.b1 + white * 0.296_516_4;
                self.b2 = 0.57000 * self.b2 + white * 1.052_691_3;
                (self.b0 + self.b1 + self.b2 + white * 0.1848) * PINK_GAIN
            }
            DriveKind::Brown => {
                self.y = BROWN_POLE * self.y + (1.0 - BROWN_POLE) * white;
                self.y * BROWN_GAIN
            }
        };
        v.clamp(-1.0, 1.0)
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        for s in out.iter_mut() {
            *s = self.next_sample();
        }
    }
}

impl Iterator for Drive {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.next_sample())
    }
}
