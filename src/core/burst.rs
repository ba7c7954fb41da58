//! Short-lived sparks thrown out by a pointer press.
//!
//! Sparks live beside the particle pool, never in it: the pool keeps its
//! tier-sized count while bursts come and go.

use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
    /// Fades to zero, at which point the spark is dropped.
    pub opacity: f32,
}

/// Bounded set of live sparks. When full, the oldest make room.
pub struct BurstEmitter {
    sparks: Vec<Spark>,
    capacity: usize,
    rng: StdRng,
}

/// Fully saturated color at lightness 0.7 with the given hue in `[0, 1)`.
fn bright_hue(h: f32) -> Vec3 {
    let (s, l) = (1.0_f32, 0.7_f32);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(1.0) * 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c * 0.5;
    Vec3::new(r + m, g + m, b + m)
}

impl BurstEmitter {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            sparks: Vec::with_capacity(capacity),
            capacity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Throw `BURST_SPARK_COUNT` sparks from `center` with per-axis speeds in
    /// `-speed..speed`. `planar` keeps them on the z = 0 plane. Returns how
    /// many were added.
    pub fn emit(&mut self, center: Vec3, speed: f32, planar: bool) -> usize {
        if !center.is_finite() || !speed.is_finite() || self.capacity == 0 {
            return 0;
        }
        let count = BURST_SPARK_COUNT.min(self.capacity);
        let overflow = (self.sparks.len() + count).saturating_sub(self.capacity);
        self.sparks.drain(..overflow);

        let speed = speed.max(0.0);
        for _ in 0..count {
            let mut velocity = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            ) * speed;
            if planar {
                velocity.z = 0.0;
            }
            self.sparks.push(Spark {
                position: center,
                velocity,
                color: bright_hue(self.rng.gen()),
                opacity: 1.0,
            });
        }
        count
    }

    /// Move, slow and fade every spark; drop the ones that faded out.
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_SEC) } else { 0.0 };
        if dt == 0.0 || self.sparks.is_empty() {
            return;
        }
        let decay = BURST_VELOCITY_DECAY.powf(dt * BURST_REFERENCE_FPS);
        let fade = BURST_FADE_PER_SEC * dt;
        for s in self.sparks.iter_mut() {
            s.position += s.velocity * dt;
            s.velocity *= decay;
            s.opacity -= fade;
        }
        self.sparks.retain(|s| s.opacity > 0.0);
    }

    pub fn clear(&mut self) {
        self.sparks.clear();
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }
}
