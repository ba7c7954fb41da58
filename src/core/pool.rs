//! Fixed-size particle pool stored as index-aligned attribute arrays.
//!
//! Index `i` of `positions`, `velocities`, `colors` and `sizes` always refers
//! to the same particle. The pool is only ever resized by `initialize`.

use super::theme::Palette;
use crate::constants::MAX_STEP_SEC;
use glam::Vec3;
use rand::prelude::*;

/// Axis-aligned box the particles live in. An axis with zero extent is
/// degenerate: particles stay pinned to it (used by the flat 2D field).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on the origin.
    pub fn centered(half_extents: Vec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }
}

/// What happens when a particle leaves the box on an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Re-enter from the opposite side (starfield).
    Wrap,
    /// Mirror back inside and bounce with reduced speed (pointer-interactive).
    #[default]
    Reflect,
}

impl BoundaryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "wrap" => Some(Self::Wrap),
            "reflect" => Some(Self::Reflect),
            _ => None,
        }
    }
}

/// Motion parameters shared by every particle in a pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Initial per-axis speed range is `-max_speed..max_speed`.
    pub max_speed: f32,
    /// Speed `apply_drift` tops slow particles back up to.
    pub drift_floor: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Per-tick velocity multiplier, strictly inside `(0, 1)`.
    pub damping: f32,
    /// Fraction of speed kept after a reflection.
    pub restitution: f32,
    pub boundary: BoundaryPolicy,
}

pub struct ParticlePool {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Vec3>,
    sizes: Vec<f32>,
    bounds: Bounds,
    motion: Motion,
    rng: StdRng,
}

impl ParticlePool {
    /// Empty pool; call `initialize` to allocate particles.
    pub fn new(motion: Motion, seed: u64) -> Self {
        Self {
            positions: Vec::new(),
            velocities: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            bounds: Bounds::centered(Vec3::ZERO),
            motion,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the random stream; the next `initialize` reproduces a field.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn initialize(&mut self, count: usize, bounds: Bounds, palette: &Palette) {
        self.bounds = bounds;
        self.positions.clear();
        self.velocities.clear();
        self.colors.clear();
        self.sizes.clear();
        self.positions.reserve(count);
        self.velocities.reserve(count);
        self.colors.reserve(count);
        self.sizes.reserve(count);

        let extent = bounds.extent();
        let speed = self.motion.max_speed.max(0.0);
        for _ in 0..count {
            let t = Vec3::new(self.rng.gen(), self.rng.gen(), self.rng.gen());
            self.positions.push(bounds.min + extent * t);

            let mut v = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            ) * speed;
            // flat axes never move
            for axis in 0..3 {
                if extent[axis] <= 0.0 {
                    v[axis] = 0.0;
                }
            }
            self.velocities.push(v);

            self.colors.push(palette.sample(&mut self.rng));
            let size = if self.motion.size_max > self.motion.size_min {
                self.rng.gen_range(self.motion.size_min..self.motion.size_max)
            } else {
                self.motion.size_min
            };
            self.sizes.push(size);
        }
    }

    /// Advance by `dt`, damp every velocity once, then enforce the boundary.
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_SEC) } else { 0.0 };
        let Motion {
            damping,
            restitution,
            boundary,
            ..
        } = self.motion;
        let bounds = self.bounds;
        let extent = bounds.extent();

        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *p += *v * dt;
            *v *= damping;

            for axis in 0..3 {
                let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
                if p[axis] >= lo && p[axis] <= hi {
                    continue;
                }
                match boundary {
                    BoundaryPolicy::Wrap => {
                        p[axis] = if extent[axis] > 0.0 {
                            lo + (p[axis] - lo).rem_euclid(extent[axis])
                        } else {
                            lo
                        };
                    }
                    BoundaryPolicy::Reflect => {
                        if p[axis] < lo {
                            p[axis] = lo + (lo - p[axis]);
                            v[axis] = v[axis].abs() * restitution;
                        } else {
                            p[axis] = hi - (p[axis] - hi);
                            v[axis] = -v[axis].abs() * restitution;
                        }
                    }
                }
                p[axis] = p[axis].clamp(lo, hi);
            }
        }
    }

    /// Ambient drift: particles slower than `drift_floor` are pushed back up
    /// to it along their current heading. Resting particles stay at rest.
    /// Applied outside `step`, which damps every particle on every tick.
    pub fn apply_drift(&mut self) {
        let floor = self.motion.drift_floor;
        if floor <= 0.0 {
            return;
        }
        for v in self.velocities.iter_mut() {
            let speed = v.length();
            if speed > 0.0 && speed < floor {
                *v *= floor / speed;
            }
        }
    }

    /// Pull particles within `radius` of `point` toward it; the pull fades
    /// linearly to zero at `radius`.
    pub fn apply_attractor(&mut self, point: Vec3, radius: f32, strength: f32, dt: f32) {
        if radius <= 0.0 || !point.is_finite() {
            return;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_SEC) } else { 0.0 };
        for (p, v) in self.positions.iter().zip(self.velocities.iter_mut()) {
            let to_point = point - *p;
            let dist = to_point.length();
            if dist >= radius || dist <= f32::EPSILON {
                continue;
            }
            let falloff = 1.0 - dist / radius;
            *v += to_point / dist * strength * falloff * dt;
        }
    }

    pub fn recolor(&mut self, palette: &Palette) {
        for c in self.colors.iter_mut() {
            *c = palette.sample(&mut self.rng);
        }
    }

    /// Change the box without reallocating; stray particles are brought back
    /// by the next `step`.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Overwrite one particle's kinematics; used by scenarios that need
    /// exact placement.
    pub fn place(&mut self, index: usize, position: Vec3, velocity: Vec3) {
        if let (Some(p), Some(v)) = (self.positions.get_mut(index), self.velocities.get_mut(index)) {
            *p = position;
            *v = velocity;
        }
    }
}
