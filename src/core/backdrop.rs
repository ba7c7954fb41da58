//! The capability-polymorphic backdrop: one particle field, two renderers.
//!
//! [`ParticleBackdrop`] owns the pool, the neighbor links and the camera and
//! is generic over a [`Renderer`]. The host picks the renderer once (WebGPU
//! or 2D canvas) and then only talks to the [`Backdrop`] trait object.

use super::burst::{BurstEmitter, Spark};
use super::camera::Camera;
use super::links::{build_links, Link};
use super::pool::{BoundaryPolicy, Bounds, Motion, ParticlePool};
use super::scheduler::FramePlan;
use super::theme::{Theme, ThemeStyle};
use super::tier::{QualityTier, TierProfile};
use crate::constants::*;
use crate::error::BackdropError;
use glam::{Mat4, Vec2, Vec3};

/// How pool coordinates map to the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    /// World units seen through the perspective camera.
    Perspective,
    /// Pool coordinates are canvas pixels, y down.
    Flat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    pub bounds: Bounds,
    pub motion: Motion,
    pub attractor_radius: f32,
    pub attractor_strength: f32,
    /// Per-axis spark speed of a pointer-press burst.
    pub burst_speed: f32,
    pub yaw_per_sec: f32,
    pub projection: Projection,
    pub seed: u64,
}

impl FieldConfig {
    /// 3D field drawn by the GPU renderer.
    pub fn spatial(seed: u64) -> Self {
        Self {
            bounds: Bounds::centered(Vec3::new(
                FIELD_HALF_WIDTH,
                FIELD_HALF_HEIGHT,
                FIELD_HALF_DEPTH,
            )),
            motion: Motion {
                max_speed: FIELD_MAX_SPEED,
                drift_floor: FIELD_DRIFT_FLOOR,
                size_min: FIELD_SIZE_MIN,
                size_max: FIELD_SIZE_MAX,
                damping: VELOCITY_DAMPING,
                restitution: REFLECT_RESTITUTION,
                boundary: BoundaryPolicy::Reflect,
            },
            attractor_radius: FIELD_ATTRACTOR_RADIUS,
            attractor_strength: FIELD_ATTRACTOR_STRENGTH,
            burst_speed: FIELD_BURST_SPEED,
            yaw_per_sec: SCENE_YAW_PER_SEC,
            projection: Projection::Perspective,
            seed,
        }
    }

    /// Flat field in canvas pixels drawn by the 2D fallback.
    pub fn flat(width: u32, height: u32, seed: u64) -> Self {
        Self {
            bounds: flat_bounds(width, height),
            motion: Motion {
                max_speed: FLAT_MAX_SPEED,
                drift_floor: FLAT_DRIFT_FLOOR,
                size_min: FLAT_SIZE_MIN,
                size_max: FLAT_SIZE_MAX,
                damping: VELOCITY_DAMPING,
                restitution: REFLECT_RESTITUTION,
                boundary: BoundaryPolicy::Wrap,
            },
            attractor_radius: FLAT_ATTRACTOR_RADIUS,
            attractor_strength: FLAT_ATTRACTOR_STRENGTH,
            burst_speed: FLAT_BURST_SPEED,
            yaw_per_sec: 0.0,
            projection: Projection::Flat,
            seed,
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.motion.boundary = boundary;
        self
    }

    pub fn validate(&self) -> Result<(), BackdropError> {
        let m = &self.motion;
        if !(m.damping > 0.0 && m.damping < 1.0) {
            return Err(BackdropError::InvalidConfig("damping must lie in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&m.restitution) {
            return Err(BackdropError::InvalidConfig("restitution must lie in [0, 1]"));
        }
        if !self.bounds.is_valid() {
            return Err(BackdropError::InvalidConfig("bounds must be finite with min <= max"));
        }
        if !(m.max_speed >= 0.0 && m.drift_floor >= 0.0) {
            return Err(BackdropError::InvalidConfig("speeds must be non-negative"));
        }
        if !(m.size_min > 0.0 && m.size_max >= m.size_min) {
            return Err(BackdropError::InvalidConfig("size range must be positive"));
        }
        if !(self.attractor_radius > 0.0 && self.attractor_strength.is_finite()) {
            return Err(BackdropError::InvalidConfig("attractor radius must be positive"));
        }
        if !(self.burst_speed >= 0.0 && self.burst_speed.is_finite()) {
            return Err(BackdropError::InvalidConfig("burst speed must be non-negative"));
        }
        Ok(())
    }
}

fn flat_bounds(width: u32, height: u32) -> Bounds {
    Bounds::new(Vec3::ZERO, Vec3::new(width as f32, height as f32, 0.0))
}

/// Everything a renderer needs for one frame.
pub struct Scene<'a> {
    pub positions: &'a [Vec3],
    pub colors: &'a [Vec3],
    pub sizes: &'a [f32],
    pub links: &'a [Link],
    /// Transient burst sparks, drawn over the pool.
    pub sparks: &'a [Spark],
    pub point_scale: f32,
    pub style: ThemeStyle,
    /// Camera and scene rotation combined; identity for flat fields.
    pub view_proj: Mat4,
}

pub trait Renderer {
    fn draw(&mut self, scene: &Scene<'_>) -> anyhow::Result<()>;
    fn set_pixel_ratio_cap(&mut self, cap: f32);
    fn resize(&mut self, width: u32, height: u32);
    /// Free GPU/canvas resources. Must tolerate repeated calls.
    fn release(&mut self);
}

pub trait Backdrop {
    /// `pointer` is in normalized device coordinates (`-1..=1`, +y up).
    fn simulate(&mut self, plan: FramePlan, dt: f32, pointer: Option<Vec2>);
    /// Throw a burst of sparks from the pointer. Never changes the pool.
    fn burst(&mut self, pointer: Vec2);
    fn render(&mut self) -> anyhow::Result<()>;
    fn recolor(&mut self, theme: Theme);
    /// Rebuild the pool at the tier's budget.
    fn set_tier(&mut self, tier: QualityTier);
    fn resize(&mut self, width: u32, height: u32);
    fn destroy(&mut self);
    fn particle_count(&self) -> usize;
    fn spark_count(&self) -> usize;
    fn tier(&self) -> QualityTier;
}

pub struct ParticleBackdrop<R: Renderer> {
    config: FieldConfig,
    pool: ParticlePool,
    links: Vec<Link>,
    sparks: BurstEmitter,
    tier: QualityTier,
    profile: TierProfile,
    theme: Theme,
    camera: Camera,
    yaw: f32,
    renderer: R,
    destroyed: bool,
}

impl<R: Renderer> ParticleBackdrop<R> {
    pub fn new(
        config: FieldConfig,
        tier: QualityTier,
        theme: Theme,
        mut renderer: R,
    ) -> Result<Self, BackdropError> {
        config.validate()?;
        let profile = tier.profile();
        let mut pool = ParticlePool::new(config.motion, config.seed);
        pool.initialize(profile.particle_count, config.bounds, &theme.palette());
        renderer.set_pixel_ratio_cap(profile.pixel_ratio_cap);
        log::info!(
            "[backdrop] {} particles, tier={}, boundary={:?}",
            pool.len(),
            tier.as_str(),
            config.motion.boundary
        );
        Ok(Self {
            config,
            pool,
            links: Vec::new(),
            sparks: BurstEmitter::new(BURST_MAX_SPARKS, config.seed.wrapping_add(1)),
            tier,
            profile,
            theme,
            camera: Camera::default(),
            yaw: 0.0,
            renderer,
            destroyed: false,
        })
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn sparks(&self) -> &[Spark] {
        self.sparks.sparks()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw)
    }

    /// Map the pointer into pool coordinates.
    fn attractor_point(&self, ndc: Vec2) -> Option<Vec3> {
        match self.config.projection {
            Projection::Perspective => {
                let world = self.camera.pointer_to_plane(ndc)?;
                Some(self.model_matrix().inverse().transform_point3(world))
            }
            Projection::Flat => {
                let extent = self.pool.bounds().extent();
                let u = ((ndc.x + 1.0) * 0.5).clamp(0.0, 1.0);
                let v = ((1.0 - ndc.y) * 0.5).clamp(0.0, 1.0);
                Some(self.pool.bounds().min + Vec3::new(u * extent.x, v * extent.y, 0.0))
            }
        }
    }
}

impl<R: Renderer> Backdrop for ParticleBackdrop<R> {
    fn simulate(&mut self, plan: FramePlan, dt: f32, pointer: Option<Vec2>) {
        if self.destroyed {
            return;
        }
        if let Some(ndc) = pointer.filter(|p| p.is_finite()) {
            if self.config.projection == Projection::Perspective {
                self.camera.follow_pointer(ndc);
            }
            if let Some(point) = self.attractor_point(ndc) {
                self.pool.apply_attractor(
                    point,
                    self.config.attractor_radius,
                    self.config.attractor_strength,
                    dt,
                );
            }
        }
        self.pool.apply_drift();
        self.pool.step(dt);
        self.sparks.step(dt);
        if dt.is_finite() {
            self.yaw = (self.yaw + self.config.yaw_per_sec * dt.clamp(0.0, MAX_STEP_SEC))
                % std::f32::consts::TAU;
        }

        if !self.profile.links_enabled {
            self.links.clear();
        } else if plan.build_links {
            build_links(self.pool.positions(), self.profile.link_distance, &mut self.links);
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let view_proj = match self.config.projection {
            Projection::Perspective => self.camera.view_proj() * self.model_matrix(),
            Projection::Flat => Mat4::IDENTITY,
        };
        let scene = Scene {
            positions: self.pool.positions(),
            colors: self.pool.colors(),
            sizes: self.pool.sizes(),
            links: &self.links,
            sparks: self.sparks.sparks(),
            point_scale: self.profile.point_scale,
            style: self.theme.style(),
            view_proj,
        };
        self.renderer.draw(&scene)
    }

    fn burst(&mut self, pointer: Vec2) {
        if self.destroyed || !pointer.is_finite() {
            return;
        }
        if let Some(center) = self.attractor_point(pointer) {
            let planar = self.config.projection == Projection::Flat;
            self.sparks.emit(center, self.config.burst_speed, planar);
        }
    }

    fn recolor(&mut self, theme: Theme) {
        self.theme = theme;
        self.pool.recolor(&theme.palette());
    }

    fn set_tier(&mut self, tier: QualityTier) {
        if self.destroyed || tier == self.tier {
            return;
        }
        self.tier = tier;
        self.profile = tier.profile();
        let bounds = self.pool.bounds();
        self.pool
            .initialize(self.profile.particle_count, bounds, &self.theme.palette());
        self.links.clear();
        self.renderer.set_pixel_ratio_cap(self.profile.pixel_ratio_cap);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.destroyed || width == 0 || height == 0 {
            return;
        }
        match self.config.projection {
            Projection::Perspective => self.camera.set_viewport(width, height),
            Projection::Flat => self.pool.set_bounds(flat_bounds(width, height)),
        }
        self.renderer.resize(width, height);
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.links = Vec::new();
        self.sparks.clear();
        let bounds = self.pool.bounds();
        self.pool.initialize(0, bounds, &self.theme.palette());
        self.renderer.release();
    }

    fn particle_count(&self) -> usize {
        self.pool.len()
    }

    fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    fn tier(&self) -> QualityTier {
        self.tier
    }
}
