// Host-side tests for field configuration and the renderer-agnostic backdrop.

use glam::{Vec2, Vec3};
use portfolio_particles::constants::{BURST_MAX_SPARKS, BURST_SPARK_COUNT};
use portfolio_particles::core::*;
use portfolio_particles::BackdropError;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct NullRenderer {
    releases: Rc<Cell<u32>>,
    resized: Option<(u32, u32)>,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _scene: &Scene<'_>) -> anyhow::Result<()> {
        Ok(())
    }
    fn set_pixel_ratio_cap(&mut self, _cap: f32) {}
    fn resize(&mut self, width: u32, height: u32) {
        self.resized = Some((width, height));
    }
    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

const BUILD: FramePlan = FramePlan { build_links: true };
const REUSE: FramePlan = FramePlan { build_links: false };

#[test]
fn default_fields_validate() {
    assert!(FieldConfig::spatial(1).validate().is_ok());
    assert!(FieldConfig::flat(800, 600, 1).validate().is_ok());
    assert_eq!(FieldConfig::spatial(1).motion.boundary, BoundaryPolicy::Reflect);
    assert_eq!(FieldConfig::flat(800, 600, 1).motion.boundary, BoundaryPolicy::Wrap);
}

#[test]
fn invalid_configs_are_rejected() {
    let mut undamped = FieldConfig::spatial(1);
    undamped.motion.damping = 1.0;
    assert!(matches!(undamped.validate(), Err(BackdropError::InvalidConfig(_))));

    let mut inverted = FieldConfig::spatial(1);
    inverted.bounds = Bounds::new(Vec3::splat(10.0), Vec3::splat(-10.0));
    assert!(inverted.validate().is_err());

    let mut no_radius = FieldConfig::flat(800, 600, 1);
    no_radius.attractor_radius = 0.0;
    assert!(no_radius.validate().is_err());

    let mut bouncy = FieldConfig::spatial(1);
    bouncy.motion.restitution = 1.5;
    let err = ParticleBackdrop::new(bouncy, QualityTier::Low, Theme::Dark, NullRenderer::default());
    assert!(err.is_err());
}

#[test]
fn boundary_override_applies() {
    let config = FieldConfig::spatial(1).with_boundary(BoundaryPolicy::Wrap);
    assert_eq!(config.motion.boundary, BoundaryPolicy::Wrap);
}

#[test]
fn links_follow_tier_and_plan() {
    let mut config = FieldConfig::flat(200, 200, 5);
    config.motion.max_speed = 0.0;
    config.motion.drift_floor = 0.0;
    let mut b =
        ParticleBackdrop::new(config, QualityTier::High, Theme::Dark, NullRenderer::default())
            .expect("valid config");
    // 150 particles in a 200 px square are bound to have neighbors
    b.simulate(BUILD, 0.0, None);
    let built = b.links().to_vec();
    assert!(!built.is_empty());
    b.simulate(REUSE, 0.0, None);
    assert_eq!(b.links(), &built[..]);

    b.set_tier(QualityTier::Low);
    b.simulate(BUILD, 0.0, None);
    assert!(b.links().is_empty());
    assert_eq!(b.particle_count(), QualityTier::Low.profile().particle_count);
}

#[test]
fn flat_pointer_attracts_in_canvas_pixels() {
    let mut config = FieldConfig::flat(800, 600, 9);
    config.motion.max_speed = 0.0;
    config.motion.drift_floor = 0.0;
    let mut b =
        ParticleBackdrop::new(config, QualityTier::Low, Theme::Dark, NullRenderer::default())
            .expect("valid config");
    // pointer at the canvas center
    b.simulate(REUSE, 1.0 / 60.0, Some(Vec2::ZERO));
    let center = Vec3::new(400.0, 300.0, 0.0);
    let pool = b.pool();
    for (p, v) in pool.positions().iter().zip(pool.velocities()) {
        let d = p.distance(center);
        if d < 90.0 && d > 1.0 {
            assert!(v.dot(center - *p) > 0.0, "particle at {:?} not pulled", p);
        } else if d > 100.0 {
            assert!(v.length() < 1.0);
        }
    }
}

#[test]
fn flat_resize_moves_bounds() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::flat(800, 600, 2),
        QualityTier::Low,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    b.resize(400, 300);
    assert_eq!(b.pool().bounds().max, Vec3::new(400.0, 300.0, 0.0));
    assert_eq!(b.renderer().resized, Some((400, 300)));
    for _ in 0..5 {
        b.simulate(REUSE, 1.0 / 60.0, None);
    }
    let bounds = b.pool().bounds();
    assert!(b.pool().positions().iter().all(|p| bounds.contains(*p)));
}

#[test]
fn recolor_keeps_positions() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::spatial(4),
        QualityTier::Medium,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    let before = b.pool().positions().to_vec();
    b.recolor(Theme::Light);
    assert_eq!(b.pool().positions(), &before[..]);
    assert_eq!(b.theme(), Theme::Light);
}

#[test]
fn destroy_frees_pool_once() {
    let renderer = NullRenderer::default();
    let releases = renderer.releases.clone();
    let mut b = ParticleBackdrop::new(FieldConfig::spatial(3), QualityTier::High, Theme::Dark, renderer)
        .expect("valid config");
    b.destroy();
    b.destroy();
    assert_eq!(releases.get(), 1);
    assert_eq!(b.particle_count(), 0);
    b.simulate(BUILD, 1.0 / 60.0, Some(Vec2::ZERO));
    b.set_tier(QualityTier::Low);
    assert_eq!(b.particle_count(), 0);
    assert!(b.render().is_ok());
}

#[test]
fn burst_sparks_fade_out_without_touching_the_pool() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::spatial(6),
        QualityTier::Medium,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    let count = b.particle_count();
    b.burst(Vec2::new(0.25, -0.5));
    assert_eq!(b.spark_count(), BURST_SPARK_COUNT);
    assert_eq!(b.particle_count(), count);
    assert!(b.sparks().iter().all(|s| s.opacity == 1.0));

    for _ in 0..30 {
        b.simulate(REUSE, 1.0 / 60.0, None);
        assert_eq!(b.particle_count(), count);
    }
    assert_eq!(b.spark_count(), BURST_SPARK_COUNT);
    assert!(b.sparks().iter().all(|s| s.opacity > 0.0 && s.opacity < 1.0));

    // 0.02 opacity per frame at 60 fps
    for _ in 0..30 {
        b.simulate(REUSE, 1.0 / 60.0, None);
    }
    assert_eq!(b.spark_count(), 0);
    assert_eq!(b.particle_count(), count);
}

#[test]
fn sparks_slow_down_as_they_fly() {
    let mut emitter = BurstEmitter::new(BURST_MAX_SPARKS, 1);
    emitter.emit(Vec3::ZERO, 600.0, false);
    let before: Vec<f32> = emitter.sparks().iter().map(|s| s.velocity.length()).collect();
    emitter.step(1.0 / 60.0);
    for (b, s) in before.iter().zip(emitter.sparks()) {
        assert!((s.velocity.length() - b * 0.98).abs() < 1e-2);
        assert!((s.opacity - 0.98).abs() < 1e-5);
    }
}

#[test]
fn repeated_bursts_stay_bounded() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::spatial(8),
        QualityTier::High,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    let count = b.particle_count();
    for _ in 0..50 {
        b.burst(Vec2::ZERO);
    }
    assert_eq!(b.spark_count(), BURST_MAX_SPARKS);
    assert_eq!(b.particle_count(), count);

    b.burst(Vec2::splat(f32::NAN));
    assert_eq!(b.spark_count(), BURST_MAX_SPARKS);
}

#[test]
fn flat_bursts_stay_on_the_canvas_plane() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::flat(800, 600, 12),
        QualityTier::Low,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    b.burst(Vec2::ZERO);
    assert!(b
        .sparks()
        .iter()
        .all(|s| s.position == Vec3::new(400.0, 300.0, 0.0) && s.velocity.z == 0.0));
    for _ in 0..10 {
        b.simulate(REUSE, 1.0 / 60.0, None);
    }
    assert!(b.sparks().iter().all(|s| s.position.z == 0.0));
}

#[test]
fn destroy_drops_sparks_and_ignores_later_bursts() {
    let mut b = ParticleBackdrop::new(
        FieldConfig::spatial(10),
        QualityTier::Low,
        Theme::Dark,
        NullRenderer::default(),
    )
    .expect("valid config");
    b.burst(Vec2::ZERO);
    assert!(b.spark_count() > 0);
    b.destroy();
    assert_eq!(b.spark_count(), 0);
    b.burst(Vec2::ZERO);
    assert_eq!(b.spark_count(), 0);
}
