//! Particle field, quality tier and frame pacing constants.
//!
//! These constants express intended behavior (tier budgets, thresholds,
//! clamp limits) and keep magic numbers out of the simulation code.

// Capability thresholds
pub const MOBILE_VIEWPORT_WIDTH_PX: f64 = 768.0;
pub const LOW_END_MAX_PARALLELISM: u32 = 3; // at or below → low tier
pub const HIGH_END_MIN_PARALLELISM: u32 = 8; // at or above → high tier

// Per-tier particle budgets
pub const LOW_PARTICLE_COUNT: usize = 30;
pub const MEDIUM_PARTICLE_COUNT: usize = 75;
pub const HIGH_PARTICLE_COUNT: usize = 150;

// Per-tier neighbor link distances (world units)
pub const LOW_LINK_DISTANCE: f32 = 100.0;
pub const MEDIUM_LINK_DISTANCE: f32 = 125.0;
pub const HIGH_LINK_DISTANCE: f32 = 150.0;

// Per-tier device pixel ratio caps
pub const LOW_PIXEL_RATIO_CAP: f32 = 1.0;
pub const MEDIUM_PIXEL_RATIO_CAP: f32 = 1.5;
pub const HIGH_PIXEL_RATIO_CAP: f32 = 2.0;

// Per-tier point size multipliers
pub const LOW_POINT_SCALE: f32 = 1.0;
pub const MEDIUM_POINT_SCALE: f32 = 1.5;
pub const HIGH_POINT_SCALE: f32 = 2.0;

// Frame pacing
pub const LOW_TIER_FRAME_STRIDE: u64 = 2; // simulate every 2nd frame
pub const MEDIUM_LINK_FRAME_STRIDE: u64 = 3; // rebuild links every 3rd frame
pub const FPS_WINDOW_MS: f64 = 1000.0;
pub const FPS_LOW_WATER: f64 = 30.0;
pub const MAX_STEP_SEC: f32 = 1.0 / 15.0;

// 3D field (GPU renderer)
pub const FIELD_HALF_WIDTH: f32 = 1000.0;
pub const FIELD_HALF_HEIGHT: f32 = 1000.0;
pub const FIELD_HALF_DEPTH: f32 = 500.0;
pub const FIELD_MAX_SPEED: f32 = 60.0; // units per second, per axis
pub const FIELD_DRIFT_FLOOR: f32 = 12.0;
pub const FIELD_SIZE_MIN: f32 = 1.0;
pub const FIELD_SIZE_MAX: f32 = 4.0;
pub const FIELD_ATTRACTOR_RADIUS: f32 = 200.0;
pub const FIELD_ATTRACTOR_STRENGTH: f32 = 240.0;

// 2D field (canvas fallback), canvas pixel units
pub const FLAT_MAX_SPEED: f32 = 30.0;
pub const FLAT_DRIFT_FLOOR: f32 = 10.0;
pub const FLAT_SIZE_MIN: f32 = 1.0;
pub const FLAT_SIZE_MAX: f32 = 3.0;
pub const FLAT_ATTRACTOR_RADIUS: f32 = 100.0;
pub const FLAT_ATTRACTOR_STRENGTH: f32 = 120.0;

// Shared motion tuning
pub const VELOCITY_DAMPING: f32 = 0.99; // per tick, strictly < 1
pub const REFLECT_RESTITUTION: f32 = 0.5;

// Pointer-press bursts
pub const BURST_SPARK_COUNT: usize = 20; // sparks per press
pub const BURST_MAX_SPARKS: usize = 200; // live sparks, oldest dropped first
pub const BURST_REFERENCE_FPS: f32 = 60.0; // decay rates below are per frame at this rate
pub const BURST_VELOCITY_DECAY: f32 = 0.98;
pub const BURST_FADE_PER_SEC: f32 = 1.2; // 0.02 opacity per reference frame
pub const BURST_SPARK_SIZE: f32 = 2.0;
pub const FIELD_BURST_SPEED: f32 = 600.0; // units per second, per axis
pub const FLAT_BURST_SPEED: f32 = 150.0; // px per second, per axis

// Camera
pub const CAMERA_Z: f32 = 1000.0;
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 3000.0;
pub const CAMERA_POINTER_TRAVEL: f32 = 50.0; // max eye offset toward the pointer
pub const CAMERA_EASE: f32 = 0.05; // per-frame blend toward target
pub const SCENE_YAW_PER_SEC: f32 = 0.06;

// Theme styling
pub const DARK_OPACITY: f32 = 0.8;
pub const LIGHT_OPACITY: f32 = 0.4;
pub const DARK_LINK_COLOR: [f32; 3] = [0.392, 1.0, 0.855]; // #64ffda
pub const LIGHT_LINK_COLOR: [f32; 3] = [0.388, 0.4, 0.945]; // #6366f1
pub const LINK_BASE_ALPHA: f32 = 0.3;

// Host page wiring
pub const CONTAINER_ID: &str = "particles-container";
pub const THEME_STORAGE_KEY: &str = "theme";
pub const LIGHT_THEME_CLASS: &str = "light-theme";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
