pub mod backdrop;
pub mod burst;
pub mod camera;
pub mod links;
pub mod pool;
pub mod scheduler;
pub mod theme;
pub mod tier;

pub use backdrop::*;
pub use burst::{BurstEmitter, Spark};
pub use camera::Camera;
pub use links::*;
pub use pool::*;
pub use scheduler::*;
pub use theme::*;
pub use tier::*;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");
