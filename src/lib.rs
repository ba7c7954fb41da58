//! Decorative particle backdrop for a portfolio page.
//!
//! The simulation, tiering, scheduling and theme handling are plain Rust and
//! build on every target. The browser host (DOM wiring, WebGPU and 2D canvas
//! renderers, the animation-frame loop) only exists on `wasm32`.

pub mod app;
pub mod constants;
pub mod core;
pub mod error;
pub mod input;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod render;

pub use app::{App, LaunchEnv};
pub use error::BackdropError;
