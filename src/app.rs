//! Top-level owner of the backdrop, its scheduler and the theme bridge.
//!
//! `App` is platform-neutral: the browser host feeds it display callbacks,
//! pointer positions, visibility and theme changes, and calls `stop` on
//! unload. Nothing here touches the DOM.

use crate::core::{
    detect_tier, Backdrop, CapabilityProbe, CapabilityThresholds, FrameScheduler, QualityTier,
    RunState, Theme, ThemeBridge,
};
use glam::Vec2;

/// What the host knows before deciding to start.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaunchEnv {
    pub reduced_motion: bool,
    pub probe: CapabilityProbe,
    pub theme: Theme,
}

pub struct App {
    scheduler: FrameScheduler,
    backdrop: Box<dyn Backdrop>,
    theme: ThemeBridge,
    last_step_ms: Option<f64>,
}

impl App {
    /// Startup gate. `None` means the backdrop must not be built at all
    /// (reduced motion requested); otherwise the starting tier.
    pub fn admit(env: &LaunchEnv) -> Option<QualityTier> {
        if env.reduced_motion {
            log::info!("[app] reduced motion preferred; backdrop disabled");
            return None;
        }
        let tier = detect_tier(&env.probe, &CapabilityThresholds::default());
        log::info!(
            "[tier] width={:?} cores={:?} gpu={} -> {}",
            env.probe.viewport_width,
            env.probe.parallelism,
            env.probe.gpu_available,
            tier.as_str()
        );
        Some(tier)
    }

    /// `admit` followed by `new`. `make_backdrop` only runs when admitted.
    /// The browser host splits the two because its renderer is built
    /// asynchronously in between.
    pub fn launch<F>(env: &LaunchEnv, make_backdrop: F) -> Option<Self>
    where
        F: FnOnce(QualityTier) -> Box<dyn Backdrop>,
    {
        let tier = Self::admit(env)?;
        Some(Self::new(make_backdrop(tier), env.theme))
    }

    /// Take ownership of a built backdrop and start scheduling.
    pub fn new(mut backdrop: Box<dyn Backdrop>, theme: Theme) -> Self {
        let mut bridge = ThemeBridge::new();
        bridge.apply(theme, backdrop.as_mut());
        let mut scheduler = FrameScheduler::new(backdrop.tier());
        scheduler.start();
        Self {
            scheduler,
            backdrop,
            theme: bridge,
            last_step_ms: None,
        }
    }

    /// One display callback. A failing tick stops the app instead of
    /// propagating. Returns whether another callback should be requested.
    pub fn frame(&mut self, now_ms: f64, pointer: Option<Vec2>) -> bool {
        if let Err(e) = self.tick(now_ms, pointer) {
            log::error!("[frame] tick failed, stopping backdrop: {:#}", e);
            self.stop();
        }
        self.scheduler.wants_frames()
    }

    fn tick(&mut self, now_ms: f64, pointer: Option<Vec2>) -> anyhow::Result<()> {
        if !now_ms.is_finite() {
            anyhow::bail!("non-finite frame timestamp");
        }
        if let Some(tier) = self.scheduler.observe(now_ms) {
            self.backdrop.set_tier(tier);
        }
        let Some(plan) = self.scheduler.plan() else {
            return Ok(());
        };
        let dt = match self.last_step_ms {
            Some(prev) => ((now_ms - prev).max(0.0) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_step_ms = Some(now_ms);
        self.backdrop.simulate(plan, dt, pointer);
        self.backdrop.render()
    }

    /// Pointer press. Ignored unless running.
    pub fn burst(&mut self, pointer: Vec2) {
        if self.scheduler.state() == RunState::Running {
            self.backdrop.burst(pointer);
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.scheduler.resume();
            self.last_step_ms = None;
        } else {
            self.scheduler.pause();
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.scheduler.state() == RunState::Stopped {
            return;
        }
        self.theme.apply(theme, self.backdrop.as_mut());
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.scheduler.state() != RunState::Stopped {
            self.backdrop.resize(width, height);
        }
    }

    /// Explicitly restore a tier after automatic downgrades.
    pub fn reset_quality(&mut self, tier: QualityTier) {
        if self.scheduler.state() == RunState::Stopped {
            return;
        }
        self.scheduler.reset_tier(tier);
        self.backdrop.set_tier(tier);
    }

    /// Terminal and idempotent: releases the backdrop once.
    pub fn stop(&mut self) {
        if self.scheduler.stop() {
            self.backdrop.destroy();
            log::info!("[app] stopped");
        }
    }

    pub fn state(&self) -> RunState {
        self.scheduler.state()
    }

    pub fn tier(&self) -> QualityTier {
        self.scheduler.tier()
    }

    pub fn particle_count(&self) -> usize {
        self.backdrop.particle_count()
    }

    pub fn spark_count(&self) -> usize {
        self.backdrop.spark_count()
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme.applied()
    }
}
