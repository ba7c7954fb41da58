//! Frame pacing: run state, tier-aware throttling and frame-rate feedback.
//!
//! The scheduler does no work itself. Each display callback asks it for a
//! [`FramePlan`] and reports the callback time; the owner performs the plan.

use super::tier::QualityTier;
use crate::constants::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Work for one display frame: always step and render, optionally rebuild
/// neighbor links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePlan {
    pub build_links: bool,
}

/// Counts callbacks over ~1 s windows and reports the observed rate.
#[derive(Clone, Debug)]
pub struct FpsMonitor {
    window_ms: f64,
    window_start: Option<f64>,
    frames: u32,
    last_fps: Option<f64>,
}

impl FpsMonitor {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: None,
            frames: 0,
            last_fps: None,
        }
    }

    /// Record one callback at `now_ms`. Returns the fps of a window that just
    /// closed.
    pub fn record(&mut self, now_ms: f64) -> Option<f64> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now_ms);
            self.frames = 0;
            return None;
        };
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed < self.window_ms {
            return None;
        }
        let fps = self.frames as f64 * 1000.0 / elapsed;
        self.window_start = Some(now_ms);
        self.frames = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Drop the current window; the next `record` opens a fresh one.
    pub fn restart(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

pub struct FrameScheduler {
    state: RunState,
    tier: QualityTier,
    frame_counter: u64,
    fps: FpsMonitor,
    low_water_fps: f64,
}

impl FrameScheduler {
    pub fn new(tier: QualityTier) -> Self {
        Self {
            state: RunState::Idle,
            tier,
            frame_counter: 0,
            fps: FpsMonitor::new(FPS_WINDOW_MS),
            low_water_fps: FPS_LOW_WATER,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.fps.last_fps()
    }

    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            self.fps.restart();
        }
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
            // hidden time must not read as a slow window
            self.fps.restart();
        }
    }

    /// Terminal. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.state == RunState::Stopped {
            return false;
        }
        self.state = RunState::Stopped;
        true
    }

    /// Whether the host should keep requesting display callbacks.
    pub fn wants_frames(&self) -> bool {
        matches!(self.state, RunState::Running | RunState::Paused)
    }

    /// Advance the frame counter and decide this callback's work.
    pub fn plan(&mut self) -> Option<FramePlan> {
        if self.state != RunState::Running {
            return None;
        }
        self.frame_counter += 1;
        let n = self.frame_counter;
        match self.tier {
            QualityTier::Low => (n % LOW_TIER_FRAME_STRIDE == 0).then_some(FramePlan {
                build_links: false,
            }),
            QualityTier::Medium => Some(FramePlan {
                build_links: n % MEDIUM_LINK_FRAME_STRIDE == 0,
            }),
            QualityTier::High => Some(FramePlan { build_links: true }),
        }
    }

    /// Feed the callback time into the fps monitor. Returns the new tier when
    /// a closed window fell below the low-water mark. Tiers only go down.
    pub fn observe(&mut self, now_ms: f64) -> Option<QualityTier> {
        if self.state != RunState::Running {
            return None;
        }
        let fps = self.fps.record(now_ms)?;
        if fps >= self.low_water_fps || self.tier == QualityTier::Low {
            return None;
        }
        let from = self.tier;
        self.tier = from.downgraded();
        log::info!(
            "[tier] {:.1} fps below {:.0}; {} -> {}",
            fps,
            self.low_water_fps,
            from.as_str(),
            self.tier.as_str()
        );
        Some(self.tier)
    }

    /// Explicit tier override, the only way back up after a downgrade.
    pub fn reset_tier(&mut self, tier: QualityTier) {
        self.tier = tier;
        self.frame_counter = 0;
        self.fps.restart();
    }
}
