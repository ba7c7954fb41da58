use crate::constants::*;

/// Discrete performance level controlling simulation and render cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

/// Budget attached to a tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierProfile {
    pub particle_count: usize,
    pub link_distance: f32,
    pub pixel_ratio_cap: f32,
    pub point_scale: f32,
    pub links_enabled: bool,
}

impl QualityTier {
    pub fn profile(self) -> TierProfile {
        match self {
            Self::Low => TierProfile {
                particle_count: LOW_PARTICLE_COUNT,
                link_distance: LOW_LINK_DISTANCE,
                pixel_ratio_cap: LOW_PIXEL_RATIO_CAP,
                point_scale: LOW_POINT_SCALE,
                links_enabled: false,
            },
            Self::Medium => TierProfile {
                particle_count: MEDIUM_PARTICLE_COUNT,
                link_distance: MEDIUM_LINK_DISTANCE,
                pixel_ratio_cap: MEDIUM_PIXEL_RATIO_CAP,
                point_scale: MEDIUM_POINT_SCALE,
                links_enabled: true,
            },
            Self::High => TierProfile {
                particle_count: HIGH_PARTICLE_COUNT,
                link_distance: HIGH_LINK_DISTANCE,
                pixel_ratio_cap: HIGH_PIXEL_RATIO_CAP,
                point_scale: HIGH_POINT_SCALE,
                links_enabled: true,
            },
        }
    }

    /// One step down, saturating at `Low`.
    pub fn downgraded(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Raw capability readings. `None` means the query failed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CapabilityProbe {
    pub viewport_width: Option<f64>,
    pub parallelism: Option<u32>,
    pub gpu_available: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapabilityThresholds {
    pub mobile_width_px: f64,
    pub low_end_max_parallelism: u32,
    pub high_end_min_parallelism: u32,
}

impl Default for CapabilityThresholds {
    fn default() -> Self {
        Self {
            mobile_width_px: MOBILE_VIEWPORT_WIDTH_PX,
            low_end_max_parallelism: LOW_END_MAX_PARALLELISM,
            high_end_min_parallelism: HIGH_END_MIN_PARALLELISM,
        }
    }
}

/// Pick the starting tier. Any failed query falls to `Low`.
pub fn detect_tier(probe: &CapabilityProbe, thresholds: &CapabilityThresholds) -> QualityTier {
    let (Some(width), Some(cores)) = (probe.viewport_width, probe.parallelism) else {
        return QualityTier::Low;
    };
    if !probe.gpu_available
        || !width.is_finite()
        || width < thresholds.mobile_width_px
        || cores <= thresholds.low_end_max_parallelism
    {
        return QualityTier::Low;
    }
    if cores >= thresholds.high_end_min_parallelism {
        QualityTier::High
    } else {
        QualityTier::Medium
    }
}
