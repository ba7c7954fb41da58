// Host-side tests for capability detection and tier budgets.

use portfolio_particles::constants::*;
use portfolio_particles::core::*;

fn probe(width: f64, cores: u32, gpu: bool) -> CapabilityProbe {
    CapabilityProbe {
        viewport_width: Some(width),
        parallelism: Some(cores),
        gpu_available: gpu,
    }
}

fn detect(p: CapabilityProbe) -> QualityTier {
    detect_tier(&p, &CapabilityThresholds::default())
}

#[test]
fn desktop_with_many_cores_is_high() {
    assert_eq!(detect(probe(1920.0, 8, true)), QualityTier::High);
    assert_eq!(detect(probe(1440.0, 16, true)), QualityTier::High);
}

#[test]
fn mid_range_desktop_is_medium() {
    assert_eq!(detect(probe(1280.0, 4, true)), QualityTier::Medium);
    assert_eq!(detect(probe(768.0, 7, true)), QualityTier::Medium);
}

#[test]
fn phones_and_weak_machines_are_low() {
    assert_eq!(detect(probe(390.0, 8, true)), QualityTier::Low);
    assert_eq!(detect(probe(767.9, 8, true)), QualityTier::Low);
    assert_eq!(detect(probe(1920.0, 3, true)), QualityTier::Low);
    assert_eq!(detect(probe(1920.0, 2, true)), QualityTier::Low);
}

#[test]
fn missing_gpu_is_low() {
    assert_eq!(detect(probe(1920.0, 16, false)), QualityTier::Low);
}

#[test]
fn failed_queries_fall_back_to_low() {
    assert_eq!(detect(CapabilityProbe::default()), QualityTier::Low);
    let no_cores = CapabilityProbe {
        parallelism: None,
        ..probe(1920.0, 8, true)
    };
    assert_eq!(detect(no_cores), QualityTier::Low);
    let no_width = CapabilityProbe {
        viewport_width: None,
        ..probe(1920.0, 8, true)
    };
    assert_eq!(detect(no_width), QualityTier::Low);
    assert_eq!(detect(probe(f64::NAN, 8, true)), QualityTier::Low);
}

#[test]
fn custom_thresholds_are_honored() {
    let thresholds = CapabilityThresholds {
        mobile_width_px: 1000.0,
        low_end_max_parallelism: 1,
        high_end_min_parallelism: 4,
    };
    assert_eq!(detect_tier(&probe(900.0, 8, true), &thresholds), QualityTier::Low);
    assert_eq!(detect_tier(&probe(1200.0, 2, true), &thresholds), QualityTier::Medium);
    assert_eq!(detect_tier(&probe(1200.0, 4, true), &thresholds), QualityTier::High);
}

#[test]
fn profiles_match_tier_table() {
    let low = QualityTier::Low.profile();
    assert_eq!(low.particle_count, LOW_PARTICLE_COUNT);
    assert!(!low.links_enabled);
    assert_eq!(low.pixel_ratio_cap, 1.0);

    let medium = QualityTier::Medium.profile();
    assert_eq!(medium.particle_count, 75);
    assert_eq!(medium.link_distance, 125.0);
    assert!(medium.links_enabled);

    let high = QualityTier::High.profile();
    assert_eq!(high.particle_count, 150);
    assert_eq!(high.link_distance, 150.0);
    assert_eq!(high.pixel_ratio_cap, 2.0);
}

#[test]
fn budgets_grow_with_tier() {
    let tiers = [QualityTier::Low, QualityTier::Medium, QualityTier::High];
    for w in tiers.windows(2) {
        let (lo, hi) = (w[0].profile(), w[1].profile());
        assert!(w[0] < w[1]);
        assert!(lo.particle_count < hi.particle_count);
        assert!(lo.link_distance < hi.link_distance);
        assert!(lo.pixel_ratio_cap < hi.pixel_ratio_cap);
        assert!(lo.point_scale < hi.point_scale);
    }
}

#[test]
fn downgrade_saturates_at_low() {
    assert_eq!(QualityTier::High.downgraded(), QualityTier::Medium);
    assert_eq!(QualityTier::Medium.downgraded(), QualityTier::Low);
    assert_eq!(QualityTier::Low.downgraded(), QualityTier::Low);
}
