// Host-side tests for theme parsing, palettes and the theme bridge.

use glam::Vec2;
use portfolio_particles::constants::*;
use portfolio_particles::core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct RecolorCounter {
    recolors: Vec<Theme>,
}

impl Backdrop for RecolorCounter {
    fn simulate(&mut self, _plan: FramePlan, _dt: f32, _pointer: Option<Vec2>) {}
    fn render(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
    fn burst(&mut self, _pointer: Vec2) {}
    fn recolor(&mut self, theme: Theme) {
        self.recolors.push(theme);
    }
    fn set_tier(&mut self, _tier: QualityTier) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn destroy(&mut self) {}
    fn particle_count(&self) -> usize {
        0
    }
    fn spark_count(&self) -> usize {
        0
    }
    fn tier(&self) -> QualityTier {
        QualityTier::Low
    }
}

#[test]
fn parses_stored_preference() {
    assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse("light"), Some(Theme::Light));
    assert_eq!(Theme::parse(" light\n"), Some(Theme::Light));
    assert_eq!(Theme::parse("sepia"), None);
    assert_eq!(Theme::parse(""), None);
    assert_eq!(Theme::default(), Theme::Dark);
}

#[test]
fn as_str_round_trips_through_parse() {
    for theme in [Theme::Dark, Theme::Light] {
        assert_eq!(Theme::parse(theme.as_str()), Some(theme));
    }
}

#[test]
fn palette_samples_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(11);
    for theme in [Theme::Dark, Theme::Light] {
        let palette = theme.palette();
        for _ in 0..500 {
            assert!(palette.contains(palette.sample(&mut rng)));
        }
    }
}

#[test]
fn dark_and_light_palettes_do_not_overlap_on_green() {
    let dark = Theme::Dark.palette();
    let light = Theme::Light.palette();
    assert!(light.max.y < dark.min.y);
}

#[test]
fn light_theme_is_fainter() {
    let dark = Theme::Dark.style();
    let light = Theme::Light.style();
    assert_eq!(dark.opacity, DARK_OPACITY);
    assert_eq!(light.opacity, LIGHT_OPACITY);
    assert!(light.opacity < dark.opacity);
    assert_eq!(dark.link_color, DARK_LINK_COLOR);
    assert_eq!(light.link_color, LIGHT_LINK_COLOR);
}

#[test]
fn bridge_forwards_changes_and_skips_repeats() {
    let mut bridge = ThemeBridge::new();
    let mut backdrop = RecolorCounter::default();
    assert_eq!(bridge.applied(), None);

    assert!(bridge.apply(Theme::Dark, &mut backdrop));
    assert!(!bridge.apply(Theme::Dark, &mut backdrop));
    assert!(bridge.apply(Theme::Light, &mut backdrop));
    assert!(!bridge.apply(Theme::Light, &mut backdrop));
    assert!(bridge.apply(Theme::Dark, &mut backdrop));

    assert_eq!(backdrop.recolors, vec![Theme::Dark, Theme::Light, Theme::Dark]);
    assert_eq!(bridge.applied(), Some(Theme::Dark));
}
