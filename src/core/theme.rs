use super::backdrop::Backdrop;
use crate::constants::*;
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse the persisted preference string. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            // cyan-ish
            Self::Dark => Palette {
                min: Vec3::new(0.4, 0.8, 0.9),
                max: Vec3::new(1.0, 1.0, 1.0),
            },
            // purple-ish
            Self::Light => Palette {
                min: Vec3::new(0.4, 0.2, 0.8),
                max: Vec3::new(0.8, 0.5, 1.0),
            },
        }
    }

    pub fn style(self) -> ThemeStyle {
        match self {
            Self::Dark => ThemeStyle {
                opacity: DARK_OPACITY,
                link_color: DARK_LINK_COLOR,
            },
            Self::Light => ThemeStyle {
                opacity: LIGHT_OPACITY,
                link_color: LIGHT_LINK_COLOR,
            },
        }
    }
}

/// Per-channel RGB range particles draw their color from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub min: Vec3,
    pub max: Vec3,
}

impl Palette {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let t = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
        self.min + (self.max - self.min) * t
    }

    pub fn contains(&self, color: Vec3) -> bool {
        color.cmpge(self.min).all() && color.cmple(self.max).all()
    }
}

/// Overall opacity and link color; lighter pages get a fainter backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeStyle {
    pub opacity: f32,
    pub link_color: [f32; 3],
}

/// Forwards theme changes to the backdrop, skipping repeats.
#[derive(Debug, Default)]
pub struct ThemeBridge {
    applied: Option<Theme>,
}

impl ThemeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Option<Theme> {
        self.applied
    }

    /// Returns `true` when the backdrop was recolored.
    pub fn apply(&mut self, theme: Theme, backdrop: &mut dyn Backdrop) -> bool {
        if self.applied == Some(theme) {
            return false;
        }
        backdrop.recolor(theme);
        self.applied = Some(theme);
        log::info!("[theme] applied {}", theme.as_str());
        true
    }
}
