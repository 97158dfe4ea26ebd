//! Title sequence configuration.
//!
//! Loaded from JSON. Every field has a default, so an empty object (or no
//! file at all) yields the stock three-gear brass sequence.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::backdrop::BackdropSpec;
use crate::engine::gears::{DrivenSpec, DriverSpec, SizeClass};
use crate::engine::geometry::Viewport;
use crate::engine::sweep::SweepSpec;
use crate::engine::theme::{Theme, Variant};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("viewport is empty ({width}x{height})")]
    EmptyViewport { width: f64, height: f64 },

    #[error("driver radius must be positive, got {0}")]
    BadRadius(f64),

    #[error("mesh factor must be in (0, 1), got {0}")]
    BadMeshFactor(f64),

    #[error("expected exactly {expected} driven gears, got {got}")]
    DrivenCount { expected: usize, got: usize },

    #[error("driven gear {0} cannot be classed large; only the driver is large")]
    LargeDriven(usize),

    #[error("sweep velocity must be positive, got {0}")]
    BadVelocity(f64),

    #[error("sweep width must be positive, got {0}")]
    BadSweepWidth(f64),

    #[error("sweep tilt must be strictly between -90 and 90 degrees, got {0}")]
    BadTilt(f64),

    #[error("frame rate must be at least 1")]
    ZeroFps,

    #[error("font scale must be at least 1")]
    ZeroFontScale,
}

/// Number of driven gears meshed against the driver.
pub const DRIVEN_GEARS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub variant: Variant,
    /// Full theme override; when absent the variant's preset is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    pub tracking_ratio: f64,
    pub font_scale: u16,
    pub fps: u32,
    pub gears: GearsConfig,
    pub sweep: SweepSpec,
    pub backdrop: BackdropSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearsConfig {
    pub driver: DriverSpec,
    pub driven: Vec<DrivenSpec>,
    #[serde(default = "default_mesh_factor")]
    pub mesh_factor: f64,
}

fn default_mesh_factor() -> f64 {
    0.97
}

fn teeth(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

impl Default for GearsConfig {
    fn default() -> Self {
        GearsConfig {
            driver: DriverSpec {
                radius: 26.0,
                teeth: teeth(18),
                speed: 0.015,
                anchor: [0.5, 0.5],
                bolts: None,
            },
            driven: vec![
                DrivenSpec {
                    teeth: teeth(12),
                    angle_deg: 225.0,
                    size: SizeClass::Medium,
                    bolts: None,
                },
                DrivenSpec {
                    teeth: teeth(9),
                    angle_deg: 20.0,
                    size: SizeClass::Small,
                    bolts: None,
                },
            ],
            mesh_factor: default_mesh_factor(),
        }
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        TitleConfig {
            variant: Variant::default(),
            theme: None,
            tracking_ratio: 0.1,
            font_scale: 1,
            fps: 30,
            gears: GearsConfig::default(),
            sweep: SweepSpec {
                velocity: 1.5,
                width: 16.0,
                tilt_deg: 14.0,
                overshoot: 24.0,
                lead_in: 4.0,
            },
            backdrop: BackdropSpec::default(),
        }
    }
}

impl TitleConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist and parse. The default location is
    /// optional: a missing file gives defaults and an invalid one is logged
    /// and ignored.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => Self::load_default(),
        };
        Ok(config)
    }

    fn load_default() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("invalid config {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("kinetic-title");
        path.push("config.json");
        path
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .clone()
            .unwrap_or_else(|| Theme::for_variant(self.variant))
    }

    /// Reject values the engine would divide by, or that would keep the
    /// sweep from ever terminating.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gears = &self.gears;
        if !(gears.driver.radius > 0.0) {
            return Err(ConfigError::BadRadius(gears.driver.radius));
        }
        if !(gears.mesh_factor > 0.0 && gears.mesh_factor < 1.0) {
            return Err(ConfigError::BadMeshFactor(gears.mesh_factor));
        }
        if gears.driven.len() != DRIVEN_GEARS {
            return Err(ConfigError::DrivenCount {
                expected: DRIVEN_GEARS,
                got: gears.driven.len(),
            });
        }
        if let Some(i) = gears.driven.iter().position(|d| d.size == SizeClass::Large) {
            return Err(ConfigError::LargeDriven(i));
        }
        if !(self.sweep.velocity > 0.0) {
            return Err(ConfigError::BadVelocity(self.sweep.velocity));
        }
        if !(self.sweep.width > 0.0) {
            return Err(ConfigError::BadSweepWidth(self.sweep.width));
        }
        if !(self.sweep.tilt_deg.abs() < 90.0) {
            return Err(ConfigError::BadTilt(self.sweep.tilt_deg));
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.font_scale == 0 {
            return Err(ConfigError::ZeroFontScale);
        }
        Ok(())
    }
}

pub fn validate_viewport(viewport: Viewport) -> Result<(), ConfigError> {
    if viewport.is_empty() {
        return Err(ConfigError::EmptyViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TitleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let config: TitleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.gears.driven.len(), 2);
    }

    #[test]
    fn zero_teeth_is_rejected_by_the_parser() {
        let json = r#"{"gears": {"driver": {"radius": 10, "teeth": 0, "speed": 0.1},
                                  "driven": []}}"#;
        assert!(serde_json::from_str::<TitleConfig>(json).is_err());
    }

    #[test]
    fn non_positive_velocity_is_rejected() {
        let mut config = TitleConfig::default();
        config.sweep.velocity = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::BadVelocity(0.0)));
    }

    #[test]
    fn mesh_factor_must_stay_in_range() {
        let mut config = TitleConfig::default();
        config.gears.mesh_factor = 1.2;
        assert_eq!(config.validate(), Err(ConfigError::BadMeshFactor(1.2)));
    }

    #[test]
    fn tangent_gears_are_rejected() {
        let mut config = TitleConfig::default();
        config.gears.mesh_factor = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::BadMeshFactor(1.0)));
        config.gears.mesh_factor = 0.999;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn only_the_driver_may_be_large() {
        let mut config = TitleConfig::default();
        config.gears.driven[1].size = SizeClass::Large;
        assert_eq!(config.validate(), Err(ConfigError::LargeDriven(1)));
    }

    #[test]
    fn train_needs_two_driven_gears() {
        let mut config = TitleConfig::default();
        config.gears.driven.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DrivenCount {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn zero_viewport_is_rejected() {
        assert!(validate_viewport(Viewport::new(0.0, 600.0)).is_err());
        assert!(validate_viewport(Viewport::new(1000.0, 600.0)).is_ok());
    }

    #[test]
    fn variant_selects_theme() {
        let config: TitleConfig = serde_json::from_str(r#"{"variant": "steel"}"#).unwrap();
        assert_eq!(config.theme(), Theme::steel());
    }
}
