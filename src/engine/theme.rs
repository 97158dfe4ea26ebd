//! Styling record for the painter. The brass and steel looks differ only in
//! these values, never in code paths.

use serde::{Deserialize, Serialize};

use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Brass,
    Steel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToothProfile {
    /// Flat-topped teeth with vertical flanks.
    Square,
    /// Teeth narrowing toward the tip.
    Trapezoid,
}

impl ToothProfile {
    /// Tooth height factor in `0..=1` at `phase` within one tooth period,
    /// where `0.5` is the tooth center.
    pub fn height(self, phase: f64) -> f64 {
        let d = (phase - 0.5).abs();
        match self {
            ToothProfile::Square => {
                if d < 0.25 {
                    1.0
                } else {
                    0.0
                }
            }
            ToothProfile::Trapezoid => ((0.32 - d) / 0.14).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub face_light: Color,
    pub face_dark: Color,
    pub edge_highlight: Color,
    pub extrusion: Color,
    pub hub_light: Color,
    pub hub_dark: Color,
    pub bolt: Color,
    pub outline: Color,
    pub beam: Color,
    /// Peak beam opacity at its center line.
    pub beam_alpha: f64,
    pub beam_glyph: Color,
    pub lit: Color,
    pub glow: Color,
    pub overlay: Color,
    pub overlay_text: Color,
    pub tooth_profile: ToothProfile,
    /// Tooth height as a fraction of the outer radius.
    pub tooth_depth: f64,
    /// Number of stacked copies simulating depth.
    pub extrusion_layers: u16,
    /// Offset of each extrusion layer, viewport units.
    pub extrusion_step: [f64; 2],
    /// Spoke width as a fraction of the outer radius.
    pub spoke_width: f64,
    /// Hub radius as a fraction of the outer radius.
    pub hub_ratio: f64,
    /// Direction of the face gradient, radians. Light comes from here.
    pub light_angle: f64,
    pub grid: Color,
    pub grid_alpha: f64,
    /// Broad glow behind the gears.
    pub ambient: Color,
    pub ambient_alpha: f64,
    pub streak: Color,
    pub accent_dot: Color,
    pub accent_text: Color,
    pub stat_label: Color,
    pub stat_value: Color,
}

impl Theme {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Brass => Self::brass(),
            Variant::Steel => Self::steel(),
        }
    }

    pub fn brass() -> Self {
        Theme {
            background: Color::rgb(10, 9, 8),
            face_light: Color::rgb(196, 150, 72),
            face_dark: Color::rgb(92, 64, 26),
            edge_highlight: Color::rgb(240, 206, 140),
            extrusion: Color::rgb(60, 40, 16),
            hub_light: Color::rgb(222, 190, 120),
            hub_dark: Color::rgb(80, 56, 22),
            bolt: Color::rgb(38, 30, 20),
            outline: Color::rgb(90, 84, 76),
            beam: Color::rgb(255, 250, 235),
            beam_alpha: 0.22,
            beam_glyph: Color::rgb(255, 255, 255),
            lit: Color::rgb(255, 236, 200),
            glow: Color::rgb(255, 200, 120),
            overlay: Color::rgb(6, 6, 6),
            overlay_text: Color::rgb(200, 190, 170),
            tooth_profile: ToothProfile::Trapezoid,
            tooth_depth: 0.16,
            extrusion_layers: 3,
            extrusion_step: [0.8, 0.8],
            spoke_width: 0.14,
            hub_ratio: 0.24,
            light_angle: -2.35,
            grid: Color::rgb(255, 255, 255),
            grid_alpha: 0.05,
            ambient: Color::rgb(200, 120, 40),
            ambient_alpha: 0.12,
            streak: Color::rgb(255, 244, 220),
            accent_dot: Color::rgb(230, 170, 70),
            accent_text: Color::rgb(240, 230, 210),
            stat_label: Color::rgb(87, 80, 72),
            stat_value: Color::rgb(168, 160, 150),
        }
    }

    pub fn steel() -> Self {
        Theme {
            background: Color::rgb(6, 8, 12),
            face_light: Color::rgb(168, 178, 192),
            face_dark: Color::rgb(54, 62, 76),
            edge_highlight: Color::rgb(220, 232, 250),
            extrusion: Color::rgb(30, 36, 46),
            hub_light: Color::rgb(200, 210, 224),
            hub_dark: Color::rgb(44, 50, 62),
            bolt: Color::rgb(18, 22, 28),
            outline: Color::rgb(70, 80, 96),
            beam: Color::rgb(235, 245, 255),
            beam_alpha: 0.18,
            beam_glyph: Color::rgb(255, 255, 255),
            lit: Color::rgb(225, 240, 255),
            glow: Color::rgb(59, 130, 246),
            overlay: Color::rgb(4, 6, 10),
            overlay_text: Color::rgb(160, 180, 210),
            tooth_profile: ToothProfile::Square,
            tooth_depth: 0.13,
            extrusion_layers: 4,
            extrusion_step: [0.6, 1.0],
            spoke_width: 0.11,
            hub_ratio: 0.2,
            light_angle: -2.0,
            grid: Color::rgb(255, 255, 255),
            grid_alpha: 0.05,
            ambient: Color::rgb(37, 99, 235),
            ambient_alpha: 0.14,
            streak: Color::rgb(255, 255, 255),
            accent_dot: Color::rgb(59, 130, 246),
            accent_text: Color::rgb(255, 255, 255),
            stat_label: Color::rgb(82, 82, 91),
            stat_value: Color::rgb(161, 161, 170),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_peak_at_tooth_center() {
        for profile in [ToothProfile::Square, ToothProfile::Trapezoid] {
            assert_eq!(profile.height(0.5), 1.0);
            assert_eq!(profile.height(0.0), 0.0);
        }
        let mid_flank = ToothProfile::Trapezoid.height(0.25);
        assert!(mid_flank > 0.0 && mid_flank < 1.0);
    }
}
