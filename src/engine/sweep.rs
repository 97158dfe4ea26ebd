//! The light sweep and its reveal state machine.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::layout::Glyph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Units per frame.
    pub velocity: f64,
    pub width: f64,
    /// Beam slant from vertical, degrees. Positive leans the top to the right.
    pub tilt_deg: f64,
    /// Distance past the right edge the beam travels before completing.
    pub overshoot: f64,
    /// Extra distance left of the viewport the beam starts from.
    #[serde(default)]
    pub lead_in: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    Sweeping,
    Complete,
}

/// Emitted exactly once, when the sweep leaves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealComplete;

#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    phase: SweepPhase,
    position: f64,
    velocity: f64,
    width: f64,
    slope: f64,
    overshoot: f64,
    /// Height at which the beam center equals `position`.
    pivot_y: f64,
}

impl Sweep {
    /// A fresh beam parked off-screen left. The slant is accounted for so no
    /// part of the quad is visible on the first frame.
    pub fn new(spec: &SweepSpec, viewport_height: f64) -> Self {
        let slope = spec.tilt_deg.to_radians().tan();
        let pivot_y = viewport_height / 2.0;
        let slant = slope.abs() * pivot_y;
        Sweep {
            phase: SweepPhase::Sweeping,
            position: -(spec.width / 2.0 + slant + spec.lead_in),
            velocity: spec.velocity,
            width: spec.width,
            slope,
            overshoot: spec.overshoot,
            pivot_y,
        }
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SweepPhase::Sweeping
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the beam one frame. No-op once complete.
    pub fn advance(&mut self) {
        if self.is_active() {
            self.position += self.velocity;
        }
    }

    /// Beam center line at height `y`.
    pub fn center_at(&self, y: f64) -> f64 {
        self.position + (self.pivot_y - y) * self.slope
    }

    pub fn leading_edge_at(&self, y: f64) -> f64 {
        self.center_at(y) + self.width / 2.0
    }

    /// Whether `p` lies inside the slanted beam quad.
    pub fn covers(&self, p: Point) -> bool {
        (p.x - self.center_at(p.y)).abs() < self.width / 2.0
    }

    /// Glow intensity in `0..=1` across the beam: transparent at both edges,
    /// brightest on the center line.
    pub fn intensity(&self, p: Point) -> f64 {
        let d = (p.x - self.center_at(p.y)).abs() / (self.width / 2.0);
        (1.0 - d).max(0.0)
    }

    /// Light every glyph under the beam. Returns how many were newly lit.
    pub fn illuminate(&self, glyphs: &mut [Glyph]) -> usize {
        if !self.is_active() {
            return 0;
        }
        let mut newly = 0;
        for glyph in glyphs.iter_mut().filter(|g| !g.is_blank() && !g.is_lit()) {
            if self.covers(Point::new(glyph.x, glyph.baseline)) {
                glyph.light();
                newly += 1;
            }
        }
        newly
    }

    /// Whether a lit glyph belongs on the persistent layer: the beam has
    /// passed it or the sweep is over.
    pub fn has_passed(&self, glyph: &Glyph) -> bool {
        !self.is_active() || glyph.x < self.leading_edge_at(glyph.baseline)
    }

    /// `Sweeping → Complete` once the beam is past `viewport_width +
    /// overshoot`. Fires at most once.
    pub fn settle(&mut self, viewport_width: f64) -> Option<RevealComplete> {
        if self.is_active() && self.position > viewport_width + self.overshoot {
            self.phase = SweepPhase::Complete;
            return Some(RevealComplete);
        }
        None
    }

    /// Follow a resized viewport. Position and phase are kept.
    pub fn set_pivot(&mut self, viewport_height: f64) {
        self.pivot_y = viewport_height / 2.0;
    }
}
