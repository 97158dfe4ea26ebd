//! Ambient backdrop behind the gear train.
//!
//! A faint grid and a broad soft glow both lean toward the pointer
//! (parallax), while a handful of thin light streaks bob in place. Streak
//! placement is seeded so the same config paints the same frames.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::geometry::{Point, Viewport};

/// Grid lines along each axis.
pub const GRID_DIVISIONS: f64 = 20.0;
/// Largest parallax shift, viewport units.
pub const PARALLAX_SHIFT: f64 = 4.0;
/// Streak length, viewport units.
pub const STREAK_LENGTH: f64 = 6.0;
/// Share of the gap to the pointer target closed each frame.
const POINTER_EASE: f64 = 0.08;
/// Streak drift amplitude as a fraction of the viewport, x then y.
const DRIFT: [f64; 2] = [0.02, 0.05];
const MAX_STREAK_OPACITY: f64 = 0.3;
/// Seconds for one sweep of a streak's drift, low and high bound.
const DRIFT_SECONDS: std::ops::Range<f64> = 5.0..10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSpec {
    pub enabled: bool,
    /// Lean the grid and glow toward the pointer.
    pub parallax: bool,
    pub particles: usize,
    pub seed: u64,
    /// Corner labels and stat readouts.
    pub accents: bool,
}

impl Default for BackdropSpec {
    fn default() -> Self {
        BackdropSpec {
            enabled: true,
            parallax: true,
            particles: 15,
            seed: 0x5eed,
            accents: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Rest position as a fraction of the viewport.
    pub anchor: [f64; 2],
    pub opacity: f64,
    /// Frames for one full there-and-back drift.
    pub period: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    particles: Vec<Particle>,
    /// Pointer target, `-1..=1` on both axes with the origin at the center.
    target: Point,
    /// Eased pointer the parallax actually follows.
    pointer: Point,
    parallax: bool,
    enabled: bool,
    accents: bool,
    fps: u32,
}

impl Backdrop {
    pub fn new(spec: &BackdropSpec, fps: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let count = if spec.enabled { spec.particles } else { 0 };
        let particles = (0..count)
            .map(|_| {
                let seconds = rng.random_range(DRIFT_SECONDS);
                Particle {
                    anchor: [rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)],
                    opacity: rng.random_range(0.0..MAX_STREAK_OPACITY),
                    period: ((seconds * 2.0 * fps as f64).round() as u64).max(1),
                }
            })
            .collect();
        Backdrop {
            particles,
            target: Point::default(),
            pointer: Point::default(),
            parallax: spec.enabled && spec.parallax,
            enabled: spec.enabled,
            accents: spec.accents,
            fps,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn shows_accents(&self) -> bool {
        self.accents
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Aim the parallax at a viewport point. Ignored with parallax off.
    pub fn point_at(&mut self, p: Point, viewport: Viewport) {
        if !self.parallax || viewport.is_empty() {
            return;
        }
        let c = viewport.center();
        self.target = Point::new(
            ((p.x - c.x) / c.x).clamp(-1.0, 1.0),
            ((p.y - c.y) / c.y).clamp(-1.0, 1.0),
        );
    }

    /// Ease the pointer one frame toward its target.
    pub fn advance(&mut self) {
        let gap = self.target.minus(self.pointer);
        self.pointer = self
            .pointer
            .offset(Point::new(gap.x * POINTER_EASE, gap.y * POINTER_EASE));
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Current parallax offset, viewport units.
    pub fn shift(&self) -> Point {
        Point::new(self.pointer.x * PARALLAX_SHIFT, self.pointer.y * PARALLAX_SHIFT)
    }

    pub fn glow_center(&self, viewport: Viewport) -> Point {
        viewport.center().offset(self.shift())
    }

    /// Whether a grid line crosses the cell centered at `p`.
    pub fn on_grid(&self, p: Point, viewport: Viewport, half_cell: Point) -> bool {
        let shift = self.shift();
        let near = |v: f64, step: f64, tolerance: f64| {
            let u = v.rem_euclid(step);
            u <= tolerance || step - u < tolerance
        };
        near(p.x - shift.x, viewport.width / GRID_DIVISIONS, half_cell.x)
            || near(p.y - shift.y, viewport.height / GRID_DIVISIONS, half_cell.y)
    }

    /// Streak centers at `frame` with their opacity. Each streak eases back
    /// and forth around its anchor.
    pub fn streaks(
        &self,
        frame: u64,
        viewport: Viewport,
    ) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.particles.iter().map(move |p| {
            let t = (frame % p.period) as f64 / p.period as f64;
            let s = -(TAU * t).cos();
            let center = Point::new(
                (p.anchor[0] + DRIFT[0] * s) * viewport.width,
                (p.anchor[1] + DRIFT[1] * s) * viewport.height,
            );
            (center, p.opacity)
        })
    }

    /// Seconds of animation at `frame`.
    pub fn seconds(&self, frame: u64) -> f64 {
        frame as f64 / self.fps.max(1) as f64
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
