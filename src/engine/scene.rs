//! Simulation state for one mount of the title sequence.
//!
//! All mutable state (gear rotations, sweep position, lit flags, backdrop
//! pointer) lives here and only changes through `tick`, `resize`, `retitle`
//! and `point_at`.

use crate::config::TitleConfig;

use super::backdrop::Backdrop;
use super::font::BlockFont;
use super::gears::GearTrain;
use super::geometry::{Point, Viewport};
use super::layout::{carry_lit, layout, Glyph};
use super::sweep::{RevealComplete, Sweep};

#[derive(Debug, Clone)]
pub struct TitleScene {
    pub viewport: Viewport,
    pub title: String,
    pub glyphs: Vec<Glyph>,
    pub train: GearTrain,
    pub sweep: Sweep,
    pub font: BlockFont,
    pub backdrop: Backdrop,
    tracking_ratio: f64,
    anchor: [f64; 2],
    /// Frames simulated since mount.
    pub frame: u64,
}

impl TitleScene {
    /// Lay out `title` and solve the gear train. `config` must be validated.
    pub fn new(config: &TitleConfig, title: String, viewport: Viewport) -> Self {
        let font = BlockFont::new(config.font_scale);
        let anchor = config.gears.driver.anchor;
        let glyphs = layout(&title, &font, config.tracking_ratio, viewport);
        let train = GearTrain::solve(
            &config.gears.driver,
            driver_center(anchor, viewport),
            &config.gears.driven,
            config.gears.mesh_factor,
        );
        TitleScene {
            viewport,
            title,
            glyphs,
            train,
            sweep: Sweep::new(&config.sweep, viewport.height),
            font,
            backdrop: Backdrop::new(&config.backdrop, config.fps),
            tracking_ratio: config.tracking_ratio,
            anchor,
            frame: 0,
        }
    }

    /// Advance one frame: turn the gears, move the beam, light what it
    /// touches, then check for completion.
    pub fn tick(&mut self) -> Option<RevealComplete> {
        self.frame += 1;
        self.train.advance();
        self.backdrop.advance();
        if !self.sweep.is_active() {
            return None;
        }
        self.sweep.advance();
        self.sweep.illuminate(&mut self.glyphs);
        self.sweep.settle(self.viewport.width)
    }

    /// Re-run geometry for a new viewport. Lit flags, sweep progress and
    /// rotations carry over.
    pub fn resize(&mut self, viewport: Viewport) {
        let mut glyphs = layout(&self.title, &self.font, self.tracking_ratio, viewport);
        carry_lit(&mut glyphs, &self.glyphs);
        self.glyphs = glyphs;
        self.train.recenter(driver_center(self.anchor, viewport));
        self.sweep.set_pivot(viewport.height);
        self.viewport = viewport;
    }

    /// Swap in a new headline: fresh glyphs and a fresh sweep, gears keep
    /// turning.
    pub fn retitle(&mut self, config: &TitleConfig, title: String) {
        self.glyphs = layout(&title, &self.font, self.tracking_ratio, self.viewport);
        self.title = title;
        self.sweep = Sweep::new(&config.sweep, self.viewport.height);
    }

    /// Lean the backdrop toward a viewport point.
    pub fn point_at(&mut self, p: Point) {
        self.backdrop.point_at(p, self.viewport);
    }

    pub fn lit_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.is_lit()).count()
    }
}

fn driver_center(anchor: [f64; 2], viewport: Viewport) -> Point {
    Point::new(anchor[0] * viewport.width, anchor[1] * viewport.height)
}
