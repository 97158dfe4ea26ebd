//! Engine: the animation core.
//!
//! Owns one mount of the title sequence: layout, gear train, sweep and lit
//! flags. Each frame is a synchronous `tick` (simulation) followed by
//! `paint` (draw ops). The engine never deals with terminals, ANSI codes or
//! grids; see `renderer` and `player` for that.

pub mod backdrop;
pub mod font;
pub mod gears;
pub mod geometry;
pub mod layout;
pub mod paint;
pub mod scene;
pub mod sweep;
pub mod theme;

use crate::config::{validate_viewport, ConfigError, TitleConfig};
use crate::content::{self, Caption, HeroContent};
use crate::types::ResolvedScene;

use geometry::{Point, Viewport};
use scene::TitleScene;
use sweep::RevealComplete;
use theme::Theme;

pub struct Engine {
    config: TitleConfig,
    theme: Theme,
    content: Option<HeroContent>,
    scene: TitleScene,
    loading: bool,
    /// Drives the loading overlay's progress bar.
    loading_frames: u64,
    revealed: bool,
}

/// A headless run: the painted frames plus where the reveal completed.
pub struct Compiled {
    pub scenes: Vec<ResolvedScene>,
    pub reveal_frame: Option<usize>,
}

impl Engine {
    /// Validate the configuration, lay out the headline and solve the gear
    /// train.
    pub fn mount(
        config: TitleConfig,
        content: Option<HeroContent>,
        viewport: Viewport,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_viewport(viewport)?;

        let title = content::display_title(content.as_ref());
        log::debug!(
            "mounting \"{title}\" at {}x{} ({:?})",
            viewport.width,
            viewport.height,
            config.variant
        );
        let scene = TitleScene::new(&config, title, viewport);
        Ok(Engine {
            theme: config.theme(),
            config,
            content,
            scene,
            loading: false,
            loading_frames: 0,
            revealed: false,
        })
    }

    /// Advance the simulation one frame. Returns the reveal notification on
    /// the one frame the sweep completes. Suspended while loading.
    pub fn tick(&mut self) -> Option<RevealComplete> {
        if self.loading {
            self.loading_frames += 1;
            return None;
        }
        let event = self.scene.tick();
        if event.is_some() {
            self.revealed = true;
            log::info!(
                "reveal complete after {} frames ({} glyphs lit)",
                self.scene.frame,
                self.scene.lit_count()
            );
        }
        event
    }

    /// Draw the current state.
    pub fn paint(&self) -> ResolvedScene {
        let overlay = self.loading.then_some(self.loading_frames);
        paint::paint(&self.scene, &self.theme, overlay)
    }

    /// One full frame: tick, then paint.
    pub fn frame(&mut self) -> (ResolvedScene, Option<RevealComplete>) {
        let event = self.tick();
        (self.paint(), event)
    }

    /// Recompute geometry for a new viewport. Progress is kept.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        validate_viewport(viewport)?;
        log::debug!("resize to {}x{}", viewport.width, viewport.height);
        self.scene.resize(viewport);
        Ok(())
    }

    /// Pointer position on the canvas, viewport units.
    pub fn point_at(&mut self, p: Point) {
        self.scene.point_at(p);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replace the copy. A different headline restarts the reveal.
    pub fn set_content(&mut self, content: Option<HeroContent>) {
        let title = content::display_title(content.as_ref());
        self.content = content;
        if title != self.scene.title {
            log::debug!("retitle to \"{title}\"");
            self.scene.retitle(&self.config, title);
            self.revealed = false;
        }
    }

    pub fn reveal_complete(&self) -> bool {
        self.revealed
    }

    /// Caption block shown by the host once the reveal is done.
    pub fn caption(&self) -> Option<Caption> {
        self.revealed
            .then(|| content::caption(self.content.as_ref()))
    }

    /// Reset calibration: rebuild the sequence from its initial state.
    pub fn reset(&mut self) {
        log::debug!("reset calibration");
        let title = content::display_title(self.content.as_ref());
        let mut scene = TitleScene::new(&self.config, title, self.scene.viewport);
        // The pointer has not moved.
        scene.backdrop = self.scene.backdrop.clone();
        self.scene = scene;
        self.revealed = false;
    }

    pub fn scene(&self) -> &TitleScene {
        &self.scene
    }

    /// Render `frames` frames headlessly.
    pub fn compile(
        config: TitleConfig,
        content: Option<HeroContent>,
        viewport: Viewport,
        frames: usize,
    ) -> Result<Compiled, ConfigError> {
        let mut engine = Engine::mount(config, content, viewport)?;
        let mut scenes = Vec::with_capacity(frames);
        let mut reveal_frame = None;
        for index in 0..frames {
            let (scene, event) = engine.frame();
            if event.is_some() {
                reveal_frame = Some(index);
            }
            scenes.push(scene);
        }
        Ok(Compiled {
            scenes,
            reveal_frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::mount(TitleConfig::default(), None, Viewport::from_cells(100, 30)).unwrap()
    }

    #[test]
    fn mount_rejects_empty_viewport() {
        let err = Engine::mount(TitleConfig::default(), None, Viewport::new(0.0, 0.0));
        assert!(matches!(err, Err(ConfigError::EmptyViewport { .. })));
    }

    #[test]
    fn caption_only_after_reveal() {
        let mut e = engine();
        assert!(e.caption().is_none());
        while e.tick().is_none() {}
        assert!(e.reveal_complete());
        assert_eq!(e.caption().unwrap().cta_text, "ENTER");
    }

    #[test]
    fn loading_suspends_the_sweep() {
        let mut e = engine();
        e.set_loading(true);
        let position = e.scene().sweep.position();
        for _ in 0..10 {
            e.tick();
        }
        assert_eq!(e.scene().sweep.position(), position);
        assert_eq!(e.scene().frame, 0);
    }

    #[test]
    fn reset_restarts_from_initial_state() {
        let mut e = engine();
        while e.tick().is_none() {}
        e.reset();
        assert!(!e.reveal_complete());
        assert!(e.scene().sweep.is_active());
        assert_eq!(e.scene().frame, 0);
        assert_eq!(e.scene().train.driver().rotation, 0.0);
        assert_eq!(e.scene().lit_count(), 0);
    }

    #[test]
    fn new_headline_restarts_reveal() {
        let mut e = engine();
        while e.tick().is_none() {}
        e.set_content(Some(HeroContent {
            headline: Some("Pure velocity".into()),
            ..Default::default()
        }));
        assert!(!e.reveal_complete());
        assert_eq!(e.scene().title, "PURE VELOCITY");
    }

    #[test]
    fn pointer_leans_the_backdrop_and_survives_reset() {
        let mut e = engine();
        e.point_at(Point::new(0.0, 0.0));
        for _ in 0..100 {
            e.tick();
        }
        let pointer = e.scene().backdrop.pointer();
        assert!(pointer.x < -0.9 && pointer.y < -0.9);
        e.reset();
        assert_eq!(e.scene().backdrop.pointer(), pointer);
    }

    #[test]
    fn resize_to_zero_is_refused_and_harmless() {
        let mut e = engine();
        let before = e.scene().viewport;
        assert!(e.resize(Viewport::new(0.0, 10.0)).is_err());
        assert_eq!(e.scene().viewport, before);
    }
}
