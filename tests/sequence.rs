//! End-to-end behaviour of the title sequence through the public API.

use std::num::NonZeroU32;

use kinetic_title::config::TitleConfig;
use kinetic_title::content::HeroContent;
use kinetic_title::engine::font::BlockFont;
use kinetic_title::engine::gears::{DrivenSpec, DriverSpec, GearTrain, SizeClass};
use kinetic_title::engine::geometry::{Point, Viewport};
use kinetic_title::engine::layout::{layout, Glyph};
use kinetic_title::engine::Engine;
use kinetic_title::renderer::Renderer;
use kinetic_title::types::Frame;

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn lit_flags(engine: &Engine) -> Vec<bool> {
    engine.scene().glyphs.iter().map(Glyph::is_lit).collect()
}

#[test]
fn pitch_holds_for_many_tooth_pairs() {
    for driver_teeth in [6, 12, 18, 24, 40] {
        for driven_teeth in [5, 8, 9, 12, 30] {
            let driver = DriverSpec {
                radius: 73.0,
                teeth: nz(driver_teeth),
                speed: 0.03,
                anchor: [0.5, 0.5],
                bolts: None,
            };
            let driven = [DrivenSpec {
                teeth: nz(driven_teeth),
                angle_deg: 140.0,
                size: SizeClass::Small,
                bolts: Some(2),
            }];
            let train = GearTrain::solve(&driver, Point::new(0.0, 0.0), &driven, 0.97);
            let [a, b] = train.gears() else {
                panic!("expected two gears");
            };
            let lhs = b.radius / driven_teeth as f64;
            let rhs = a.radius / driver_teeth as f64;
            assert!((lhs - rhs).abs() < 1e-9, "{driver_teeth}/{driven_teeth}");
            assert!(b.speed.signum() != a.speed.signum());
            assert!(
                (b.speed.abs() * driven_teeth as f64 - a.speed.abs() * driver_teeth as f64).abs()
                    < 1e-9
            );
        }
    }
}

#[test]
fn mesh_scenario_from_1000_by_600() {
    let mut config = TitleConfig::default();
    config.gears.driver.radius = 100.0;
    config.gears.driver.teeth = nz(18);
    config.gears.driven[0] = DrivenSpec {
        teeth: nz(12),
        angle_deg: 225.0,
        size: SizeClass::Medium,
        bolts: None,
    };

    let engine = Engine::mount(config.clone(), None, Viewport::new(1000.0, 600.0)).unwrap();
    let gears = engine.scene().train.gears();
    let driver = &gears[0];
    let driven = &gears[1];

    assert_eq!(driver.center, Point::new(500.0, 300.0));
    assert!((driven.radius - 66.67).abs() < 0.01);

    let expected = (100.0 + 100.0 * 12.0 / 18.0) * config.gears.mesh_factor;
    let rel = driven.center.minus(driver.center);
    assert!((rel.length() - expected).abs() < 1e-9);
    let dir = Point::polar(225f64.to_radians(), 1.0);
    assert!((rel.x / rel.length() - dir.x).abs() < 1e-9);
    assert!((rel.y / rel.length() - dir.y).abs() < 1e-9);
}

#[test]
fn layout_is_deterministic() {
    let font = BlockFont::new(1);
    let viewport = Viewport::new(1920.0, 1080.0);
    let a = layout("ABC", &font, 0.1, viewport);
    let b = layout("ABC", &font, 0.1, viewport);
    assert_eq!(a, b);
    assert!(a.iter().all(|g| g.baseline == 540.0));
}

#[test]
fn lighting_is_monotonic_for_the_whole_run() {
    let mut engine = Engine::mount(TitleConfig::default(), None, Viewport::from_cells(90, 30))
        .unwrap();
    let mut seen = lit_flags(&engine);
    for _ in 0..2_000 {
        engine.tick();
        let now = lit_flags(&engine);
        for (before, after) in seen.iter().zip(&now) {
            assert!(!*before || *after, "a glyph went dark");
        }
        seen = now;
    }
    assert!(engine.reveal_complete());
}

#[test]
fn sweep_terminates_exactly_once_for_any_positive_velocity() {
    for velocity in [0.05, 0.7, 3.0, 250.0] {
        let mut config = TitleConfig::default();
        config.sweep.velocity = velocity;
        let mut engine = Engine::mount(config, None, Viewport::from_cells(60, 20)).unwrap();
        let mut events = 0;
        let mut frames = 0u64;
        while frames < 100_000 {
            if engine.tick().is_some() {
                events += 1;
            }
            frames += 1;
            if engine.reveal_complete() && frames > 10 {
                break;
            }
        }
        for _ in 0..100 {
            if engine.tick().is_some() {
                events += 1;
            }
        }
        assert_eq!(events, 1, "velocity {velocity}");
    }
}

#[test]
fn resize_mid_sweep_preserves_progress() {
    let viewport = Viewport::from_cells(100, 30);
    let mut engine = Engine::mount(TitleConfig::default(), None, viewport).unwrap();
    while engine.scene().sweep.position() < viewport.width / 2.0 {
        engine.tick();
    }
    let lit = lit_flags(&engine);
    let active = engine.scene().sweep.is_active();
    let xs: Vec<f64> = engine.scene().glyphs.iter().map(|g| g.x).collect();
    assert!(lit.iter().any(|l| *l) && lit.iter().any(|l| !*l));

    engine.resize(Viewport::from_cells(140, 40)).unwrap();

    assert_eq!(lit_flags(&engine), lit);
    assert_eq!(engine.scene().sweep.is_active(), active);
    let moved: Vec<f64> = engine.scene().glyphs.iter().map(|g| g.x).collect();
    assert_ne!(xs, moved);
}

#[test]
fn blank_headline_shows_fallback_title() {
    let content = HeroContent {
        headline: Some(String::new()),
        subheadline: Some("Sub".into()),
        cta_text: Some("Go".into()),
    };
    let engine =
        Engine::mount(TitleConfig::default(), Some(content), Viewport::from_cells(100, 30))
            .unwrap();
    assert_eq!(engine.scene().title, "PRECISION IN MOTION");
}

#[test]
fn cleared_content_falls_back_and_empty_text_lays_out_nothing() {
    let content = HeroContent {
        headline: Some("x".into()),
        ..Default::default()
    };
    let mut engine =
        Engine::mount(TitleConfig::default(), Some(content), Viewport::from_cells(40, 12))
            .unwrap();
    engine.set_content(None);
    assert!(!engine.scene().glyphs.is_empty());

    let font = BlockFont::new(1);
    assert!(layout("", &font, 0.1, Viewport::new(10.0, 10.0)).is_empty());
}

#[test]
fn compile_and_render_produce_a_playable_export() {
    let compiled =
        Engine::compile(TitleConfig::default(), None, Viewport::from_cells(60, 20), 400).unwrap();
    assert_eq!(compiled.scenes.len(), 400);
    assert!(compiled.reveal_frame.is_some());

    let contract = kinetic_title::types::TerminalContract {
        width: 60,
        height: 20,
    };
    let presentation = Renderer::render(&compiled.scenes, contract, Vec::new());
    assert!(matches!(presentation.frames[0], Frame::Full { .. }));
    let json = serde_json::to_string(&presentation).unwrap();
    assert!(json.contains("\"type\":\"diff\""));
}

#[test]
fn zero_viewport_is_rejected_at_mount() {
    assert!(Engine::mount(TitleConfig::default(), None, Viewport::new(1000.0, 0.0)).is_err());
}
