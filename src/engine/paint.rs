//! Frame painter.
//!
//! Turns a `TitleScene` into draw ops for one frame. Painting never mutates
//! the scene; all motion happens in `TitleScene::tick`.
//!
//! Layer order (z ascending):
//! ```text
//! background
//! backdrop                (ambient glow, grid, drifting streaks)
//! gears, back to front, each: extrusion → face → hub → bolts
//! accents                 (corner labels, stat readout)
//! glyph outlines          (unlit baseline, always visible)
//! beam fill → beam glyphs (transient, clipped to the beam quad)
//! lit glyphs              (persistent reveal)
//! overlay                 (loading only, occludes everything)
//! ```

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use crate::types::{DrawOp, Paint, ResolvedScene, Style};

use super::backdrop::STREAK_LENGTH;
use super::font::{self, BlockFont, GLYPH_ROWS};
use super::gears::Gear;
use super::geometry::{cell_center, cell_span, Point, CELL_HEIGHT, CELL_WIDTH};
use super::layout::Glyph;
use super::scene::TitleScene;
use super::theme::Theme;

pub mod layer {
    pub const BACKGROUND: i32 = 0;
    pub const BACKDROP_GLOW: i32 = 1;
    pub const BACKDROP_GRID: i32 = 2;
    pub const STREAKS: i32 = 3;
    /// First gear's extrusion; each gear takes `GEAR_STRIDE` levels.
    pub const GEARS: i32 = 10;
    pub const GEAR_STRIDE: i32 = 10;
    pub const ACCENTS: i32 = 95;
    pub const OUTLINE: i32 = 100;
    pub const BEAM: i32 = 110;
    pub const BEAM_GLOW: i32 = 115;
    pub const BEAM_GLYPHS: i32 = 120;
    pub const LIT_GLOW: i32 = 130;
    pub const LIT: i32 = 140;
    pub const OVERLAY: i32 = 200;
}

const OUTLINE_CH: char = '░';
const SOLID_CH: char = '█';
const BOLT_CH: char = '●';
const BEAM_GLOW_ALPHA: f64 = 0.25;
const LIT_GLOW_ALPHA: f64 = 0.12;
pub const LOADING_TEXT: &str = "SYNCHRONIZING";

/// Corner labels and the second they start fading in.
const META_LABELS: [(&str, f64); 3] = [
    ("VER. 2.5", 1.5),
    ("ADAPTIVE DESIGN", 1.8),
    ("HIGH-RES MOTION", 2.1),
];
const META_OPACITY: f64 = 0.4;
const META_FADE_SECONDS: f64 = 1.0;
/// Narrower canvases skip the stat readout.
const STATS_MIN_COLS: u16 = 64;

struct Canvas {
    cols: u16,
    rows: u16,
    ops: Vec<DrawOp>,
}

impl Canvas {
    fn put(&mut self, x: u16, y: u16, paint: Paint, z_order: i32) {
        self.ops.push(DrawOp {
            x,
            y,
            paint,
            z_order,
        });
    }

    /// Cells whose centers fall in the box, with those centers.
    fn cells(&self, min: Point, max: Point) -> Vec<(u16, u16, Point)> {
        let Some((xs, ys)) = cell_span(min, max, self.cols, self.rows) else {
            return Vec::new();
        };
        ys.flat_map(|y| xs.clone().map(move |x| (x, y, cell_center(x, y))))
            .collect()
    }

    fn all_cells(&self) -> Vec<(u16, u16, Point)> {
        let max = Point::new(
            self.cols as f64 * CELL_WIDTH,
            self.rows as f64 * CELL_HEIGHT,
        );
        self.cells(Point::default(), max)
    }

    fn text(&mut self, x: u16, y: u16, text: &str, style: &Style, z_order: i32) {
        if y >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let col = x as usize + i;
            if col >= self.cols as usize {
                break;
            }
            self.put(
                col as u16,
                y,
                Paint::Glyph {
                    ch,
                    style: style.clone(),
                },
                z_order,
            );
        }
    }
}

/// Paint the scene. With `overlay` set (a frame counter) the scene is
/// replaced by the synchronizing overlay.
pub fn paint(scene: &TitleScene, theme: &Theme, overlay: Option<u64>) -> ResolvedScene {
    let (cols, rows) = scene.viewport.cells();
    let mut canvas = Canvas {
        cols,
        rows,
        ops: Vec::new(),
    };

    match overlay {
        Some(frame) => paint_overlay(&mut canvas, theme, frame),
        None => {
            for (x, y, _) in canvas.all_cells() {
                canvas.put(x, y, Paint::Fill(theme.background), layer::BACKGROUND);
            }
            if scene.backdrop.is_enabled() {
                paint_backdrop(&mut canvas, scene, theme);
            }
            for (i, gear) in scene.train.gears().iter().enumerate() {
                let base = layer::GEARS + i as i32 * layer::GEAR_STRIDE;
                paint_gear(&mut canvas, &GearShape::new(gear, theme), theme, base);
            }
            if scene.backdrop.shows_accents() {
                paint_accents(&mut canvas, scene, theme);
            }
            paint_glyphs(&mut canvas, scene, theme);
        }
    }

    ResolvedScene {
        width: cols,
        height: rows,
        ops: canvas.ops,
    }
}

// ---------------------------------------------------------------------------
// Backdrop
// ---------------------------------------------------------------------------

fn paint_backdrop(canvas: &mut Canvas, scene: &TitleScene, theme: &Theme) {
    let backdrop = &scene.backdrop;
    let viewport = scene.viewport;
    let glow_at = backdrop.glow_center(viewport);
    let reach = 0.4 * viewport.width.max(viewport.height);
    let half_cell = Point::new(CELL_WIDTH / 2.0, CELL_HEIGHT / 2.0);

    for (x, y, p) in canvas.all_cells() {
        let falloff = 1.0 - p.distance(glow_at) / reach;
        if falloff > 0.0 {
            canvas.put(
                x,
                y,
                Paint::Tint {
                    color: theme.ambient,
                    alpha: theme.ambient_alpha * falloff * falloff,
                },
                layer::BACKDROP_GLOW,
            );
        }
        if backdrop.on_grid(p, viewport, half_cell) {
            canvas.put(
                x,
                y,
                Paint::Tint {
                    color: theme.grid,
                    alpha: theme.grid_alpha,
                },
                layer::BACKDROP_GRID,
            );
        }
    }

    // Thin vertical streaks, brightest at their middle.
    let half = STREAK_LENGTH / 2.0;
    for (center, opacity) in backdrop.streaks(scene.frame, viewport) {
        let top = Point::new(center.x, center.y - half);
        let bottom = Point::new(center.x, center.y + half);
        for (x, y, p) in canvas.cells(top, bottom) {
            let along = 1.0 - (p.y - center.y).abs() / half;
            if along > 0.0 {
                canvas.put(
                    x,
                    y,
                    Paint::Tint {
                        color: theme.streak,
                        alpha: opacity * along,
                    },
                    layer::STREAKS,
                );
            }
        }
    }
}

fn paint_accents(canvas: &mut Canvas, scene: &TitleScene, theme: &Theme) {
    let (cols, rows) = (canvas.cols, canvas.rows);
    if rows == 0 {
        return;
    }
    let seconds = scene.backdrop.seconds(scene.frame);
    let width = |label: &str| label.chars().count() as u16 + 2;
    let spots = [
        (4, rows / 3),
        (
            cols.saturating_sub(8 + width(META_LABELS[1].0)),
            rows - rows / 4 - 1,
        ),
        (cols.saturating_sub(cols / 4 + width(META_LABELS[2].0)), rows / 4),
    ];
    for ((label, delay), (x, y)) in META_LABELS.into_iter().zip(spots) {
        let opacity = ((seconds - delay) / META_FADE_SECONDS).clamp(0.0, 1.0) * META_OPACITY;
        if opacity <= 0.0 {
            continue;
        }
        let dot = Style::fg(theme.background.mix(theme.accent_dot, opacity));
        let text = Style {
            bold: true,
            ..Style::fg(theme.background.mix(theme.accent_text, opacity))
        };
        canvas.text(x, y, "●", &dot, layer::ACCENTS);
        canvas.text(x + 2, y, label, &text, layer::ACCENTS);
    }

    if cols < STATS_MIN_COLS || rows < 8 {
        return;
    }
    let fps = format!("{}FPS", scene.backdrop.fps());
    let label_style = Style {
        bold: true,
        ..Style::fg(theme.stat_label)
    };
    let value_style = Style::fg(theme.stat_value);
    let mut x = 4;
    for (label, value) in [("MOTION PHYSICS", fps.as_str()), ("RESPONSE", "<20ms")] {
        canvas.text(x, rows - 4, label, &label_style, layer::ACCENTS);
        canvas.text(x, rows - 3, value, &value_style, layer::ACCENTS);
        x += label.chars().count().max(value.chars().count()) as u16 + 4;
    }
}

// ---------------------------------------------------------------------------
// Gears
// ---------------------------------------------------------------------------

/// Silhouette of one gear: teeth and body, minus the spoke cutouts.
pub struct GearShape<'a> {
    gear: &'a Gear,
    theme: &'a Theme,
    root: f64,
    hub: f64,
    rim: f64,
    spoke_half: f64,
}

impl<'a> GearShape<'a> {
    pub fn new(gear: &'a Gear, theme: &'a Theme) -> Self {
        let outer = gear.radius;
        let root = outer * (1.0 - theme.tooth_depth);
        GearShape {
            gear,
            theme,
            root,
            hub: outer * theme.hub_ratio,
            rim: root * 0.78,
            spoke_half: outer * theme.spoke_width / 2.0,
        }
    }

    pub fn hub_radius(&self) -> f64 {
        self.hub
    }

    pub fn contains(&self, p: Point) -> bool {
        let local = p.minus(self.gear.center);
        let r = local.length();
        if r > self.gear.radius {
            return false;
        }
        let rel = local.angle() - self.gear.rotation;
        if r > self.root {
            let period = TAU / self.gear.teeth.get() as f64;
            let phase = (rel / period).rem_euclid(1.0);
            let tip = self.root + (self.gear.radius - self.root) * self.theme.tooth_profile.height(phase);
            return r <= tip;
        }
        !self.in_cutout(r, rel)
    }

    /// Whether a body point falls in a window between spokes.
    fn in_cutout(&self, r: f64, rel: f64) -> bool {
        if self.gear.spokes == 0 || r <= self.hub * 1.25 || r >= self.rim {
            return false;
        }
        let period = TAU / self.gear.spokes as f64;
        let delta = rel - (rel / period).round() * period;
        r * delta.sin().abs() > self.spoke_half
    }

    fn bounds(&self, offset: Point) -> (Point, Point) {
        let c = self.gear.center.offset(offset);
        let r = self.gear.radius;
        (Point::new(c.x - r, c.y - r), Point::new(c.x + r, c.y + r))
    }

    fn on_edge(&self, p: Point) -> bool {
        [
            Point::new(CELL_WIDTH, 0.0),
            Point::new(-CELL_WIDTH, 0.0),
            Point::new(0.0, CELL_HEIGHT),
            Point::new(0.0, -CELL_HEIGHT),
        ]
        .into_iter()
        .any(|d| !self.contains(p.offset(d)))
    }
}

fn paint_gear(canvas: &mut Canvas, shape: &GearShape, theme: &Theme, base: i32) {
    let gear = shape.gear;

    // Extrusion: darkened copies stacked along the tilt direction, deepest first.
    for depth in (1..=theme.extrusion_layers).rev() {
        let offset = Point::new(
            theme.extrusion_step[0] * depth as f64,
            theme.extrusion_step[1] * depth as f64,
        );
        let color = theme.extrusion.scale(1.0 - 0.12 * depth as f64);
        let (min, max) = shape.bounds(offset);
        for (x, y, p) in canvas.cells(min, max) {
            if shape.contains(p.minus(offset)) {
                canvas.put(x, y, Paint::Fill(color), base);
            }
        }
    }

    // Top face with a directional gradient and a highlighted rim.
    let light = Point::polar(theme.light_angle, 1.0);
    let (min, max) = shape.bounds(Point::default());
    for (x, y, p) in canvas.cells(min, max) {
        if !shape.contains(p) {
            continue;
        }
        let local = p.minus(gear.center);
        let s = (local.x * light.x + local.y * light.y) / gear.radius;
        let mut color = theme.face_dark.mix(theme.face_light, (s + 1.0) / 2.0);
        if shape.on_edge(p) {
            color = color.mix(theme.edge_highlight, 0.6);
        }
        canvas.put(x, y, Paint::Fill(color), base + 1);
    }

    // Hub, radially shaded.
    let hub = shape.hub_radius();
    let hub_min = Point::new(gear.center.x - hub, gear.center.y - hub);
    let hub_max = Point::new(gear.center.x + hub, gear.center.y + hub);
    for (x, y, p) in canvas.cells(hub_min, hub_max) {
        let r = p.distance(gear.center);
        if r <= hub {
            let color = theme.hub_light.mix(theme.hub_dark, r / hub);
            canvas.put(x, y, Paint::Fill(color), base + 2);
        }
    }

    // Bolts evenly spaced around the hub.
    if gear.bolts > 0 {
        let ring = hub * 0.62;
        let bolt_r = (hub * 0.18).max(CELL_WIDTH / 2.0);
        let style = Style::fg(theme.bolt);
        for k in 0..gear.bolts {
            let angle = gear.rotation + k as f64 * TAU / gear.bolts as f64;
            let pos = gear.center.offset(Point::polar(angle, ring));
            let lo = Point::new(pos.x - bolt_r, pos.y - bolt_r);
            let hi = Point::new(pos.x + bolt_r, pos.y + bolt_r);
            for (x, y, p) in canvas.cells(lo, hi) {
                if p.distance(pos) <= bolt_r {
                    canvas.put(x, y, Paint::Fill(theme.bolt.scale(1.6)), base + 3);
                }
            }
            if pos.x >= 0.0 && pos.y >= 0.0 {
                let (x, y) = ((pos.x / CELL_WIDTH) as u16, (pos.y / CELL_HEIGHT) as u16);
                canvas.put(
                    x,
                    y,
                    Paint::Glyph {
                        ch: BOLT_CH,
                        style: style.clone(),
                    },
                    base + 3,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Headline
// ---------------------------------------------------------------------------

/// Cells of a `cols` × `rows` grid covered by a glyph's bitmap. Pixels off
/// the grid are dropped.
pub fn glyph_cells(glyph: &Glyph, font: &BlockFont, cols: u16, rows: u16) -> Vec<(u16, u16)> {
    let pw = font.pixel_width();
    let ph = font.pixel_height();
    let left = glyph.left();
    let top = glyph.baseline - GLYPH_ROWS as f64 * ph / 2.0;
    let scale = font.scale as usize;

    let mut cells = Vec::new();
    for (col, row) in font::pixels(glyph.ch) {
        for dy in 0..scale {
            for dx in 0..scale {
                let x = left + col as f64 * pw + (dx as f64 + 0.5) * CELL_WIDTH;
                let y = top + row as f64 * ph + (dy as f64 + 0.5) * CELL_HEIGHT;
                let (col, row) = ((x / CELL_WIDTH).floor(), (y / CELL_HEIGHT).floor());
                if col >= 0.0 && row >= 0.0 && col < cols as f64 && row < rows as f64 {
                    cells.push((col as u16, row as u16));
                }
            }
        }
    }
    cells
}

fn halo(cells: &[(u16, u16)]) -> BTreeSet<(u16, u16)> {
    let mut out = BTreeSet::new();
    for &(x, y) in cells {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let nx = u16::try_from(x as i32 + dx);
                let ny = u16::try_from(y as i32 + dy);
                if let (Ok(nx), Ok(ny)) = (nx, ny) {
                    out.insert((nx, ny));
                }
            }
        }
    }
    out
}

fn paint_glyphs(canvas: &mut Canvas, scene: &TitleScene, theme: &Theme) {
    let shaped: Vec<(&Glyph, Vec<(u16, u16)>)> = scene
        .glyphs
        .iter()
        .filter(|g| !g.is_blank())
        .map(|g| (g, glyph_cells(g, &scene.font, canvas.cols, canvas.rows)))
        .collect();

    let outline = Style::fg(theme.outline);
    for (_, cells) in &shaped {
        for &(x, y) in cells {
            canvas.put(
                x,
                y,
                Paint::Glyph {
                    ch: OUTLINE_CH,
                    style: outline.clone(),
                },
                layer::OUTLINE,
            );
        }
    }

    let sweep = &scene.sweep;
    if sweep.is_active() {
        // Beam quad with a transparent → white → transparent gradient.
        for (x, y, p) in canvas.all_cells() {
            if sweep.covers(p) {
                let alpha = theme.beam_alpha * sweep.intensity(p);
                canvas.put(
                    x,
                    y,
                    Paint::Tint {
                        color: theme.beam,
                        alpha,
                    },
                    layer::BEAM,
                );
            }
        }

        let inside = |&(x, y): &(u16, u16)| sweep.covers(cell_center(x, y));
        let bright = Style {
            bold: true,
            ..Style::fg(theme.beam_glyph)
        };
        for (_, cells) in &shaped {
            for (x, y) in halo(cells).into_iter().filter(inside) {
                canvas.put(
                    x,
                    y,
                    Paint::Tint {
                        color: theme.glow,
                        alpha: BEAM_GLOW_ALPHA,
                    },
                    layer::BEAM_GLOW,
                );
            }
            for &(x, y) in cells.iter().filter(|&c| inside(c)) {
                canvas.put(
                    x,
                    y,
                    Paint::Glyph {
                        ch: SOLID_CH,
                        style: bright.clone(),
                    },
                    layer::BEAM_GLYPHS,
                );
            }
        }
    }

    let lit = Style {
        bold: true,
        ..Style::fg(theme.lit)
    };
    for (glyph, cells) in &shaped {
        if !(glyph.is_lit() && sweep.has_passed(glyph)) {
            continue;
        }
        for (x, y) in halo(cells) {
            canvas.put(
                x,
                y,
                Paint::Tint {
                    color: theme.glow,
                    alpha: LIT_GLOW_ALPHA,
                },
                layer::LIT_GLOW,
            );
        }
        for &(x, y) in cells {
            canvas.put(
                x,
                y,
                Paint::Glyph {
                    ch: SOLID_CH,
                    style: lit.clone(),
                },
                layer::LIT,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Loading overlay
// ---------------------------------------------------------------------------

fn paint_overlay(canvas: &mut Canvas, theme: &Theme, frame: u64) {
    for (x, y, _) in canvas.all_cells() {
        canvas.put(x, y, Paint::Fill(theme.overlay), layer::OVERLAY);
    }
    if canvas.rows == 0 {
        return;
    }

    let mid = canvas.rows / 2;
    let label_x = canvas.cols.saturating_sub(LOADING_TEXT.len() as u16) / 2;
    let style = Style {
        bold: true,
        ..Style::fg(theme.overlay_text)
    };
    canvas.text(label_x, mid.saturating_sub(1), LOADING_TEXT, &style, layer::OVERLAY + 1);

    // Indeterminate bar: a block bouncing along a track.
    let track = canvas.cols.saturating_sub(4).min(32);
    let block = (track / 4).max(1);
    if track <= block || mid + 1 >= canvas.rows {
        return;
    }
    let travel = (track - block) as u64;
    let step = frame % (travel * 2);
    let at = (if step <= travel { step } else { travel * 2 - step }) as u16;
    let track_x = (canvas.cols - track) / 2;
    let dim = Style {
        dim: true,
        ..Style::fg(theme.overlay_text)
    };
    for i in 0..track {
        let (ch, s) = if i >= at && i < at + block {
            (SOLID_CH, &style)
        } else {
            ('─', &dim)
        };
        canvas.put(
            track_x + i,
            mid + 1,
            Paint::Glyph {
                ch,
                style: s.clone(),
            },
            layer::OVERLAY + 1,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TitleConfig;
    use crate::engine::geometry::Viewport;
    use crate::renderer::{Grid, Renderer};
    use crate::types::TerminalContract;

    fn scene(title: &str) -> TitleScene {
        TitleScene::new(
            &TitleConfig::default(),
            title.to_string(),
            Viewport::from_cells(120, 40),
        )
    }

    fn cells_of(s: &TitleScene, glyph: &Glyph) -> Vec<(u16, u16)> {
        let (cols, rows) = s.viewport.cells();
        glyph_cells(glyph, &s.font, cols, rows)
    }

    fn raster(scene: &TitleScene, overlay: Option<u64>) -> Grid {
        let resolved = paint(scene, &Theme::brass(), overlay);
        Renderer::rasterize(
            &resolved,
            &TerminalContract {
                width: resolved.width,
                height: resolved.height,
            },
        )
    }

    #[test]
    fn unlit_glyphs_show_outline_only() {
        let s = scene("HI");
        let grid = raster(&s, None);
        for &(x, y) in &cells_of(&s, &s.glyphs[0]) {
            assert_eq!(grid[y as usize][x as usize].ch, OUTLINE_CH);
        }
    }

    #[test]
    fn revealed_glyphs_stay_solid_after_completion() {
        let mut s = scene("HI");
        while s.tick().is_none() {}
        let grid = raster(&s, None);
        for glyph in &s.glyphs {
            for &(x, y) in &cells_of(&s, glyph) {
                let cell = &grid[y as usize][x as usize];
                assert_eq!(cell.ch, SOLID_CH);
                assert_eq!(cell.style.fg, Some(Theme::brass().lit));
            }
        }
    }

    #[test]
    fn lit_glyphs_stay_on_top_while_the_beam_passes() {
        let mut s = scene("ABCDEFGH");
        let theme = Theme::brass();
        let second = &s.glyphs[1];
        let second_at = Point::new(second.x, second.baseline);
        let mut frames = 0;
        while !(s.glyphs[0].is_lit() && s.sweep.covers(second_at)) {
            s.tick();
            frames += 1;
            assert!(frames < 10_000, "beam never reached the second glyph");
        }
        assert!(s.sweep.is_active());

        let grid = raster(&s, None);
        let first = cells_of(&s, &s.glyphs[0]);
        assert!(!first.is_empty());
        for &(x, y) in &first {
            let cell = &grid[y as usize][x as usize];
            assert_eq!(cell.ch, SOLID_CH);
            assert_eq!(cell.style.fg, Some(theme.lit));
        }

        let last = s.glyphs.last().unwrap();
        assert!(!last.is_lit());
        for &(x, y) in &cells_of(&s, last) {
            assert_eq!(grid[y as usize][x as usize].ch, OUTLINE_CH);
        }
    }

    #[test]
    fn glyphs_far_off_grid_cover_no_cells() {
        let s = scene("");
        let (cols, rows) = s.viewport.cells();
        let far = Glyph::new('-', 70_000.0, 40.0, 5.0);
        assert!(glyph_cells(&far, &s.font, cols, rows).is_empty());

        let edge = Glyph::new('-', cols as f64 + 1.0, 40.0, 5.0);
        assert!(glyph_cells(&edge, &s.font, cols, rows)
            .iter()
            .all(|&(x, y)| x < cols && y < rows));
    }

    #[test]
    fn halo_never_wraps_to_the_left_edge() {
        let ring = halo(&[(u16::MAX, 5), (0, 0)]);
        assert!(ring.iter().all(|&(x, _)| x == 0 || x == 1 || x >= u16::MAX - 1));
        assert!(!ring.contains(&(0, 5)));
        assert!(ring.contains(&(u16::MAX - 1, 4)));
    }

    #[test]
    fn backdrop_tints_the_background() {
        let s = scene("");
        let theme = Theme::brass();
        let grid = raster(&s, None);
        // Top-left cell sits on a grid line.
        assert_ne!(grid[0][0].style.bg, Some(theme.background));

        let mut config = TitleConfig::default();
        config.backdrop.enabled = false;
        config.backdrop.accents = false;
        let bare = TitleScene::new(&config, String::new(), s.viewport);
        let grid = raster(&bare, None);
        assert_eq!(grid[0][0].style.bg, Some(theme.background));
    }

    #[test]
    fn pointer_moves_the_grid() {
        let mut s = scene("");
        let mut still = s.clone();
        s.point_at(Point::new(s.viewport.width, s.viewport.height / 2.0));
        for _ in 0..200 {
            s.tick();
            still.tick();
        }
        assert_ne!(raster(&s, None)[0], raster(&still, None)[0]);
    }

    #[test]
    fn meta_labels_fade_in_after_their_delay() {
        let mut s = scene("");
        let row = |grid: &Grid, y: u16| grid[y as usize].iter().map(|c| c.ch).collect::<String>();
        let label_row = s.viewport.cells().1 / 3;
        assert!(!row(&raster(&s, None), label_row).contains("VER. 2.5"));

        let fps = TitleConfig::default().fps as u64;
        for _ in 0..fps * 3 {
            s.tick();
        }
        let grid = raster(&s, None);
        assert!(row(&grid, label_row).contains("VER. 2.5"));
        let rows = s.viewport.cells().1;
        assert!(row(&grid, rows - 3).contains(&format!("{fps}FPS")));
    }

    #[test]
    fn overlay_occludes_the_scene() {
        let s = scene("HI");
        let grid = raster(&s, Some(3));
        assert!(grid.iter().flatten().all(|c| c.ch != OUTLINE_CH));
        let row: String = grid[19].iter().map(|c| c.ch).collect();
        assert!(row.contains(LOADING_TEXT));
    }

    #[test]
    fn gear_hub_is_painted_at_driver_center() {
        let s = scene("");
        let theme = Theme::brass();
        let grid = raster(&s, None);
        let c = s.train.driver().center;
        let cell = &grid[(c.y / CELL_HEIGHT) as usize][(c.x / CELL_WIDTH) as usize];
        assert_ne!(cell.style.bg, Some(theme.background));
    }

    #[test]
    fn spoke_windows_are_cut_from_the_body() {
        let s = scene("");
        let theme = Theme::brass();
        let driver = s.train.driver();
        let shape = GearShape::new(driver, &theme);
        let root = driver.radius * (1.0 - theme.tooth_depth);
        let mid = (shape.hub_radius() * 1.25 + root * 0.78) / 2.0;
        // Between spokes k=0 and k=1 of a six-spoke wheel.
        let window = driver.rotation + TAU / 12.0;
        let on_spoke = driver.rotation;
        assert!(!shape.contains(driver.center.offset(Point::polar(window, mid))));
        assert!(shape.contains(driver.center.offset(Point::polar(on_spoke, mid))));
    }

    #[test]
    fn painting_is_deterministic() {
        let s = scene("ABC");
        assert_eq!(raster(&s, None), raster(&s, None));
    }
}
