//! Headline layout: per-glyph horizontal placement on a shared baseline.

use super::geometry::Viewport;

/// Measures glyphs under the active font at the active size.
pub trait GlyphMetrics {
    /// Rendered width of `ch` in viewport units.
    fn advance(&self, ch: char) -> f64;
    /// Nominal font size in viewport units; tracking is expressed relative
    /// to it.
    fn font_size(&self) -> f64;
}

/// One laid-out character of the headline.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// Horizontal center.
    pub x: f64,
    /// Vertical baseline, shared by every glyph of a run.
    pub baseline: f64,
    pub width: f64,
    lit: bool,
}

impl Glyph {
    pub fn new(ch: char, x: f64, baseline: f64, width: f64) -> Self {
        Glyph {
            ch,
            x,
            baseline,
            width,
            lit: false,
        }
    }

    /// Whitespace glyphs hold their position but are never drawn or lit.
    pub fn is_blank(&self) -> bool {
        self.ch.is_whitespace()
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Mark the glyph as revealed. There is no way back.
    pub fn light(&mut self) {
        if !self.is_blank() {
            self.lit = true;
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }
}

/// Lay out `text` left to right, centered horizontally in the viewport with
/// `tracking_ratio * font_size` between consecutive glyphs. All glyphs sit on
/// the viewport's vertical center.
pub fn layout<M: GlyphMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    tracking_ratio: f64,
    viewport: Viewport,
) -> Vec<Glyph> {
    let widths: Vec<(char, f64)> = text.chars().map(|ch| (ch, metrics.advance(ch))).collect();
    if widths.is_empty() {
        return Vec::new();
    }

    let tracking = tracking_ratio * metrics.font_size();
    let total: f64 =
        widths.iter().map(|(_, w)| w).sum::<f64>() + tracking * (widths.len() - 1) as f64;
    let baseline = viewport.height / 2.0;

    let mut cursor = (viewport.width - total) / 2.0;
    widths
        .into_iter()
        .map(|(ch, width)| {
            let glyph = Glyph::new(ch, cursor + width / 2.0, baseline, width);
            cursor += width + tracking;
            glyph
        })
        .collect()
}

/// Carry lit flags from a previous layout of the same text onto a fresh one.
pub fn carry_lit(fresh: &mut [Glyph], previous: &[Glyph]) {
    for (new, old) in fresh.iter_mut().zip(previous) {
        if old.is_lit() && new.ch == old.ch {
            new.light();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is 10 units wide, font size 20.
    struct Fixed;

    impl GlyphMetrics for Fixed {
        fn advance(&self, _ch: char) -> f64 {
            10.0
        }

        fn font_size(&self) -> f64 {
            20.0
        }
    }

    #[test]
    fn empty_text_yields_no_glyphs() {
        assert!(layout("", &Fixed, 0.1, Viewport::new(100.0, 50.0)).is_empty());
    }

    #[test]
    fn run_is_centered_with_tracking() {
        // 3 glyphs × 10 + 2 gaps × 2 = 34 wide, starting at (100 - 34) / 2 = 33.
        let glyphs = layout("ABC", &Fixed, 0.1, Viewport::new(100.0, 50.0));
        let xs: Vec<f64> = glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![38.0, 50.0, 62.0]);
        assert!(glyphs.iter().all(|g| g.baseline == 25.0));
    }

    #[test]
    fn whitespace_is_kept_as_placeholder() {
        let mut glyphs = layout("A B", &Fixed, 0.0, Viewport::new(100.0, 50.0));
        assert_eq!(glyphs.len(), 3);
        assert!(glyphs[1].is_blank());
        glyphs[1].light();
        assert!(!glyphs[1].is_lit());
    }

    #[test]
    fn carry_lit_keeps_progress() {
        let mut old = layout("AB", &Fixed, 0.0, Viewport::new(100.0, 50.0));
        old[0].light();
        let mut fresh = layout("AB", &Fixed, 0.0, Viewport::new(60.0, 30.0));
        carry_lit(&mut fresh, &old);
        assert!(fresh[0].is_lit());
        assert!(!fresh[1].is_lit());
    }
}
