//! Block bitmap font used for the headline.
//!
//! Each glyph is 5 rows tall with variable width. All rows within a single
//! glyph are guaranteed to have the same length. A non-space character in a
//! row means "filled"; a space means "empty".

use super::geometry::{CELL_HEIGHT, CELL_WIDTH};
use super::layout::GlyphMetrics;

/// The height of every glyph in bitmap rows.
pub const GLYPH_ROWS: usize = 5;

type Bitmap = [&'static str; GLYPH_ROWS];

const MISSING: Bitmap = [" ### ", "#   #", "  ## ", "     ", "  #  "];

/// Return the bitmap for `ch`, or `None` if the character is not in the font.
/// Lower-case letters are folded to upper case.
pub fn bitmap(ch: char) -> Option<Bitmap> {
    let g = match ch.to_ascii_uppercase() {
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ### ", "#   #", "#    ", "#   #", " ### "],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "###  ", "#    ", "#####"],
        'F' => ["#####", "#    ", "###  ", "#    ", "#    "],
        'G' => [" ### ", "#    ", "#  ##", "#   #", " ### "],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["  ###", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],

        '0' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => [" ### ", "#   #", "  ## ", "#   #", " ### "],
        '4' => ["#  # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "   # ", "  #  ", " #   ", " #   "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "   # ", " ### "],

        ' ' => ["   ", "   ", "   ", "   ", "   "],
        '!' => ["#", "#", "#", " ", "#"],
        '.' => [" ", " ", " ", " ", "#"],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '\'' => ["#", "#", " ", " ", " "],
        '&' => [" ##  ", "#  # ", " ## #", "#  # ", " ## #"],
        '-' => ["     ", "     ", "#####", "     ", "     "],
        '?' => MISSING,
        ':' => [" ", "#", " ", "#", " "],

        _ => return None,
    };
    debug_assert!(
        g.iter().all(|row| row.len() == g[0].len()),
        "glyph '{ch}' has inconsistent row widths",
    );
    Some(g)
}

/// The bitmap actually drawn for `ch`: whitespace renders blank, anything
/// the font cannot shape renders as `?`.
pub fn shape(ch: char) -> Bitmap {
    if ch.is_whitespace() {
        return bitmap(' ').unwrap_or(MISSING);
    }
    bitmap(ch).unwrap_or(MISSING)
}

/// Filled pixels of `ch` as (column, row) pairs.
pub fn pixels(ch: char) -> impl Iterator<Item = (usize, usize)> {
    shape(ch).into_iter().enumerate().flat_map(|(row, line)| {
        line.bytes()
            .enumerate()
            .filter(|(_, b)| *b != b' ')
            .map(move |(col, _)| (col, row))
    })
}

/// The block font at an integer scale: one bitmap pixel covers
/// `scale` × `scale` terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFont {
    pub scale: u16,
}

impl BlockFont {
    pub fn new(scale: u16) -> Self {
        BlockFont {
            scale: scale.max(1),
        }
    }

    pub fn pixel_width(&self) -> f64 {
        self.scale as f64 * CELL_WIDTH
    }

    pub fn pixel_height(&self) -> f64 {
        self.scale as f64 * CELL_HEIGHT
    }
}

impl GlyphMetrics for BlockFont {
    fn advance(&self, ch: char) -> f64 {
        shape(ch)[0].len() as f64 * self.pixel_width()
    }

    fn font_size(&self) -> f64 {
        GLYPH_ROWS as f64 * self.pixel_height()
    }
}
