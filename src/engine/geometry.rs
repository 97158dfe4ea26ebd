//! Viewport-space primitives shared by layout, gears and the sweep.

/// Width of one terminal cell in viewport units.
pub const CELL_WIDTH: f64 = 1.0;
/// Height of one terminal cell in viewport units. Terminal cells are about
/// twice as tall as they are wide.
pub const CELL_HEIGHT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The point at `distance` from the origin along `angle` (radians,
    /// clockwise on screen since y grows downward).
    pub fn polar(angle: f64, distance: f64) -> Self {
        Point::new(angle.cos() * distance, angle.sin() * distance)
    }

    pub fn offset(self, by: Point) -> Self {
        Point::new(self.x + by.x, self.y + by.y)
    }

    pub fn minus(self, other: Point) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.minus(other).length()
    }

    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Size of the drawable area in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// Viewport covering a grid of `cols` × `rows` terminal cells.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Viewport::new(cols as f64 * CELL_WIDTH, rows as f64 * CELL_HEIGHT)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Grid size in whole cells.
    pub fn cells(&self) -> (u16, u16) {
        (
            (self.width / CELL_WIDTH).floor().max(0.0) as u16,
            (self.height / CELL_HEIGHT).floor().max(0.0) as u16,
        )
    }
}

/// Center of cell (`col`, `row`) in viewport units.
pub fn cell_center(col: u16, row: u16) -> Point {
    Point::new(
        (col as f64 + 0.5) * CELL_WIDTH,
        (row as f64 + 0.5) * CELL_HEIGHT,
    )
}

/// Inclusive cell range covering the viewport-space box, clipped to the grid.
/// Returns `None` when the box lies entirely off-grid.
pub fn cell_span(
    min: Point,
    max: Point,
    cols: u16,
    rows: u16,
) -> Option<(std::ops::RangeInclusive<u16>, std::ops::RangeInclusive<u16>)> {
    if cols == 0 || rows == 0 {
        return None;
    }
    let clamp_col = |v: f64| (v / CELL_WIDTH).floor().clamp(0.0, cols as f64 - 1.0) as u16;
    let clamp_row = |v: f64| (v / CELL_HEIGHT).floor().clamp(0.0, rows as f64 - 1.0) as u16;
    let grid_w = cols as f64 * CELL_WIDTH;
    let grid_h = rows as f64 * CELL_HEIGHT;
    if max.x < 0.0 || max.y < 0.0 || min.x >= grid_w || min.y >= grid_h {
        return None;
    }
    Some((
        clamp_col(min.x)..=clamp_col(max.x),
        clamp_row(min.y)..=clamp_row(max.y),
    ))
}
