//! Renderer: the deterministic rasterizer.
//!
//! Takes `ResolvedScene`s (in-memory, from the engine) and composites them
//! onto cell grids, producing either a single grid for live playback or a
//! `PlayablePresentation` (serializable, for export).
//!
//! The renderer is pure and stateless. Given the same input, it always
//! produces the same output. It knows nothing about gears, sweeps or time.

use crate::types::{
    Cell, CellChange, Color, Frame, Marker, Paint, PlayablePresentation, ResolvedScene, Style,
    TerminalContract,
};

pub type Grid = Vec<Vec<Cell>>;

pub struct Renderer;

impl Renderer {
    /// Render a sequence of resolved scenes into a playable presentation.
    ///
    /// The first frame is always a full frame. Subsequent frames are diffs
    /// against the previous frame.
    pub fn render(
        scenes: &[ResolvedScene],
        contract: TerminalContract,
        markers: Vec<Marker>,
    ) -> PlayablePresentation {
        let mut frames = Vec::with_capacity(scenes.len());
        let mut prev_grid: Option<Grid> = None;

        for scene in scenes {
            let grid = Self::rasterize(scene, &contract);
            let frame = match &prev_grid {
                None => Frame::Full {
                    cells: grid.clone(),
                },
                Some(prev) => Frame::Diff {
                    changes: Self::diff(prev, &grid),
                },
            };
            frames.push(frame);
            prev_grid = Some(grid);
        }

        PlayablePresentation {
            contract,
            frames,
            markers,
        }
    }

    /// Composite a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are stably sorted by z-order so that higher z values
    /// paint over lower ones and ops within one layer keep emission order.
    pub fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Grid {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x >= w || y >= h {
                continue;
            }
            let cell = &mut grid[y][x];
            match &op.paint {
                Paint::Glyph { ch, style } => {
                    let bg = style.bg.or(cell.style.bg);
                    *cell = Cell {
                        ch: *ch,
                        style: Style {
                            bg,
                            ..style.clone()
                        },
                    };
                }
                Paint::Fill(color) => {
                    *cell = Cell {
                        ch: ' ',
                        style: Style {
                            bg: Some(*color),
                            ..Default::default()
                        },
                    };
                }
                Paint::Tint { color, alpha } => tint(cell, *color, *alpha),
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

fn tint(cell: &mut Cell, color: Color, alpha: f64) {
    let base = cell.style.bg.unwrap_or(Color::rgb(0, 0, 0));
    cell.style.bg = Some(base.mix(color, alpha));
    if let Some(fg) = cell.style.fg {
        cell.style.fg = Some(fg.mix(color, alpha));
    }
}
