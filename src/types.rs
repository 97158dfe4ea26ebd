//! Shared boundary types for the title sequence.
//!
//! This module defines the two key data contracts:
//! - Engine → Renderer (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Renderer → Player / export file: `PlayablePresentation` containing `Frame`s

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Approximate RGB triple, used when blending against named colours.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb { r, g, b } => (r, g, b),
            Color::Named(n) => match n {
                NamedColor::Black => (0, 0, 0),
                NamedColor::Red => (205, 49, 49),
                NamedColor::Green => (13, 188, 121),
                NamedColor::Yellow => (229, 229, 16),
                NamedColor::Blue => (36, 114, 200),
                NamedColor::Magenta => (188, 63, 188),
                NamedColor::Cyan => (17, 168, 205),
                NamedColor::White => (229, 229, 229),
            },
        }
    }

    /// Linear blend from `self` toward `other`; `t` is clamped to `0..=1`.
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let (r0, g0, b0) = self.to_rgb();
        let (r1, g1, b1) = other.to_rgb();
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(ch(r0, r1), ch(g0, g1), ch(b0, b1))
    }

    /// Scale brightness; factors above 1 brighten, below 1 darken.
    pub fn scale(self, factor: f64) -> Color {
        let (r, g, b) = self.to_rgb();
        let ch = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Color::rgb(ch(r), ch(g), ch(b))
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.dim
    }

    pub fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Engine → Renderer boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

/// What a draw op does to its cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Put a character. A style without `bg` keeps the background underneath.
    Glyph { ch: char, style: Style },
    /// Clear the cell to a solid background colour.
    Fill(Color),
    /// Blend the cell's existing colours toward `color` by `alpha`.
    Tint { color: Color, alpha: f64 },
}

#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub paint: Paint,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary (serialized by `export`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContract {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub frame_index: usize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayablePresentation {
    pub contract: TerminalContract,
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}
