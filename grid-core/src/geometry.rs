//! Pixel geometry shared with the presentation layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::division::{Division, DivisionId};
use crate::grid::Grid;

/// A point in canvas-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X offset from the canvas' left edge.
    pub x: f32,
    /// Y offset from the canvas' top edge.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// The part of a division that determines where it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutKey {
    x: u32,
    y: u32,
    colspan_x: u32,
    colspan_y: u32,
    line_height: Option<f32>,
}

impl From<&Division> for LayoutKey {
    fn from(division: &Division) -> Self {
        Self {
            x: division.x,
            y: division.y,
            colspan_x: division.colspan_x,
            colspan_y: division.colspan_y,
            line_height: division.line_height,
        }
    }
}

/// The grid-wide inputs that move every division's rendered box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutKey {
    columns: u32,
    rows: u32,
    width: f32,
    height: f32,
    row_heights: Vec<Option<f32>>,
}

impl From<&Grid> for GridLayoutKey {
    fn from(grid: &Grid) -> Self {
        let rows = grid.rows();
        Self {
            columns: grid.columns(),
            rows,
            width: grid.width,
            height: grid.height,
            row_heights: (0..rows).map(|row| grid.row_height(row)).collect(),
        }
    }
}

/// A measured bounding box and the layout it was measured for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBox {
    /// Rendered bounds in canvas pixels.
    pub rect: Rect,
    /// Division layout at measurement time.
    pub layout: LayoutKey,
}

/// Rendered bounding boxes per division, reported back by the presentation.
///
/// Boxes belong to one layout pass. They are only trusted while the grid
/// still has the extents, canvas size and row heights of that pass, and a
/// single box only while its division keeps its position, span and row
/// height.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pass: Option<GridLayoutKey>,
    boxes: HashMap<DivisionId, MeasuredBox>,
}

impl LayoutGeometry {
    /// Create empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a layout pass for `grid`, forgetting every earlier box.
    pub fn begin_pass(&mut self, grid: &Grid) {
        self.boxes.clear();
        self.pass = Some(GridLayoutKey::from(grid));
    }

    /// Record the rendered box of `division` in the current pass.
    pub fn record(&mut self, division: &Division, rect: Rect) {
        self.boxes.insert(
            division.id,
            MeasuredBox {
                rect,
                layout: LayoutKey::from(division),
            },
        );
    }

    /// Forget every recorded box and the pass they belong to.
    pub fn clear(&mut self) {
        self.pass = None;
        self.boxes.clear();
    }

    /// Check if the recorded pass still matches the layout of `grid`.
    #[must_use]
    pub fn is_current(&self, grid: &Grid) -> bool {
        self.pass
            .as_ref()
            .is_some_and(|pass| *pass == GridLayoutKey::from(grid))
    }

    /// Number of recorded boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if no boxes are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// The box of `division`, if it was measured for the division's current
    /// layout. Callers check [`is_current`](Self::is_current) for the grid
    /// as a whole.
    #[must_use]
    pub fn box_for(&self, division: &Division) -> Option<Rect> {
        self.boxes
            .get(&division.id)
            .filter(|measured| measured.layout == LayoutKey::from(division))
            .map(|measured| measured.rect)
    }
}
