//! Placement resolution: which division does a dropped widget belong to?
//!
//! Two strategies implement [`PlacementStrategy`]:
//!
//! - [`IndexResolver`] splits the canvas into equal columns and rows and
//!   returns the division covering the cell under the pointer.
//! - [`NearestCenterResolver`] uses the rendered boxes reported by the
//!   presentation and returns the division whose box center is closest to
//!   the pointer. It tolerates gutters between divisions but needs geometry
//!   that matches the current layout.
//!
//! Neither strategy fails loudly: no match is `None`, and the caller drops
//! the widget.

use crate::division::DivisionId;
use crate::geometry::{LayoutGeometry, Point};
use crate::grid::Grid;

/// Maps a canvas-relative pointer offset to a division.
pub trait PlacementStrategy {
    /// Resolve `pointer` to a division of `grid`.
    fn resolve(&self, grid: &Grid, pointer: Point) -> Option<DivisionId>;
}

/// Equal-cell index lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexResolver;

impl PlacementStrategy for IndexResolver {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn resolve(&self, grid: &Grid, pointer: Point) -> Option<DivisionId> {
        if grid.division_count() == 0 || !pointer.x.is_finite() || !pointer.y.is_finite() {
            return None;
        }
        if pointer.x < 0.0 || pointer.y < 0.0 || grid.width <= 0.0 || grid.height <= 0.0 {
            return None;
        }
        let extents = grid.max_extents();
        let col_width = grid.width / extents.columns() as f32;
        let row_height = grid.height / extents.rows() as f32;

        let col = (pointer.x / col_width).floor();
        let row = (pointer.y / row_height).floor();
        if col >= extents.columns() as f32 || row >= extents.rows() as f32 {
            return None;
        }
        // Both values are non-negative and below the grid extents here.
        let (col, row) = (col as u32, row as u32);
        grid.division_covering(col, row).map(|d| d.id)
    }
}

/// Closest rendered box center.
#[derive(Debug, Clone, Copy)]
pub struct NearestCenterResolver<'a> {
    geometry: &'a LayoutGeometry,
}

impl<'a> NearestCenterResolver<'a> {
    /// Create a resolver over measured geometry.
    #[must_use]
    pub const fn new(geometry: &'a LayoutGeometry) -> Self {
        Self { geometry }
    }
}

impl PlacementStrategy for NearestCenterResolver<'_> {
    fn resolve(&self, grid: &Grid, pointer: Point) -> Option<DivisionId> {
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return None;
        }
        if !self.geometry.is_current(grid) {
            tracing::debug!(
                "Geometry predates the layout of grid {}; drop not resolved",
                grid.id
            );
            return None;
        }
        let nearest = grid
            .divisions()
            .iter()
            .filter_map(|division| {
                self.geometry
                    .box_for(division)
                    .map(|rect| (division.id, rect.center().distance(pointer)))
            })
            .fold(None, |best: Option<(DivisionId, f32)>, candidate| match best {
                Some(b) if b.1 <= candidate.1 => Some(b),
                _ => Some(candidate),
            });
        if nearest.is_none() {
            tracing::debug!("No settled geometry for grid {}; drop not resolved", grid.id);
        }
        nearest.map(|(id, _)| id)
    }
}
