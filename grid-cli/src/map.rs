//! Text rendering of a grid's tiling.
//!
//! Each unit cell shows the id of the division covering it, so merged
//! divisions appear as a block of repeated ids:
//!
//! ```text
//!  0  0  2
//!  3  4  5
//! ```

use std::fmt::Write;

use grid_core::Grid;

/// Render `grid` as one line per row, `.` marking an uncovered cell.
#[must_use]
pub fn render(grid: &Grid) -> String {
    let width = grid
        .divisions()
        .iter()
        .map(|d| d.id.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for y in 0..grid.rows() {
        for x in 0..grid.columns() {
            let label = grid
                .division_covering(x, y)
                .map_or_else(|| ".".to_string(), |d| d.id.to_string());
            let _ = write!(out, " {label:>width$}");
        }
        out.push('\n');
    }
    out
}
