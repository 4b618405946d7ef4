//! Growing and shrinking a grid to a requested column and row count.
//!
//! ```text
//!   2 x 2 -> set_divisions(3, 1)
//!
//!   ┌───┬───┐        ┌───┬───┬───┐
//!   │ 0 │ 1 │        │ 0 │ 1 │ 4 │   column 2 added on every row
//!   ├───┼───┤   ->   └───┴───┴───┘   row 1 removed
//!   │ 2 │ 3 │
//!   └───┴───┘
//! ```
//!
//! Columns are processed before rows. Growing appends empty 1x1 divisions
//! with fresh ids. Shrinking removes every division that reaches past the new
//! bound, together with its widgets; a removed division is never truncated.
//! Cells inside the new bounds that such a removal leaves uncovered are
//! refilled with empty 1x1 divisions.

use crate::config::MAX_TRACKS;
use crate::division::{Axis, Division};
use crate::grid::Grid;

/// Reshape `grid` to `columns` x `rows` unit cells.
///
/// Requests with a zero count, or more than [`MAX_TRACKS`] columns or rows,
/// are ignored and return the grid unchanged. Widgets in removed divisions
/// are discarded.
#[must_use]
pub fn set_divisions(grid: &Grid, columns: u32, rows: u32) -> Grid {
    if columns < 1 || rows < 1 {
        tracing::debug!("Ignoring degenerate division count {columns}x{rows}");
        return grid.clone();
    }
    if columns > MAX_TRACKS || rows > MAX_TRACKS {
        tracing::debug!("Ignoring division count {columns}x{rows} above {MAX_TRACKS}");
        return grid.clone();
    }
    let mut next = grid.clone();
    resize_axis(&mut next, Axis::X, columns);
    resize_axis(&mut next, Axis::Y, rows);
    tracing::debug!(
        "Resized grid {} to {}x{} ({} divisions)",
        next.id,
        next.columns(),
        next.rows(),
        next.division_count()
    );
    next
}

/// Grow or shrink one axis to `target` cells.
fn resize_axis(grid: &mut Grid, axis: Axis, target: u32) {
    let extents = grid.max_extents();
    let (current_max, cross_max) = match axis {
        Axis::X => (extents.max_x, extents.max_y),
        Axis::Y => (extents.max_y, extents.max_x),
    };
    let target_max = target - 1;

    if target_max > current_max {
        for along in current_max + 1..=target_max {
            for across in 0..=cross_max {
                let (x, y) = match axis {
                    Axis::X => (along, across),
                    Axis::Y => (across, along),
                };
                grid.push_division(x, y);
            }
        }
    } else if target_max < current_max {
        grid.retain_divisions(|d: &Division| d.end(axis) <= target_max);
        let (columns, rows) = match axis {
            Axis::X => (target, cross_max + 1),
            Axis::Y => (cross_max + 1, target),
        };
        grid.refill(columns, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::{DivisionId, WidgetKind};
    use crate::merge::expand;
    use crate::NeighborRule;

    fn spans(grid: &Grid) -> Vec<(u32, u32, u32, u32)> {
        let mut spans: Vec<_> = grid
            .divisions()
            .iter()
            .map(|d| (d.x, d.y, d.colspan_x, d.colspan_y))
            .collect();
        spans.sort_unstable();
        spans
    }

    #[test]
    fn test_grow_columns_adds_one_division_per_row() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 1, 2);
        let grid = set_divisions(&grid, 3, 2);
        assert_eq!(grid.division_count(), 6);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        grid.validate().expect("valid");
    }

    #[test]
    fn test_grow_assigns_fresh_ids() {
        let grid = Grid::new(300.0, 200.0);
        let grown = set_divisions(&grid, 2, 1);
        let added = grown.find_division(1, 0).expect("new column");
        assert_eq!(added.id, DivisionId(1));
        assert_eq!((added.colspan_x, added.colspan_y), (1, 1));
    }

    #[test]
    fn test_degenerate_request_is_ignored() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 2, 2);
        assert_eq!(set_divisions(&grid, 0, 3), grid);
        assert_eq!(set_divisions(&grid, 3, 0), grid);
    }

    #[test]
    fn test_same_size_is_noop() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 3, 2);
        assert_eq!(set_divisions(&grid, 3, 2), grid);
    }

    #[test]
    fn test_shrink_discards_widgets() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 2, 1);
        let target = grid.find_division(1, 0).expect("exists").id;
        let (grid, widget) = grid.place_widget(target, WidgetKind::Title);
        let grid = set_divisions(&grid, 1, 1);
        assert!(grid.find_widget(widget.expect("placed")).is_none());
        assert_eq!(grid.division_count(), 1);
    }

    #[test]
    fn test_shrink_drops_overflowing_span_and_refills() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 3, 1);
        let grid = expand(&grid, DivisionId(1), Axis::X, NeighborRule::FirstInStoreOrder);
        let spanning = grid.find_by_id(DivisionId(1)).expect("merged");
        assert_eq!(spanning.colspan_x, 2);

        let grid = set_divisions(&grid, 2, 1);
        assert!(grid.find_by_id(DivisionId(1)).is_none());
        assert_eq!(spans(&grid), vec![(0, 0, 1, 1), (1, 0, 1, 1)]);
        grid.validate().expect("valid");
    }

    #[test]
    fn test_both_axes_in_one_call() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 3, 3);
        let grid = set_divisions(&grid, 2, 4);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.division_count(), 8);
        grid.validate().expect("valid");
    }

    #[test]
    fn test_round_trip_to_single_cell() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 3, 3);
        let grid = set_divisions(&grid, 1, 1);
        assert_eq!(spans(&grid), vec![(0, 0, 1, 1)]);
        assert_eq!(grid.divisions()[0].id, DivisionId(0));
    }

    #[test]
    fn test_new_rows_inherit_nothing_and_old_rows_keep_height() {
        let mut grid = Grid::new(300.0, 200.0);
        grid.set_row_height(0, 30.0);
        let grid = set_divisions(&grid, 2, 2);
        assert_eq!(grid.row_height(0), Some(30.0));
        assert_eq!(grid.row_height(1), None);
        grid.validate().expect("valid");
    }

    #[test]
    fn test_count_above_track_limit_is_ignored() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 2, 2);
        assert_eq!(set_divisions(&grid, u32::MAX, 2), grid);
        assert_eq!(set_divisions(&grid, 2, MAX_TRACKS + 1), grid);
        let widest = set_divisions(&Grid::new(300.0, 200.0), MAX_TRACKS, 1);
        assert_eq!(widest.columns(), MAX_TRACKS);
        widest.validate().expect("valid");
    }
}
