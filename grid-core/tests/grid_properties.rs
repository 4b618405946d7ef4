//! Property tests for the grid tiling invariants.

use std::collections::BTreeSet;

use grid_core::{
    expand, set_divisions, Axis, Grid, IndexResolver, NeighborRule, PlacementStrategy, Point,
    RowResizer, WidgetKind,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    SetDivisions(u32, u32),
    Expand(usize, Axis, NeighborRule),
    Drop(usize, WidgetKind),
    Remove(usize),
    /// Drag the handle of row `selector % rows` by `dy` pointer pixels.
    RowResize(usize, f32),
}

fn arb_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y)]
}

fn arb_rule() -> impl Strategy<Value = NeighborRule> {
    prop_oneof![
        Just(NeighborRule::FirstInStoreOrder),
        Just(NeighborRule::Nearest)
    ]
}

fn arb_kind() -> impl Strategy<Value = WidgetKind> {
    prop_oneof![
        Just(WidgetKind::Title),
        Just(WidgetKind::Image),
        Just(WidgetKind::Button)
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..6, 1u32..6).prop_map(|(c, r)| Op::SetDivisions(c, r)),
        (any::<usize>(), arb_axis(), arb_rule()).prop_map(|(i, a, r)| Op::Expand(i, a, r)),
        (any::<usize>(), arb_kind()).prop_map(|(i, k)| Op::Drop(i, k)),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), -500.0f32..500.0).prop_map(|(i, dy)| Op::RowResize(i, dy)),
    ]
}

/// Apply `op`, picking its target division by `selector % count`.
fn apply(grid: &Grid, op: &Op) -> Grid {
    let pick = |selector: usize| grid.divisions()[selector % grid.division_count()].id;
    match *op {
        Op::SetDivisions(c, r) => set_divisions(grid, c, r),
        Op::Expand(i, axis, rule) => expand(grid, pick(i), axis, rule),
        Op::Drop(i, kind) => grid.place_widget(pick(i), kind).0,
        Op::Remove(i) => grid.remove_division(pick(i)),
        Op::RowResize(i, dy) => {
            let row = u32::try_from(i % grid.rows() as usize).unwrap_or(0);
            let mut resizer = RowResizer::new();
            let started = resizer.begin(grid, row, 0.0).unwrap_or(false);
            assert!(started, "row {row} exists");
            let next = resizer.drag(grid, dy);
            resizer.release();
            next
        }
    }
}

fn run(ops: &[Op]) -> Grid {
    ops.iter().fold(Grid::default(), |grid, op| apply(&grid, op))
}

fn spans(grid: &Grid) -> BTreeSet<(u32, u32, u32, u32)> {
    grid.divisions()
        .iter()
        .map(|d| (d.x, d.y, d.colspan_x, d.colspan_y))
        .collect()
}

fn issued_ids(grid: &Grid) -> BTreeSet<u64> {
    grid.divisions()
        .iter()
        .flat_map(|d| std::iter::once(d.id.0).chain(d.widgets.iter().map(|w| w.id.0)))
        .collect()
}

proptest! {
    #[test]
    fn prop_every_operation_keeps_tiling(ops in prop::collection::vec(arb_op(), 0..20)) {
        let mut grid = Grid::default();
        for op in &ops {
            grid = apply(&grid, op);
            prop_assert!(
                grid.validate().is_ok(),
                "tiling broken after {:?}: {:?}",
                op,
                grid.validate()
            );
        }
    }

    #[test]
    fn prop_row_resize_sets_one_height_per_row(
        ops in prop::collection::vec(arb_op(), 0..15),
        selector in any::<usize>(),
        dy in -500.0f32..500.0,
    ) {
        let grid = run(&ops);
        let row = u32::try_from(selector % grid.rows() as usize).unwrap_or(0);
        let resized = apply(&grid, &Op::RowResize(selector, dy));
        prop_assert!(resized.validate().is_ok(), "{:?}", resized.validate());
        let height = resized.row_height(row);
        // A row covered only by taller divisions from above has no height of its own.
        if resized.divisions().iter().any(|d| d.y == row) {
            prop_assert!(height.is_some_and(|h| h.is_finite() && h >= 1.0));
        } else {
            prop_assert_eq!(height, None);
        }
        for division in resized.divisions().iter().filter(|d| d.y == row) {
            prop_assert_eq!(division.line_height, height);
        }
        prop_assert_eq!(spans(&resized), spans(&grid));
    }

    #[test]
    fn prop_new_ids_exceed_all_previous(ops in prop::collection::vec(arb_op(), 1..20)) {
        let mut grid = Grid::default();
        for op in &ops {
            let before = issued_ids(&grid);
            let last = grid.last_issued_id();
            grid = apply(&grid, op);
            for id in issued_ids(&grid).difference(&before) {
                prop_assert!(*id > last, "id {} issued after {}", id, last);
            }
            prop_assert!(grid.last_issued_id() >= last);
        }
    }

    #[test]
    fn prop_set_divisions_is_idempotent(
        ops in prop::collection::vec(arb_op(), 0..10),
        columns in 1u32..6,
        rows in 1u32..6,
    ) {
        let once = set_divisions(&run(&ops), columns, rows);
        prop_assert_eq!(once.columns(), columns);
        prop_assert_eq!(once.rows(), rows);
        let twice = set_divisions(&once, columns, rows);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_axis_order_does_not_change_spans(
        ops in prop::collection::vec(arb_op(), 0..10),
        columns in 1u32..6,
        rows in 1u32..6,
    ) {
        let grid = run(&ops);
        let columns_first = set_divisions(&grid, columns, rows);
        let rows_first = set_divisions(&set_divisions(&grid, grid.columns(), rows), columns, rows);
        prop_assert_eq!(spans(&columns_first), spans(&rows_first));
    }

    #[test]
    fn prop_grow_then_shrink_leaves_origin(columns in 1u32..6, rows in 1u32..6) {
        let grid = set_divisions(&Grid::default(), columns, rows);
        let grid = set_divisions(&grid, 1, 1);
        prop_assert_eq!(grid.division_count(), 1);
        let only = &grid.divisions()[0];
        prop_assert_eq!((only.x, only.y, only.colspan_x, only.colspan_y), (0, 0, 1, 1));
    }

    #[test]
    fn prop_index_resolution_is_deterministic(
        ops in prop::collection::vec(arb_op(), 0..15),
        selector in any::<usize>(),
    ) {
        let grid = run(&ops);
        let division = &grid.divisions()[selector % grid.division_count()];
        let cell_width = grid.width / grid.columns() as f32;
        let cell_height = grid.height / grid.rows() as f32;
        // Center of the division's origin cell
        let pointer = Point::new(
            (division.x as f32 + 0.5) * cell_width,
            (division.y as f32 + 0.5) * cell_height,
        );
        for _ in 0..3 {
            prop_assert_eq!(IndexResolver.resolve(&grid, pointer), Some(division.id));
        }
    }
}
