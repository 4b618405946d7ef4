//! Merging a division with a neighbor along one axis.
//!
//! The neighbor is picked among divisions that start further along the axis
//! on the same cross-axis line, using a [`NeighborRule`]. The division then
//! absorbs the neighbor's span and the neighbor is removed, widgets included.
//! A neighbor that is not flush against the division, or whose cross-axis
//! span differs, would leave a gap or an overlap; such merges are skipped.

use crate::config::NeighborRule;
use crate::division::{Axis, Division, DivisionId};
use crate::grid::Grid;

/// Widen `division` along `axis` by absorbing its neighbor.
///
/// Unknown ids, a missing neighbor or a neighbor that cannot be merged
/// without breaking the tiling leave the grid unchanged. Widgets of the
/// absorbed neighbor are discarded.
#[must_use]
pub fn expand(grid: &Grid, division: DivisionId, axis: Axis, rule: NeighborRule) -> Grid {
    let Some(target) = grid.find_by_id(division) else {
        tracing::debug!("Division {division} not found; nothing to expand");
        return grid.clone();
    };
    let Some(neighbor) = find_neighbor(grid, target, axis, rule) else {
        tracing::debug!("Division {division} has no neighbor along {axis:?}");
        return grid.clone();
    };
    if !is_flush(target, neighbor, axis) {
        tracing::debug!(
            "Neighbor {} of division {division} is not adjacent; merge skipped",
            neighbor.id
        );
        return grid.clone();
    }

    let absorbed = neighbor.id;
    let gained = neighbor.span(axis);
    let mut next = grid.clone();
    next.retain_divisions(|d| d.id != absorbed);
    if let Some(idx) = next.division_index(division) {
        *next.divisions_mut()[idx].span_mut(axis) += gained;
    }
    next.reindex();
    tracing::debug!("Division {division} absorbed {absorbed} along {axis:?}");
    next
}

/// Pick the merge candidate for `target` according to `rule`.
#[must_use]
pub fn find_neighbor<'a>(
    grid: &'a Grid,
    target: &Division,
    axis: Axis,
    rule: NeighborRule,
) -> Option<&'a Division> {
    let cross = axis.cross();
    let mut candidates = grid.divisions().iter().filter(|d| {
        d.coord(axis) > target.coord(axis) && d.coord(cross) == target.coord(cross)
    });
    match rule {
        NeighborRule::FirstInStoreOrder => candidates.next(),
        NeighborRule::Nearest => candidates.min_by_key(|d| d.coord(axis)),
    }
}

/// Whether `neighbor` starts right after `target` and matches its cross span.
fn is_flush(target: &Division, neighbor: &Division, axis: Axis) -> bool {
    let cross = axis.cross();
    neighbor.coord(axis) == target.end(axis) + 1 && neighbor.span(cross) == target.span(cross)
}
