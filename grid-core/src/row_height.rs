//! # Row Resizing
//!
//! Drag-resizing a row's height from its resize handle.
//!
//! ```text
//!   press on handle        pointer moves            release
//!   Idle ──────────────▶ Resizing ──────────▶ Resizing ──────────▶ Idle
//!                         (row, start_y,     writes line_height    last height
//!                          start_height)     for the whole row     is kept
//! ```
//!
//! There is no cancel: releasing always keeps the last height written.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::grid::Grid;
use crate::{GridError, GridResult};

/// State of a row resize interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowResizeState {
    /// No resize in progress.
    #[default]
    Idle,
    /// A row handle is being dragged.
    Resizing {
        /// Row being resized.
        row: u32,
        /// Pointer Y when the drag started.
        start_pointer_y: f32,
        /// Row height when the drag started.
        start_height: f32,
        /// Height written by the latest move.
        last_height: f32,
    },
}

/// Row-height drag controller.
#[derive(Debug, Clone)]
pub struct RowResizer {
    state: RowResizeState,
    /// Pointer pixels per unit of height.
    scale: f32,
    /// Height of rows without an override.
    default_height: f32,
    /// Lower bound for dragged heights.
    min_height: f32,
}

impl RowResizer {
    /// Create a controller with the builder's defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a controller from engine configuration.
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            state: RowResizeState::Idle,
            scale: config.row_resize_scale,
            default_height: config.default_row_height,
            min_height: config.min_row_height,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RowResizeState {
        self.state
    }

    /// Check if a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, RowResizeState::Resizing { .. })
    }

    /// Start resizing `row` from pointer position `pointer_y`.
    ///
    /// Returns `Ok(false)` and stays idle if the row does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ResizeInProgress`] if another resize is active;
    /// the active session is left untouched.
    pub fn begin(&mut self, grid: &Grid, row: u32, pointer_y: f32) -> GridResult<bool> {
        if let RowResizeState::Resizing { row: active, .. } = self.state {
            return Err(GridError::ResizeInProgress { active });
        }
        if row >= grid.rows() || !pointer_y.is_finite() {
            tracing::debug!("Ignoring resize start on row {row}");
            return Ok(false);
        }
        let start_height = grid.row_height(row).unwrap_or(self.default_height);
        self.state = RowResizeState::Resizing {
            row,
            start_pointer_y: pointer_y,
            start_height,
            last_height: start_height,
        };
        tracing::debug!("Resizing row {row} from height {start_height}");
        Ok(true)
    }

    /// Apply a pointer move, returning the grid with the row's new height.
    ///
    /// While idle the grid is returned unchanged.
    #[must_use]
    pub fn drag(&mut self, grid: &Grid, pointer_y: f32) -> Grid {
        let RowResizeState::Resizing {
            row,
            start_pointer_y,
            start_height,
            ..
        } = self.state
        else {
            return grid.clone();
        };
        if !pointer_y.is_finite() {
            return grid.clone();
        }
        let height =
            (start_height + (pointer_y - start_pointer_y) / self.scale).max(self.min_height);
        if !height.is_finite() {
            return grid.clone();
        }
        self.state = RowResizeState::Resizing {
            row,
            start_pointer_y,
            start_height,
            last_height: height,
        };

        let mut next = grid.clone();
        next.set_row_height(row, height);
        next
    }

    /// Finish the drag, returning the committed height if one was active.
    pub fn release(&mut self) -> Option<f32> {
        match std::mem::take(&mut self.state) {
            RowResizeState::Resizing {
                row, last_height, ..
            } => {
                tracing::debug!("Row {row} committed at height {last_height}");
                Some(last_height)
            }
            RowResizeState::Idle => None,
        }
    }
}

impl Default for RowResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize::set_divisions;

    fn grid() -> Grid {
        set_divisions(&Grid::new(300.0, 200.0), 3, 2)
    }

    #[test]
    fn test_drag_sets_height_for_whole_row() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        assert!(resizer.begin(&grid, 1, 100.0).expect("begin"));

        let grid = resizer.drag(&grid, 150.0);
        for division in grid.divisions().iter().filter(|d| d.y == 1) {
            assert_eq!(division.line_height, Some(15.0));
        }
        assert_eq!(grid.row_height(0), None);
        grid.validate().expect("row heights consistent");
    }

    #[test]
    fn test_drag_is_relative_to_start() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        resizer.begin(&grid, 0, 40.0).expect("begin");
        let grid = resizer.drag(&grid, 60.0);
        let grid = resizer.drag(&grid, 50.0);
        assert_eq!(grid.row_height(0), Some(11.0));
    }

    #[test]
    fn test_height_never_drops_below_minimum() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        resizer.begin(&grid, 0, 500.0).expect("begin");
        let grid = resizer.drag(&grid, 0.0);
        assert_eq!(grid.row_height(0), Some(1.0));
    }

    #[test]
    fn test_release_commits_last_height() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        resizer.begin(&grid, 0, 0.0).expect("begin");
        let grid = resizer.drag(&grid, 30.0);
        assert_eq!(resizer.release(), Some(13.0));
        assert!(!resizer.is_active());

        let after = resizer.drag(&grid, 300.0);
        assert_eq!(after.row_height(0), Some(13.0));
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        resizer.begin(&grid, 0, 0.0).expect("begin");
        let result = resizer.begin(&grid, 1, 0.0);
        assert!(matches!(
            result,
            Err(GridError::ResizeInProgress { active: 0 })
        ));
        assert!(matches!(
            resizer.state(),
            RowResizeState::Resizing { row: 0, .. }
        ));
    }

    #[test]
    fn test_begin_on_missing_row_stays_idle() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        assert!(!resizer.begin(&grid, 5, 0.0).expect("ignored"));
        assert!(!resizer.is_active());
        assert_eq!(resizer.release(), None);
    }

    #[test]
    fn test_begin_uses_existing_override() {
        let grid = grid();
        let mut resizer = RowResizer::new();
        resizer.begin(&grid, 0, 0.0).expect("begin");
        let grid = resizer.drag(&grid, 100.0);
        resizer.release();

        resizer.begin(&grid, 0, 0.0).expect("begin");
        let grid = resizer.drag(&grid, 10.0);
        assert_eq!(grid.row_height(0), Some(21.0));
    }

    #[test]
    fn test_unusable_scale_leaves_grid_unchanged() {
        let grid = grid();
        let config = EngineConfig {
            row_resize_scale: 0.0,
            ..EngineConfig::default()
        };
        let mut resizer = RowResizer::with_config(&config);
        resizer.begin(&grid, 0, 0.0).expect("begin");
        let after = resizer.drag(&grid, 10.0);
        assert_eq!(after, grid);
        after.validate().expect("still valid");
    }
}
