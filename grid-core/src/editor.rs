//! Event dispatch for one canvas.
//!
//! The [`Editor`] owns interaction state only: configuration, the row resize
//! session and the latest measured geometry. The grid itself is owned by the
//! caller, passed into every call and returned as a new snapshot.

use crate::config::{EngineConfig, ResolutionStrategy};
use crate::division::{Axis, DivisionId, WidgetId, WidgetKind};
use crate::event::{DivisionBox, EditorEvent};
use crate::geometry::{LayoutGeometry, Point};
use crate::grid::Grid;
use crate::placement::{IndexResolver, NearestCenterResolver, PlacementStrategy};
use crate::row_height::RowResizer;
use crate::{merge, resize, GridResult};

/// Interaction state and event dispatch for a grid canvas.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EngineConfig,
    resizer: RowResizer,
    geometry: LayoutGeometry,
}

impl Editor {
    /// Create an editor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an editor with custom configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            resizer: RowResizer::with_config(&config),
            geometry: LayoutGeometry::new(),
            config,
        }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Latest measured geometry.
    #[must_use]
    pub const fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// Row resize controller.
    #[must_use]
    pub const fn row_resizer(&self) -> &RowResizer {
        &self.resizer
    }

    /// Create an empty grid with the configured canvas size.
    #[must_use]
    pub fn new_grid(&self) -> Grid {
        Grid::new(self.config.default_width, self.config.default_height)
    }

    /// Process an event against `grid`, returning the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ResizeInProgress`](crate::GridError::ResizeInProgress)
    /// if a row resize starts while another is active. Every other event is
    /// infallible; ignored input returns the grid unchanged.
    pub fn handle(&mut self, grid: &Grid, event: &EditorEvent) -> GridResult<Grid> {
        let next = match event {
            EditorEvent::Drop { kind, x, y } => self.drop_widget(grid, *kind, Point::new(*x, *y)).0,
            EditorEvent::CanvasResize { width, height } => grid.resized(*width, *height),
            EditorEvent::DivisionCount { columns, rows } => {
                if *columns > self.config.max_tracks || *rows > self.config.max_tracks {
                    tracing::debug!(
                        "Division count {}x{} exceeds configured limit {}; ignored",
                        columns,
                        rows,
                        self.config.max_tracks
                    );
                    grid.clone()
                } else {
                    resize::set_divisions(grid, *columns, *rows)
                }
            }
            EditorEvent::Expand { division, axis } => self.expand(grid, *division, *axis),
            EditorEvent::RowResizeStart { row, pointer_y } => {
                self.resizer.begin(grid, *row, *pointer_y)?;
                grid.clone()
            }
            EditorEvent::RowResizeMove { pointer_y } => self.resizer.drag(grid, *pointer_y),
            EditorEvent::RowResizeEnd => {
                self.resizer.release();
                grid.clone()
            }
            EditorEvent::ContentEdit { widget, text } => grid.edit_widget(*widget, text.as_str()),
            EditorEvent::Layout { boxes } => {
                self.record_layout(grid, boxes);
                grid.clone()
            }
        };
        if event.changes_layout() {
            self.geometry.clear();
        }
        Ok(next)
    }

    /// Resolve a pointer offset with the configured strategy.
    #[must_use]
    pub fn resolve(&self, grid: &Grid, pointer: Point) -> Option<DivisionId> {
        match self.config.strategy {
            ResolutionStrategy::Index => IndexResolver.resolve(grid, pointer),
            ResolutionStrategy::NearestCenter => {
                NearestCenterResolver::new(&self.geometry).resolve(grid, pointer)
            }
        }
    }

    /// Drop a new widget at `pointer`.
    ///
    /// Returns the widget id, or `None` if the pointer resolved to no
    /// division, in which case the widget is discarded.
    #[must_use]
    pub fn drop_widget(
        &self,
        grid: &Grid,
        kind: WidgetKind,
        pointer: Point,
    ) -> (Grid, Option<WidgetId>) {
        match self.resolve(grid, pointer) {
            Some(division) => {
                tracing::debug!("Dropped {kind:?} on division {division}");
                grid.place_widget(division, kind)
            }
            None => {
                tracing::debug!("Drop at ({}, {}) matched no division", pointer.x, pointer.y);
                (grid.clone(), None)
            }
        }
    }

    /// Merge `division` with its neighbor using the configured rule.
    #[must_use]
    pub fn expand(&self, grid: &Grid, division: DivisionId, axis: Axis) -> Grid {
        merge::expand(grid, division, axis, self.config.neighbor_rule)
    }

    /// Replace the measured geometry with a pass over `grid`. Boxes for
    /// unknown divisions are skipped.
    pub fn record_layout(&mut self, grid: &Grid, boxes: &[DivisionBox]) {
        self.geometry.begin_pass(grid);
        for measured in boxes {
            if let Some(division) = grid.find_by_id(measured.division) {
                self.geometry.record(division, measured.rect);
            }
        }
        tracing::debug!(
            "Recorded {} of {} division boxes",
            self.geometry.len(),
            boxes.len()
        );
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
