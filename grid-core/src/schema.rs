//! Canonical serialized representation of a grid.
//!
//! The document stores the grid tree verbatim: ids, coordinates, spans, row
//! heights and widgets, plus the id counter so that ids issued after a reload
//! keep increasing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::division::Division;
use crate::grid::{Grid, GridId};
use crate::{GridError, GridResult};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Canvas size information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Canonical grid document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDocument {
    /// Format version.
    #[serde(default = "GridDocument::default_version")]
    pub version: u32,
    /// Grid identifier.
    pub grid_id: String,
    /// Canvas metadata.
    pub canvas: CanvasDocument,
    /// Highest id issued to a division or widget.
    #[serde(default)]
    pub last_issued_id: u64,
    /// Divisions in store order.
    pub divisions: Vec<Division>,
    /// Timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: u64,
}

impl GridDocument {
    const fn default_version() -> u32 {
        DOCUMENT_VERSION
    }

    /// Build a document from a grid snapshot.
    #[must_use]
    pub fn from_grid(grid: &Grid, timestamp: u64) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            grid_id: grid.id.to_string(),
            canvas: CanvasDocument {
                width: grid.width,
                height: grid.height,
            },
            last_issued_id: grid.last_issued_id(),
            divisions: grid.divisions().to_vec(),
            timestamp,
        }
    }

    /// Materialize the grid, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is unsupported, the grid id is not a
    /// UUID, or the divisions break the tiling invariants.
    pub fn into_grid(self) -> GridResult<Grid> {
        if self.version > DOCUMENT_VERSION {
            return Err(GridError::InvalidDocument(format!(
                "unsupported version {}",
                self.version
            )));
        }
        let id = GridId::parse(&self.grid_id)
            .map_err(|e| GridError::InvalidDocument(format!("grid id: {e}")))?;
        Grid::from_parts(
            id,
            self.canvas.width,
            self.canvas.height,
            self.divisions,
            self.last_issued_id,
        )
    }
}

impl From<Grid> for GridDocument {
    fn from(grid: Grid) -> Self {
        Self::from_grid(&grid, current_timestamp_ms())
    }
}

impl TryFrom<GridDocument> for Grid {
    type Error = GridError;

    fn try_from(document: GridDocument) -> Result<Self, Self::Error> {
        document.into_grid()
    }
}

/// Get the current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::{DivisionId, WidgetKind};
    use crate::resize::set_divisions;

    #[test]
    fn document_preserves_grid() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 2, 2);
        let (grid, widget) = grid.place_widget(DivisionId(3), WidgetKind::Title);
        let grid = grid.edit_widget(widget.expect("placed"), "Hello");

        let json = serde_json::to_string(&GridDocument::from_grid(&grid, 42)).expect("serialize");
        let doc: GridDocument = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(doc.timestamp, 42);
        let restored = doc.into_grid().expect("valid");
        assert_eq!(restored, grid);
    }

    #[test]
    fn grid_serde_goes_through_document() {
        let grid = set_divisions(&Grid::new(300.0, 200.0), 3, 1);
        let json = serde_json::to_string(&grid).expect("serialize");
        assert!(json.contains("\"grid_id\""));
        let restored: Grid = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, grid);
        assert!(restored.find_division(2, 0).is_some());
    }

    fn document(divisions: &str) -> GridDocument {
        let json = format!(
            r#"{{"grid_id":"{}","canvas":{{"width":100.0,"height":100.0}},
               "divisions":[{divisions}]}}"#,
            GridId::new()
        );
        serde_json::from_str(&json).expect("parse")
    }

    #[test]
    fn overlapping_document_is_rejected() {
        // Same total area as a 2x2 grid: (1,0) covered twice, (1,1) not at all.
        let doc = document(
            r#"{"id":0,"x":0,"y":0,"colspan_x":2,"colspan_y":1},
               {"id":1,"x":1,"y":0,"colspan_x":1,"colspan_y":1},
               {"id":2,"x":0,"y":1,"colspan_x":1,"colspan_y":1}"#,
        );
        assert!(matches!(
            doc.into_grid(),
            Err(GridError::TilingViolation { count: 2, .. })
        ));
    }

    #[test]
    fn overflowing_span_is_rejected() {
        let doc = document(r#"{"id":0,"x":4294967295,"y":0,"colspan_x":2,"colspan_y":1}"#);
        assert!(matches!(
            doc.into_grid(),
            Err(GridError::InvalidSpan(DivisionId(0)))
        ));
    }

    #[test]
    fn huge_span_is_rejected_without_walking_cells() {
        let doc = document(r#"{"id":0,"x":0,"y":0,"colspan_x":4000000000,"colspan_y":1}"#);
        assert!(matches!(
            doc.into_grid(),
            Err(GridError::OutOfBounds {
                division: DivisionId(0),
                ..
            })
        ));
    }

    #[test]
    fn area_mismatch_is_rejected_before_cell_walk() {
        let doc = document(
            r#"{"id":0,"x":0,"y":0,"colspan_x":300,"colspan_y":300},
               {"id":1,"x":0,"y":0,"colspan_x":300,"colspan_y":300}"#,
        );
        assert!(matches!(
            doc.into_grid(),
            Err(GridError::CoverageMismatch {
                covered: 180_000,
                expected: 90_000
            })
        ));
    }

    #[test]
    fn invalid_grid_id_is_rejected() {
        let json = r#"{"grid_id":"not-a-uuid","canvas":{"width":1.0,"height":1.0},
                       "divisions":[{"id":0,"x":0,"y":0,"colspan_x":1,"colspan_y":1}]}"#;
        let doc: GridDocument = serde_json::from_str(json).expect("parse");
        assert!(matches!(doc.into_grid(), Err(GridError::InvalidDocument(_))));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut doc = GridDocument::from_grid(&Grid::new(10.0, 10.0), 0);
        doc.version = DOCUMENT_VERSION + 1;
        assert!(doc.into_grid().is_err());
    }
}
