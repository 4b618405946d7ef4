//! Error types for grid operations.
//!
//! Most engine operations never fail: malformed requests and unknown ids are
//! ignored. These errors cover the places where a caller has to be told
//! something, such as loading a document that breaks the tiling invariant.

use thiserror::Error;

use crate::division::{Cell, DivisionId};

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur in grid operations.
#[derive(Debug, Error)]
pub enum GridError {
    /// Two divisions share the same id.
    #[error("Duplicate division id: {0}")]
    DuplicateDivision(DivisionId),

    /// A division has a zero colspan on some axis.
    #[error("Division {0} has an empty span")]
    InvalidSpan(DivisionId),

    /// A unit cell is not covered by exactly one division.
    #[error("Tiling violation at {cell}: covered {count} times")]
    TilingViolation {
        /// The offending unit cell.
        cell: Cell,
        /// How many divisions cover it.
        count: usize,
    },

    /// Divisions on the same row disagree about the row height.
    #[error("Inconsistent line height on row {0}")]
    InconsistentRowHeight(u32),

    /// A row resize was started while another one is still active.
    #[error("Row {active} is already being resized")]
    ResizeInProgress {
        /// Row of the active session.
        active: u32,
    },

    /// A division reaches past the largest supported column or row.
    #[error("Division {division} reaches past track limit {limit}")]
    OutOfBounds {
        /// The offending division.
        division: DivisionId,
        /// Largest supported number of columns or rows.
        limit: u32,
    },

    /// The divisions' combined area differs from the area of their extents.
    #[error("Divisions cover {covered} cells but the grid has {expected}")]
    CoverageMismatch {
        /// Sum of every division's area.
        covered: u64,
        /// Cells inside the grid's extents.
        expected: u64,
    },

    /// An engine configuration value is out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Invalid grid document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
