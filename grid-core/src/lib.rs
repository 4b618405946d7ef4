//! # Grid Core
//!
//! Partition and placement engine for a grid-based canvas editor.
//! Compiles to WASM so the same engine drives the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  grid-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Grid Model      │  Editor                  │
//! │  - Divisions     │  - Event dispatch        │
//! │  - Widgets       │  - Placement strategies  │
//! │  - Tiling rules  │  - Row resize sessions   │
//! ├─────────────────────────────────────────────┤
//! │  Operations      │  Persistence             │
//! │  - Resize        │  - Grid documents        │
//! │  - Merge         │  - Multi-grid store      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! A [`Grid`] is an immutable snapshot: every operation takes `&Grid` and
//! returns the next one, so hosts can diff, persist or undo freely.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod division;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod merge;
pub mod placement;
pub mod resize;
pub mod row_height;
pub mod schema;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{
    EngineConfig, NeighborRule, ResolutionStrategy, DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_TRACKS,
};
pub use division::{Axis, Cell, Division, DivisionId, Widget, WidgetId, WidgetKind};
pub use editor::Editor;
pub use error::{GridError, GridResult};
pub use event::{DivisionBox, EditorEvent};
pub use geometry::{GridLayoutKey, LayoutGeometry, Point, Rect};
pub use grid::{Extents, Grid, GridId};
pub use merge::expand;
pub use placement::{IndexResolver, NearestCenterResolver, PlacementStrategy};
pub use resize::set_divisions;
pub use row_height::{RowResizeState, RowResizer};
pub use schema::GridDocument;
pub use store::{GridStore, StoreError};

/// Grid core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
