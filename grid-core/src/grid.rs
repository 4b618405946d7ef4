//! The division store: an immutable snapshot of one grid's divisions.
//!
//! Every public operation takes `&self` and returns a new [`Grid`], so a
//! reader holding an older snapshot never observes a half-applied edit. The
//! crate-internal `&mut` helpers are only ever applied to a fresh clone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MAX_TRACKS;
use crate::division::{Cell, Division, DivisionId, Widget, WidgetId, WidgetKind};
use crate::schema::GridDocument;
use crate::{GridError, GridResult};

/// Unique identifier for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridId(Uuid);

impl GridId {
    /// Create a new unique grid ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a grid ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for GridId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The largest occupied column and row index (0-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extents {
    /// Largest covered column index.
    pub max_x: u32,
    /// Largest covered row index.
    pub max_y: u32,
}

impl Extents {
    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.max_x + 1
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.max_y + 1
    }
}

/// A canvas partitioned into non-overlapping divisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridDocument", into = "GridDocument")]
pub struct Grid {
    /// Grid identifier.
    pub id: GridId,
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Divisions in store order.
    divisions: Vec<Division>,
    /// Highest id issued to a division or widget.
    last_id: u64,
    /// Position in `divisions` of the division covering each unit cell.
    by_cell: HashMap<Cell, usize>,
    /// Position in `divisions` of each division id.
    by_id: HashMap<DivisionId, usize>,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.width.to_bits() == other.width.to_bits()
            && self.height.to_bits() == other.height.to_bits()
            && self.last_id == other.last_id
            && self.divisions == other.divisions
    }
}

impl Grid {
    /// Create a grid with a single 1x1 division at `(0, 0)`.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let mut grid = Self {
            id: GridId::new(),
            width,
            height,
            divisions: vec![Division::new(DivisionId(0), 0, 0)],
            last_id: 0,
            by_cell: HashMap::new(),
            by_id: HashMap::new(),
        };
        grid.reindex();
        grid
    }

    /// Rebuild a grid from stored parts, checking every invariant.
    ///
    /// A `last_id` lower than an id already in use is raised so that new ids
    /// stay unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the divisions do not tile the grid, share ids, have
    /// empty spans or disagree about a row height.
    pub fn from_parts(
        id: GridId,
        width: f32,
        height: f32,
        divisions: Vec<Division>,
        last_id: u64,
    ) -> GridResult<Self> {
        if divisions.is_empty() {
            return Err(GridError::InvalidDocument("grid has no divisions".into()));
        }
        let highest = divisions
            .iter()
            .flat_map(|d| std::iter::once(d.id.0).chain(d.widgets.iter().map(|w| w.id.0)))
            .max()
            .unwrap_or(0);
        let mut grid = Self {
            id,
            width,
            height,
            divisions,
            last_id: last_id.max(highest),
            by_cell: HashMap::new(),
            by_id: HashMap::new(),
        };
        grid.validate()?;
        grid.reindex();
        Ok(grid)
    }

    /// Get all divisions in store order.
    #[must_use]
    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    /// Number of divisions.
    #[must_use]
    pub fn division_count(&self) -> usize {
        self.divisions.len()
    }

    /// Highest id issued so far.
    #[must_use]
    pub const fn last_issued_id(&self) -> u64 {
        self.last_id
    }

    /// Find the division whose top-left cell is `(x, y)`.
    #[must_use]
    pub fn find_division(&self, x: u32, y: u32) -> Option<&Division> {
        self.division_covering(x, y).filter(|d| d.x == x && d.y == y)
    }

    /// Find the division whose span covers `(x, y)`.
    #[must_use]
    pub fn division_covering(&self, x: u32, y: u32) -> Option<&Division> {
        self.by_cell
            .get(&Cell::new(x, y))
            .and_then(|&idx| self.divisions.get(idx))
    }

    /// Find a division by id.
    #[must_use]
    pub fn find_by_id(&self, id: DivisionId) -> Option<&Division> {
        self.by_id.get(&id).and_then(|&idx| self.divisions.get(idx))
    }

    /// Find a widget and the division holding it.
    #[must_use]
    pub fn find_widget(&self, id: WidgetId) -> Option<(&Division, &Widget)> {
        self.divisions.iter().find_map(|division| {
            division
                .widgets
                .iter()
                .find(|w| w.id == id)
                .map(|widget| (division, widget))
        })
    }

    /// Total number of widgets across all divisions.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.divisions.iter().map(|d| d.widgets.len()).sum()
    }

    /// The largest covered column and row, `{0, 0}` for an empty grid.
    #[must_use]
    pub fn max_extents(&self) -> Extents {
        self.divisions
            .iter()
            .fold(Extents::default(), |acc, d| Extents {
                max_x: acc.max_x.max(d.right()),
                max_y: acc.max_y.max(d.bottom()),
            })
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.max_extents().columns()
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.max_extents().rows()
    }

    /// Height override of a row, if one has been set.
    #[must_use]
    pub fn row_height(&self, row: u32) -> Option<f32> {
        self.divisions
            .iter()
            .filter(|d| d.y == row)
            .find_map(|d| d.line_height)
    }

    /// Height of every row, using `default` where no override exists.
    #[must_use]
    pub fn row_heights(&self, default: f32) -> Vec<f32> {
        (0..self.rows())
            .map(|row| self.row_height(row).unwrap_or(default))
            .collect()
    }

    /// Add a 1x1 division at `(x, y)`.
    ///
    /// Returns the unchanged grid and `None` if the cell is already covered
    /// or lies past [`MAX_TRACKS`].
    /// Cells left uncovered between the existing extents and the new division
    /// are filled with empty 1x1 divisions.
    #[must_use]
    pub fn add_division(&self, x: u32, y: u32) -> (Self, Option<DivisionId>) {
        if x >= MAX_TRACKS || y >= MAX_TRACKS {
            tracing::debug!("Cell ({x}, {y}) is past the track limit; division not added");
            return (self.clone(), None);
        }
        if self.division_covering(x, y).is_some() {
            tracing::debug!("Cell ({x}, {y}) already covered; division not added");
            return (self.clone(), None);
        }
        let mut next = self.clone();
        let id = next.push_division(x, y);
        let extents = next.max_extents();
        next.refill(extents.columns(), extents.rows());
        (next, Some(id))
    }

    /// Remove a division by id.
    ///
    /// The division's widgets are discarded. Its cells that remain inside the
    /// grid's extents are refilled with empty 1x1 divisions. Unknown ids leave
    /// the grid unchanged.
    #[must_use]
    pub fn remove_division(&self, id: DivisionId) -> Self {
        if self.find_by_id(id).is_none() {
            tracing::debug!("Division {id} not found; nothing removed");
            return self.clone();
        }
        let mut next = self.clone();
        next.retain_divisions(|d| d.id != id);
        let extents = next.max_extents();
        next.refill(extents.columns(), extents.rows());
        next
    }

    /// Append a new widget of `kind` to a division.
    ///
    /// Returns `None` for the widget id if the division does not exist.
    #[must_use]
    pub fn place_widget(
        &self,
        division: DivisionId,
        kind: WidgetKind,
    ) -> (Self, Option<WidgetId>) {
        let Some(&idx) = self.by_id.get(&division) else {
            tracing::debug!("Drop target {division} not found; widget discarded");
            return (self.clone(), None);
        };
        let mut next = self.clone();
        let id = WidgetId(next.allocate_id());
        next.divisions[idx].widgets.push(Widget::new(id, kind));
        (next, Some(id))
    }

    /// Replace the text of a widget. Unknown widgets are ignored.
    #[must_use]
    pub fn edit_widget(&self, widget: WidgetId, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        let target = next
            .divisions
            .iter_mut()
            .flat_map(|d| d.widgets.iter_mut())
            .find(|w| w.id == widget);
        match target {
            Some(w) => w.text = Some(text.into()),
            None => tracing::debug!("Widget {widget} not found; edit ignored"),
        }
        next
    }

    /// Change the canvas pixel size.
    ///
    /// `None`, non-finite and non-positive values keep the current extent.
    #[must_use]
    pub fn resized(&self, width: Option<f32>, height: Option<f32>) -> Self {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        let mut next = self.clone();
        if let Some(w) = width.filter(|&w| valid(w)) {
            next.width = w;
        }
        if let Some(h) = height.filter(|&h| valid(h)) {
            next.height = h;
        }
        next
    }

    /// Check every structural invariant.
    ///
    /// Spans are bounds-checked and the total area compared with the
    /// extents before any cell is visited, so hostile documents are rejected
    /// without walking their cells.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> GridResult<()> {
        let mut ids = std::collections::HashSet::new();
        let mut row_heights: HashMap<u32, Option<f32>> = HashMap::new();
        let mut covered: u64 = 0;

        for division in &self.divisions {
            if !ids.insert(division.id) {
                return Err(GridError::DuplicateDivision(division.id));
            }
            if division.colspan_x == 0 || division.colspan_y == 0 {
                return Err(GridError::InvalidSpan(division.id));
            }
            let right = division.x.checked_add(division.colspan_x - 1);
            let bottom = division.y.checked_add(division.colspan_y - 1);
            match (right, bottom) {
                (Some(r), Some(b)) if r < MAX_TRACKS && b < MAX_TRACKS => {}
                (Some(_), Some(_)) => {
                    return Err(GridError::OutOfBounds {
                        division: division.id,
                        limit: MAX_TRACKS,
                    })
                }
                _ => return Err(GridError::InvalidSpan(division.id)),
            }
            covered = covered.saturating_add(division.area());
            let seen = row_heights.entry(division.y).or_insert(division.line_height);
            if seen.map(f32::to_bits) != division.line_height.map(f32::to_bits) {
                return Err(GridError::InconsistentRowHeight(division.y));
            }
        }

        let extents = self.max_extents();
        let expected = u64::from(extents.columns()) * u64::from(extents.rows());
        if covered != expected {
            return Err(GridError::CoverageMismatch { covered, expected });
        }

        let mut coverage: HashMap<Cell, usize> = HashMap::new();
        for division in &self.divisions {
            for cell in division.cells() {
                *coverage.entry(cell).or_default() += 1;
            }
        }
        for y in 0..=extents.max_y {
            for x in 0..=extents.max_x {
                let cell = Cell::new(x, y);
                let count = coverage.get(&cell).copied().unwrap_or(0);
                if count != 1 {
                    return Err(GridError::TilingViolation { cell, count });
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // In-place helpers, only ever applied to a fresh clone
    // -----------------------------------------------------------------------

    pub(crate) fn allocate_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Push a 1x1 division, inheriting the row's height override.
    pub(crate) fn push_division(&mut self, x: u32, y: u32) -> DivisionId {
        let id = DivisionId(self.allocate_id());
        let division = Division::new(id, x, y).with_line_height(self.row_height(y));
        let idx = self.divisions.len();
        self.by_cell.insert(division.origin(), idx);
        self.by_id.insert(id, idx);
        self.divisions.push(division);
        id
    }

    /// Keep only divisions matching `keep`, returning the removed ones.
    pub(crate) fn retain_divisions<F>(&mut self, keep: F) -> Vec<Division>
    where
        F: Fn(&Division) -> bool,
    {
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.divisions)
            .into_iter()
            .partition(|d| keep(d));
        self.divisions = kept;
        self.reindex();

        let discarded: usize = removed.iter().map(|d| d.widgets.len()).sum();
        if discarded > 0 {
            tracing::info!(
                "Removed {} divisions, discarding {discarded} widgets",
                removed.len()
            );
        }
        removed
    }

    /// Fill every uncovered cell of `[0, columns) x [0, rows)` with a 1x1 division.
    pub(crate) fn refill(&mut self, columns: u32, rows: u32) {
        for y in 0..rows {
            for x in 0..columns {
                if !self.by_cell.contains_key(&Cell::new(x, y)) {
                    self.push_division(x, y);
                }
            }
        }
    }

    pub(crate) fn division_index(&self, id: DivisionId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub(crate) fn divisions_mut(&mut self) -> &mut [Division] {
        &mut self.divisions
    }

    /// Write `height` as the line height of every division starting on `row`.
    pub(crate) fn set_row_height(&mut self, row: u32, height: f32) {
        for division in self.divisions.iter_mut().filter(|d| d.y == row) {
            division.line_height = Some(height);
        }
    }

    pub(crate) fn reindex(&mut self) {
        self.by_cell.clear();
        self.by_id.clear();
        for (idx, division) in self.divisions.iter().enumerate() {
            self.by_id.insert(division.id, idx);
            for cell in division.cells() {
                self.by_cell.insert(cell, idx);
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WIDTH, crate::config::DEFAULT_HEIGHT)
    }
}
