//! Divisions and widgets - the building blocks of a grid.

use serde::{Deserialize, Serialize};

/// Identifier of a division, unique within its grid.
///
/// Ids are issued by the grid from a monotonic counter, so a newer division
/// always has a larger id than every division or widget created before it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DivisionId(pub u64);

impl std::fmt::Display for DivisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a widget, drawn from the same counter as [`DivisionId`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit cell in the grid's integer index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column index.
    pub x: u32,
    /// Row index.
    pub y: u32,
}

impl Cell {
    /// Create a cell at the given column and row.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal (columns).
    X,
    /// Vertical (rows).
    Y,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// The type of content a widget renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// An editable heading.
    Title,
    /// An image placeholder.
    Image,
    /// A call-to-action button.
    Button,
}

impl WidgetKind {
    /// Text a freshly dropped widget of this kind starts with.
    #[must_use]
    pub fn default_text(self) -> Option<String> {
        match self {
            Self::Title => Some("Editable title".to_string()),
            Self::Button => Some("Click here".to_string()),
            Self::Image => None,
        }
    }
}

impl std::str::FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "image" => Ok(Self::Image),
            "button" => Ok(Self::Button),
            other => Err(format!("unknown widget kind: {other}")),
        }
    }
}

/// A content unit placed inside exactly one division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Unique identifier.
    pub id: WidgetId,
    /// What the widget renders.
    pub kind: WidgetKind,
    /// User-editable text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Widget {
    /// Create a widget with the default text for its kind.
    #[must_use]
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self {
            id,
            kind,
            text: kind.default_text(),
        }
    }
}

/// A rectangular cell of the grid, possibly spanning several unit cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    /// Unique identifier.
    pub id: DivisionId,
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Number of columns covered, at least 1.
    pub colspan_x: u32,
    /// Number of rows covered, at least 1.
    pub colspan_y: u32,
    /// Rendered height override shared by the whole row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    /// Widgets in drop order.
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Division {
    /// Create an empty 1x1 division at the given cell.
    #[must_use]
    pub fn new(id: DivisionId, x: u32, y: u32) -> Self {
        Self {
            id,
            x,
            y,
            colspan_x: 1,
            colspan_y: 1,
            line_height: None,
            widgets: Vec::new(),
        }
    }

    /// Set the span along both axes.
    #[must_use]
    pub fn with_span(mut self, colspan_x: u32, colspan_y: u32) -> Self {
        self.colspan_x = colspan_x;
        self.colspan_y = colspan_y;
        self
    }

    /// Set the row height override.
    #[must_use]
    pub fn with_line_height(mut self, line_height: Option<f32>) -> Self {
        self.line_height = line_height;
        self
    }

    /// The top-left unit cell.
    #[must_use]
    pub const fn origin(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    /// Rightmost covered column.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.colspan_x.saturating_sub(1))
    }

    /// Bottom covered row.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.colspan_y.saturating_sub(1))
    }

    /// Coordinate of the origin along `axis`.
    #[must_use]
    pub const fn coord(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Span along `axis`.
    #[must_use]
    pub const fn span(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.colspan_x,
            Axis::Y => self.colspan_y,
        }
    }

    /// Number of unit cells covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.colspan_x) * u64::from(self.colspan_y)
    }

    /// Last covered index along `axis`.
    #[must_use]
    pub const fn end(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.right(),
            Axis::Y => self.bottom(),
        }
    }

    pub(crate) fn span_mut(&mut self, axis: Axis) -> &mut u32 {
        match axis {
            Axis::X => &mut self.colspan_x,
            Axis::Y => &mut self.colspan_y,
        }
    }

    /// Check whether this division's span covers the given cell.
    #[must_use]
    pub const fn covers(&self, cell: Cell) -> bool {
        cell.x >= self.x && cell.x <= self.right() && cell.y >= self.y && cell.y <= self.bottom()
    }

    /// Iterate over every unit cell this division covers.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..=self.bottom())
            .flat_map(move |y| (self.x..=self.right()).map(move |x| Cell::new(x, y)))
    }
}
