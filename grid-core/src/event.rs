//! Inbound events from the presentation layer.

use serde::{Deserialize, Serialize};

use crate::division::{Axis, DivisionId, WidgetId, WidgetKind};
use crate::geometry::Rect;

/// The rendered box of one division, as measured after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivisionBox {
    /// Division that was measured.
    pub division: DivisionId,
    /// Its bounds in canvas pixels.
    pub rect: Rect,
}

/// All events an [`Editor`](crate::Editor) can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A widget was dropped on the canvas.
    Drop {
        /// Widget type token from the drag source.
        kind: WidgetKind,
        /// Canvas-relative X offset.
        x: f32,
        /// Canvas-relative Y offset.
        y: f32,
    },

    /// The canvas pixel size was edited.
    CanvasResize {
        /// New width, if changed.
        #[serde(default)]
        width: Option<f32>,
        /// New height, if changed.
        #[serde(default)]
        height: Option<f32>,
    },

    /// A new column and row count was requested.
    DivisionCount {
        /// Target number of columns.
        columns: u32,
        /// Target number of rows.
        rows: u32,
    },

    /// A division should absorb its neighbor.
    Expand {
        /// Division to widen.
        division: DivisionId,
        /// Axis to widen along.
        axis: Axis,
    },

    /// A row resize handle was pressed.
    RowResizeStart {
        /// Row index.
        row: u32,
        /// Pointer Y at press.
        pointer_y: f32,
    },

    /// The pointer moved while a row handle is held.
    RowResizeMove {
        /// Current pointer Y.
        pointer_y: f32,
    },

    /// The pointer was released.
    RowResizeEnd,

    /// A widget's text was edited.
    ContentEdit {
        /// Widget being edited.
        widget: WidgetId,
        /// Replacement text.
        text: String,
    },

    /// Fresh division geometry after a layout pass.
    Layout {
        /// Measured boxes.
        boxes: Vec<DivisionBox>,
    },
}

impl EditorEvent {
    /// Check if this event can move rendered division boxes.
    #[must_use]
    pub const fn changes_layout(&self) -> bool {
        matches!(
            self,
            Self::DivisionCount { .. }
                | Self::Expand { .. }
                | Self::CanvasResize { .. }
                | Self::RowResizeMove { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_event_json_shape() {
        let event: EditorEvent =
            serde_json::from_str(r#"{"type":"drop","data":{"kind":"title","x":12.5,"y":3.0}}"#)
                .expect("parse");
        assert_eq!(
            event,
            EditorEvent::Drop {
                kind: WidgetKind::Title,
                x: 12.5,
                y: 3.0
            }
        );
    }

    #[test]
    fn resize_fields_are_optional() {
        let event: EditorEvent =
            serde_json::from_str(r#"{"type":"canvas_resize","data":{"width":640.0}}"#)
                .expect("parse");
        assert_eq!(
            event,
            EditorEvent::CanvasResize {
                width: Some(640.0),
                height: None
            }
        );
    }

    #[test]
    fn unit_variant_needs_no_data() {
        let event: EditorEvent =
            serde_json::from_str(r#"{"type":"row_resize_end"}"#).expect("parse");
        assert_eq!(event, EditorEvent::RowResizeEnd);
    }

    #[test]
    fn layout_changing_events() {
        assert!(EditorEvent::DivisionCount { columns: 2, rows: 2 }.changes_layout());
        assert!(EditorEvent::RowResizeMove { pointer_y: 3.0 }.changes_layout());
        assert!(EditorEvent::CanvasResize {
            width: Some(1.0),
            height: None
        }
        .changes_layout());
        assert!(!EditorEvent::RowResizeEnd.changes_layout());
        assert!(!EditorEvent::Layout { boxes: Vec::new() }.changes_layout());
    }
}
