//! WebAssembly bindings for grid-core.
//!
//! The host page forwards DOM events as JSON [`EditorEvent`]s and redraws
//! from the grid JSON returned after each one.

use wasm_bindgen::prelude::*;

use crate::{Editor, EditorEvent, EngineConfig, Grid};

/// Initialize the grid WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmGridEditor {
    editor: Editor,
    grid: Grid,
}

#[wasm_bindgen]
impl WasmGridEditor {
    /// Create an editor holding a default 1x1 grid.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        let editor = Editor::new();
        let grid = editor.new_grid();
        Self { editor, grid }
    }

    /// Create an editor from an [`EngineConfig`] serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration can't be parsed.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(json: &str) -> Result<WasmGridEditor, String> {
        let config = EngineConfig::from_json(json).map_err(|e| e.to_string())?;
        let editor = Editor::with_config(config);
        let grid = editor.new_grid();
        Ok(Self { editor, grid })
    }

    /// Apply one event and return the resulting grid as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event can't be parsed or is rejected.
    #[wasm_bindgen(js_name = handleEventJson)]
    pub fn handle_event_json(&mut self, json: &str) -> Result<String, String> {
        let event: EditorEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.grid = self
            .editor
            .handle(&self.grid, &event)
            .map_err(|e| e.to_string())?;
        Ok(self.get_grid_json())
    }

    /// Get the current grid as JSON.
    #[wasm_bindgen(js_name = getGridJson)]
    #[must_use]
    pub fn get_grid_json(&self) -> String {
        serde_json::to_string(&self.grid).unwrap_or_default()
    }

    /// Replace the current grid with one serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing fails or the grid is invalid.
    #[wasm_bindgen(js_name = loadGridJson)]
    pub fn load_grid_json(&mut self, json: &str) -> Result<(), String> {
        self.grid = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Column and row counts as a two-element array.
    #[wasm_bindgen(js_name = maxExtents)]
    #[must_use]
    pub fn max_extents(&self) -> Vec<u32> {
        vec![self.grid.columns(), self.grid.rows()]
    }

    /// Check if a row resize drag is in progress.
    #[wasm_bindgen(js_name = isResizingRow)]
    #[must_use]
    pub fn is_resizing_row(&self) -> bool {
        self.editor.row_resizer().is_active()
    }
}

impl Default for WasmGridEditor {
    fn default() -> Self {
        Self::new()
    }
}
