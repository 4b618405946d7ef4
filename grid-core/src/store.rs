//! Shared grid storage for hosts editing several canvases.
//!
//! Provides a thread-safe [`GridStore`] holding any number of independent
//! grids, with optional JSON persistence to a data directory. Each grid is
//! replaced wholesale by the snapshot an engine operation returns.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::grid::{Grid, GridId};
use crate::schema::{current_timestamp_ms, GridDocument};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested grid does not exist.
    #[error("Grid not found: {0}")]
    GridNotFound(String),
    /// The store was created without a data directory.
    #[error("No data directory configured")]
    NoDataDir,
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Thread-safe storage of grid snapshots.
///
/// # Example
///
/// ```
/// use grid_core::store::GridStore;
/// use grid_core::resize::set_divisions;
///
/// let store = GridStore::new();
/// let id = store.create_grid(300.0, 200.0);
///
/// store.update(id, |grid| set_divisions(grid, 2, 2)).unwrap();
/// assert_eq!(store.get(id).unwrap().division_count(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridStore {
    grids: Arc<RwLock<HashMap<GridId, Grid>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl GridStore {
    /// Create an empty store without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with filesystem persistence.
    ///
    /// Grids are saved as `<grid-id>.json` in `data_dir`. The directory is
    /// created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            grids: Arc::new(RwLock::new(HashMap::new())),
            data_dir: Some(data_dir),
        })
    }

    /// Create a new 1x1 grid and return its id.
    pub fn create_grid(&self, width: f32, height: f32) -> GridId {
        let grid = Grid::new(width, height);
        let id = grid.id;
        self.write().insert(id, grid);
        self.persist_grid(id);
        tracing::debug!("Created grid {id} ({width}x{height})");
        id
    }

    /// Create a grid with the default 300x200 canvas.
    pub fn create_default_grid(&self) -> GridId {
        self.create_grid(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Get a snapshot of a grid.
    #[must_use]
    pub fn get(&self, id: GridId) -> Option<Grid> {
        self.read().get(&id).cloned()
    }

    /// Insert or replace a grid under its own id.
    pub fn replace(&self, grid: Grid) {
        let id = grid.id;
        self.write().insert(id, grid);
        self.persist_grid(id);
    }

    /// Replace a grid by the snapshot `f` derives from it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::GridNotFound`] if the grid does not exist.
    pub fn update<F>(&self, id: GridId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Grid) -> Grid,
    {
        {
            let mut grids = self.write();
            let grid = grids
                .get_mut(&id)
                .ok_or_else(|| StoreError::GridNotFound(id.to_string()))?;
            let mut next = f(grid);
            next.id = id;
            *grid = next;
        }
        self.persist_grid(id);
        Ok(())
    }

    /// Remove a grid from memory and disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::GridNotFound`] if the grid does not exist.
    pub fn remove(&self, id: GridId) -> Result<Grid, StoreError> {
        let grid = self
            .write()
            .remove(&id)
            .ok_or_else(|| StoreError::GridNotFound(id.to_string()))?;
        self.delete_grid_file(id);
        Ok(grid)
    }

    /// Get all grid ids.
    #[must_use]
    pub fn grid_ids(&self) -> Vec<GridId> {
        self.read().keys().copied().collect()
    }

    /// Number of grids held in memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the store holds no grids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get the document representation of a grid.
    #[must_use]
    pub fn grid_document(&self, id: GridId) -> Option<GridDocument> {
        self.read()
            .get(&id)
            .map(|grid| GridDocument::from_grid(grid, current_timestamp_ms()))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn grid_path(&self, id: GridId) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{id}.json")))
    }

    /// Write a grid to `<data-dir>/<grid-id>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoDataDir`] without a data directory,
    /// [`StoreError::GridNotFound`] for an unknown id, and an I/O or
    /// serialization error if the document can't be written.
    pub fn save_grid(&self, id: GridId) -> Result<(), StoreError> {
        let path = self.grid_path(id).ok_or(StoreError::NoDataDir)?;
        let doc = self
            .grid_document(id)
            .ok_or_else(|| StoreError::GridNotFound(id.to_string()))?;
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    /// Best-effort save after a mutation. Failures are logged; hosts that
    /// need to know call [`save_grid`](Self::save_grid).
    fn persist_grid(&self, id: GridId) {
        if self.data_dir.is_none() {
            return;
        }
        if let Err(e) = self.save_grid(id) {
            tracing::warn!("Failed to persist grid {id}: {e}");
        }
    }

    /// Load a single grid from disk into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, can't be parsed, or holds
    /// a grid that breaks the tiling invariants.
    pub fn load_grid_from_disk(&self, id: GridId) -> Result<Grid, StoreError> {
        let path = self.grid_path(id).ok_or(StoreError::NoDataDir)?;
        let contents = std::fs::read_to_string(&path)?;
        let doc: GridDocument = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let grid = doc
            .into_grid()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if grid.id != id {
            return Err(StoreError::Serialization(format!(
                "{} holds grid {}",
                path.display(),
                grid.id
            )));
        }
        self.write().insert(id, grid.clone());
        Ok(grid)
    }

    /// Discover and load all persisted grids from the data directory.
    ///
    /// Files that fail to load are skipped with a warning. Returns the ids
    /// that were loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory can't be read.
    pub fn load_all_grids(&self) -> Result<Vec<GridId>, StoreError> {
        let data_dir = self.data_dir.as_ref().ok_or(StoreError::NoDataDir)?;
        let mut loaded = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| GridId::parse(s).ok())
            else {
                continue;
            };
            match self.load_grid_from_disk(id) {
                Ok(_) => loaded.push(id),
                Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
            }
        }
        Ok(loaded)
    }

    /// Remove a grid's persisted file from disk.
    ///
    /// No-op if the store has no data directory or the file doesn't exist.
    pub fn delete_grid_file(&self, id: GridId) {
        let Some(path) = self.grid_path(id) else {
            return;
        };
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete grid file {}: {e}", path.display());
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<GridId, Grid>> {
        self.grids
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<GridId, Grid>> {
        self.grids
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
