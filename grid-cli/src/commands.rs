//! Subcommand implementations.
//!
//! Each command opens the store in the configured data directory, performs
//! its work and returns the text to print.

use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use grid_core::{Editor, EditorEvent, Grid, GridId, GridStore};

use crate::{map, CliConfig, Command};

/// Run `command` against the configured store.
///
/// # Errors
///
/// Returns an error if the store can't be opened, a grid or event file
/// can't be loaded, or an event is rejected.
pub fn run(config: &CliConfig, command: &Command) -> anyhow::Result<String> {
    let store = GridStore::with_data_dir(&config.data_dir).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?;
    match command {
        Command::New { width, height } => new_grid(config, &store, *width, *height),
        Command::Apply { grid, events } => apply_events(config, &store, grid, events),
        Command::Show { grid } => show_grid(&store, grid),
        Command::List => list_grids(&store),
    }
}

/// Create a grid and return its id.
fn new_grid(
    config: &CliConfig,
    store: &GridStore,
    width: Option<f32>,
    height: Option<f32>,
) -> anyhow::Result<String> {
    let width = width.unwrap_or(config.engine.default_width);
    let height = height.unwrap_or(config.engine.default_height);
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        anyhow::bail!("Canvas size must be positive, got {width}x{height}");
    }
    let id = store.create_grid(width, height);
    save(store, id)?;
    tracing::info!("Created grid {id}");
    Ok(format!("{id}\n"))
}

/// Replay events from `path` against a stored grid and save the result.
fn apply_events(
    config: &CliConfig,
    store: &GridStore,
    grid: &str,
    path: &Path,
) -> anyhow::Result<String> {
    let grid = load(store, grid)?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    let events: Vec<EditorEvent> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid events in {}", path.display()))?;

    let mut editor = Editor::with_config(config.engine.clone());
    let mut current = grid;
    for (index, event) in events.iter().enumerate() {
        current = editor
            .handle(&current, event)
            .with_context(|| format!("Event {index} rejected"))?;
    }
    if editor.row_resizer().is_active() {
        tracing::warn!("Events ended mid row resize; keeping the last height");
    }
    store.replace(current.clone());
    save(store, current.id)?;

    tracing::info!("Applied {} events to grid {}", events.len(), current.id);
    Ok(map::render(&current))
}

/// Print a stored grid's document and map.
fn show_grid(store: &GridStore, grid: &str) -> anyhow::Result<String> {
    let grid = load(store, grid)?;
    let document = store
        .grid_document(grid.id)
        .context("Grid vanished from store")?;
    let mut out = serde_json::to_string_pretty(&document)?;
    out.push('\n');
    let _ = write!(
        out,
        "\n{} x {} cells, {} divisions, {} widgets\n",
        grid.columns(),
        grid.rows(),
        grid.division_count(),
        grid.widget_count()
    );
    out.push_str(&map::render(&grid));
    Ok(out)
}

/// List every grid in the data directory.
fn list_grids(store: &GridStore) -> anyhow::Result<String> {
    let mut ids = store.load_all_grids()?;
    ids.sort_by_key(ToString::to_string);
    let mut out = String::new();
    for id in ids {
        if let Some(grid) = store.get(id) {
            let _ = writeln!(
                out,
                "{id}  {}x{}  {} divisions",
                grid.columns(),
                grid.rows(),
                grid.division_count()
            );
        }
    }
    Ok(out)
}

fn save(store: &GridStore, id: GridId) -> anyhow::Result<()> {
    store
        .save_grid(id)
        .with_context(|| format!("Failed to save grid {id}"))
}

fn load(store: &GridStore, grid: &str) -> anyhow::Result<Grid> {
    let id = GridId::parse(grid).with_context(|| format!("Invalid grid id {grid}"))?;
    store
        .load_grid_from_disk(id)
        .with_context(|| format!("Failed to load grid {id}"))
}
