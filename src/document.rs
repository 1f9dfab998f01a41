use crate::atlas::Atlas;
use crate::coords::check_scale;
use crate::error::MapError;
use crate::geom::{GridSize, TileIndex, TileSize};
use crate::grid::TileGrid;
use crate::history::HistoryStore;

/// Scale of the tile selector view on a new document.
pub const DEFAULT_SELECTOR_SCALE: f64 = 4.0;

/// One open tile map: grid contents with history, tileset and view settings.
#[derive(Debug, Clone)]
pub struct Document {
    tile_size: TileSize,
    atlas: Atlas,
    selected_tile: TileIndex,
    history: HistoryStore<TileGrid>,
    scale: f64,
}

impl Document {
    /// Fresh document with every cell set to tile 0.
    pub fn new(grid_size: GridSize, tile_size: TileSize, atlas: Atlas) -> Result<Self, MapError> {
        check_dimensions(grid_size, tile_size)?;
        Ok(Self::from_parts(
            TileGrid::new(grid_size, 0),
            tile_size,
            atlas,
            0,
            DEFAULT_SELECTOR_SCALE,
        ))
    }

    /// Assembles a document around an existing grid, starting a new history.
    pub(crate) fn from_parts(
        grid: TileGrid,
        tile_size: TileSize,
        atlas: Atlas,
        selected_tile: TileIndex,
        scale: f64,
    ) -> Self {
        Self {
            tile_size,
            atlas,
            selected_tile,
            history: HistoryStore::new(grid),
            scale,
        }
    }

    /// Caps undo depth at `limit` snapshots, or lifts the cap with `None`.
    /// Discards existing history.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        let grid = self.history.current().clone();
        self.history = match limit {
            Some(limit) => HistoryStore::with_limit(grid, limit),
            None => HistoryStore::new(grid),
        };
    }

    /// Grid dimensions in cells.
    pub fn grid_size(&self) -> GridSize {
        self.grid().size()
    }

    /// Tile dimensions in pixels.
    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// The tileset.
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Tile painted by strokes and clears.
    pub fn selected_tile(&self) -> TileIndex {
        self.selected_tile
    }

    pub(crate) fn set_selected_tile(&mut self, tile: TileIndex) {
        self.selected_tile = tile;
    }

    /// Selector view scale; persisted with the document.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Changes the selector view scale.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), MapError> {
        self.scale = check_scale(scale)?;
        Ok(())
    }

    /// The visible grid.
    pub fn grid(&self) -> &TileGrid {
        self.history.current()
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TileGrid {
        self.history.current_mut()
    }

    /// Undo/redo state of the grid.
    pub fn history(&self) -> &HistoryStore<TileGrid> {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryStore<TileGrid> {
        &mut self.history
    }
}

pub(crate) fn check_dimensions(grid_size: GridSize, tile_size: TileSize) -> Result<(), MapError> {
    if grid_size.capacity() == 0 {
        return Err(MapError::malformed(format!(
            "grid {}x{} has no cells",
            grid_size.columns, grid_size.rows
        )));
    }
    if tile_size.is_empty() {
        return Err(MapError::malformed(format!(
            "tile size {}x{} has a zero side",
            tile_size.width, tile_size.height
        )));
    }
    Ok(())
}
