use crate::error::MapError;
use crate::geom::{GridSize, TileIndex};

/// Immutable copy of a grid's cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: Box<[TileIndex]>,
}

impl GridSnapshot {
    /// Wraps raw row-major cell data.
    pub fn new(cells: Vec<TileIndex>) -> Self {
        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a snapshot without cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cells, row-major.
    pub fn as_slice(&self) -> &[TileIndex] {
        &self.cells
    }
}

/// Rectangular grid of tile indices.
///
/// The backing vector always holds exactly `columns * rows` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    size: GridSize,
    cells: Vec<TileIndex>,
}

impl TileGrid {
    /// Grid of `size` with every cell set to `fill`.
    pub fn new(size: GridSize, fill: TileIndex) -> Self {
        Self {
            size,
            cells: vec![fill; size.capacity()],
        }
    }

    /// Grid of `size` holding `snapshot`'s cells.
    pub fn from_snapshot(size: GridSize, snapshot: &GridSnapshot) -> Result<Self, MapError> {
        let mut grid = Self::new(size, 0);
        grid.restore(snapshot)?;
        Ok(grid)
    }

    /// Dimensions in cells.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Tile at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<TileIndex, MapError> {
        let idx = self.index_of(x, y)?;
        Ok(self.cells[idx])
    }

    /// Overwrites the tile at `(x, y)`. The index is not checked against any atlas.
    pub fn set(&mut self, x: u32, y: u32, tile: TileIndex) -> Result<(), MapError> {
        let idx = self.index_of(x, y)?;
        self.cells[idx] = tile;
        Ok(())
    }

    /// Sets every cell to `tile`.
    pub fn fill_all(&mut self, tile: TileIndex) {
        self.cells.fill(tile);
    }

    /// Deep copy of the current cells.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(self.cells.clone())
    }

    /// Replaces every cell with the snapshot's contents.
    ///
    /// A snapshot taken from a grid of another size is rejected, never
    /// truncated or padded.
    pub fn restore(&mut self, snapshot: &GridSnapshot) -> Result<(), MapError> {
        if snapshot.len() != self.cells.len() {
            return Err(MapError::CorruptState {
                expected: self.cells.len(),
                found: snapshot.len(),
            });
        }
        self.cells.copy_from_slice(snapshot.as_slice());
        Ok(())
    }

    /// Cells row-major.
    pub fn cells(&self) -> &[TileIndex] {
        &self.cells
    }

    /// Iterates `(x, y, tile)` for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, TileIndex)> + '_ {
        let columns = self.size.columns as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &t)| ((i % columns) as u32, (i / columns) as u32, t))
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, MapError> {
        if x >= self.size.columns || y >= self.size.rows {
            return Err(MapError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                size: self.size,
            });
        }
        Ok(self.size.offset(x, y))
    }
}
