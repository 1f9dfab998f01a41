/// Index of one tile in the atlas, counted row-major.
pub type TileIndex = u32;

/// Size of one tile in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TileSize {
    /// Creates a tile size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, which makes every mapping undefined.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Size of the editable grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of columns
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
}

impl GridSize {
    /// Creates a grid size.
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cells, `columns * rows`.
    #[inline]
    pub fn capacity(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// True when `(x, y)` addresses a cell of this grid.
    #[inline]
    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.columns as i64 && y < self.rows as i64
    }

    /// Row-major offset of an in-range cell.
    #[inline]
    pub(crate) fn offset(self, x: u32, y: u32) -> usize {
        y as usize * self.columns as usize + x as usize
    }
}
