//! Tileset image metadata and the loader that probes it.

use std::path::{Path, PathBuf};

use crate::error::MapError;
use crate::geom::{TileIndex, TileSize};

/// Reports the pixel size of a tileset image.
pub trait AtlasLoader {
    /// `(width, height)` of the image at `path`.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), MapError>;
}

/// Reads image headers from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageAtlasLoader;

impl AtlasLoader for ImageAtlasLoader {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), MapError> {
        if !path.is_file() {
            return Err(MapError::AtlasNotFound {
                path: path.to_path_buf(),
            });
        }
        image::image_dimensions(path).map_err(|source| MapError::AtlasUnreadable {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where to look for `reference`: next to the map first, then as given.
pub fn resolve_atlas_path(reference: &str, base_dir: &Path) -> PathBuf {
    let local = base_dir.join(reference);
    if local.is_file() {
        local
    } else {
        PathBuf::from(reference)
    }
}

/// A loaded tileset: its reference string and the derived tile layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    reference: String,
    width: u32,
    height: u32,
    columns: u32,
    rows: u32,
}

impl Atlas {
    /// Builds an atlas from image dimensions.
    ///
    /// The image must be a whole number of tiles in both directions.
    pub fn new(
        reference: impl Into<String>,
        (width, height): (u32, u32),
        tile_size: TileSize,
    ) -> Result<Self, MapError> {
        let reference = reference.into();
        if tile_size.is_empty() {
            return Err(MapError::malformed(format!(
                "tile size {}x{} has a zero side",
                tile_size.width, tile_size.height
            )));
        }
        if width % tile_size.width != 0 || height % tile_size.height != 0 {
            return Err(MapError::malformed(format!(
                "tileset {reference} is {width}x{height}, not a multiple of the {}x{} tile size",
                tile_size.width, tile_size.height
            )));
        }
        let columns = width / tile_size.width;
        let rows = height / tile_size.height;
        if columns == 0 || rows == 0 {
            return Err(MapError::malformed(format!(
                "tileset {reference} holds no {}x{} tiles",
                tile_size.width, tile_size.height
            )));
        }
        Ok(Self {
            reference,
            width,
            height,
            columns,
            rows,
        })
    }

    /// Resolves `reference` against `base_dir`, probes it and builds the atlas.
    pub fn load(
        loader: &dyn AtlasLoader,
        reference: &str,
        base_dir: &Path,
        tile_size: TileSize,
    ) -> Result<Self, MapError> {
        let path = resolve_atlas_path(reference, base_dir);
        let dims = loader.dimensions(&path)?;
        log::debug!("tileset {} is {}x{}", path.display(), dims.0, dims.1);
        Self::new(reference, dims, tile_size)
    }

    /// Reference string as stored in documents.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tiles per atlas row.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// `(columns, rows)` in tiles.
    pub fn tilemap_size(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of tiles in the image.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// True when `tile` is drawn from inside the image.
    pub fn contains(&self, tile: TileIndex) -> bool {
        u64::from(tile) < self.tile_count()
    }
}
