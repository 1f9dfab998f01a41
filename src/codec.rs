//! JSON form of a [`Document`].
//!
//! ```json
//! {
//!     "width": 4, "height": 4,
//!     "tile_width": 8, "tile_height": 8,
//!     "selected_tile": 5,
//!     "tile_image": "tiles.png",
//!     "tile_data": { "data": [0, 0, ...] },
//!     "tile_sel": { "scale": 4.0 }
//! }
//! ```
//!
//! The tileset's tile layout is not stored; it is derived again from the
//! image on load. Undo history is not stored either.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::atlas::{Atlas, AtlasLoader};
use crate::coords::check_scale;
use crate::document::{check_dimensions, Document};
use crate::error::MapError;
use crate::geom::{GridSize, TileIndex, TileSize};
use crate::grid::{GridSnapshot, TileGrid};

#[derive(Deserialize)]
struct JsonDocument {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    selected_tile: TileIndex,
    tile_image: String,
    tile_data: JsonTileData,
    tile_sel: JsonTileSel,
}

#[derive(Deserialize)]
struct JsonTileData {
    data: Vec<TileIndex>,
}

#[derive(Deserialize)]
struct JsonTileSel {
    scale: f64,
}

/// Serializes `doc` without its history.
///
/// Built from `Value` conversions, which cannot fail; the scale is always
/// finite so it never degrades to `null`.
pub fn encode(doc: &Document) -> JsonValue {
    let grid = doc.grid().size();
    let tile = doc.tile_size();

    let mut tile_data = JsonMap::new();
    tile_data.insert("data".into(), JsonValue::from(doc.grid().cells().to_vec()));
    let mut tile_sel = JsonMap::new();
    tile_sel.insert("scale".into(), JsonValue::from(doc.scale()));

    let mut out = JsonMap::new();
    out.insert("width".into(), grid.columns.into());
    out.insert("height".into(), grid.rows.into());
    out.insert("tile_width".into(), tile.width.into());
    out.insert("tile_height".into(), tile.height.into());
    out.insert("selected_tile".into(), doc.selected_tile().into());
    out.insert("tile_image".into(), doc.atlas().reference().into());
    out.insert("tile_data".into(), JsonValue::Object(tile_data));
    out.insert("tile_sel".into(), JsonValue::Object(tile_sel));
    JsonValue::Object(out)
}

/// Rebuilds a document from its JSON form.
///
/// The tileset is resolved against `base_dir` and probed with `loader`.
/// Nothing is returned unless every field checks out.
pub fn decode(
    json: &JsonValue,
    loader: &dyn AtlasLoader,
    base_dir: &Path,
) -> Result<Document, MapError> {
    let j = JsonDocument::deserialize(json).map_err(|e| MapError::malformed(e.to_string()))?;

    let grid_size = GridSize::new(j.width, j.height);
    let tile_size = TileSize::new(j.tile_width, j.tile_height);
    check_dimensions(grid_size, tile_size)?;

    if j.tile_data.data.len() != grid_size.capacity() {
        return Err(MapError::malformed(format!(
            "tile_data holds {} cells, a {}x{} grid needs {}",
            j.tile_data.data.len(),
            j.width,
            j.height,
            grid_size.capacity()
        )));
    }
    let scale = check_scale(j.tile_sel.scale)
        .map_err(|e| MapError::malformed(format!("tile_sel.scale: {e}")))?;

    let atlas = Atlas::load(loader, &j.tile_image, base_dir, tile_size)?;
    let grid = TileGrid::from_snapshot(grid_size, &GridSnapshot::new(j.tile_data.data))?;

    Ok(Document::from_parts(grid, tile_size, atlas, j.selected_tile, scale))
}

/// Reads and decodes a map file. Relative tileset paths resolve next to the file first.
pub fn read_document(path: &Path, loader: &dyn AtlasLoader) -> Result<Document, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: JsonValue = serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    decode(&json, loader, &map_dir)
}

/// Encodes `doc` and writes it to `path` with 4-space indentation.
pub fn write_document(path: &Path, doc: &Document) -> Result<(), MapError> {
    let mut out = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    encode(doc).serialize(&mut ser).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, out).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}
