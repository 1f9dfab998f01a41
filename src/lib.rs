#![warn(missing_docs)]

//! Tile map editor core: a grid of tileset indices with undo/redo and JSON persistence.
//!
//! The GUI shell forwards pointer events and commands to an [`Editor`]; the
//! [`render`] module turns the open [`Document`] into draw commands.

mod atlas;
pub mod codec;
pub mod coords;
mod document;
mod editor;
mod error;
mod geom;
mod grid;
mod history;
pub mod render;

pub use atlas::{resolve_atlas_path, Atlas, AtlasLoader, ImageAtlasLoader};
pub use document::{Document, DEFAULT_SELECTOR_SCALE};
pub use editor::{Editor, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
pub use error::MapError;
pub use geom::{GridSize, TileIndex, TileSize};
pub use grid::{GridSnapshot, TileGrid};
pub use history::HistoryStore;
pub use render::{CellRange, DrawCommand};
