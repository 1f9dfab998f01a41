//! Editing session driven by the GUI shell.
//!
//! The shell forwards pointer events and toolbar commands; the editor keeps the
//! stroke state so that one press-drag-release paints as one undo step.

use std::path::Path;

use crate::atlas::{Atlas, AtlasLoader, ImageAtlasLoader};
use crate::codec;
use crate::coords::{check_scale, screen_point_to_cell};
use crate::document::Document;
use crate::error::MapError;
use crate::geom::{GridSize, TileIndex, TileSize};

/// Smallest grid view zoom reachable with [`Editor::zoom_out`].
pub const MIN_ZOOM: f32 = 0.5;
/// Largest grid view zoom reachable with [`Editor::zoom_in`].
pub const MAX_ZOOM: f32 = 8.0;
/// Zoom change per step.
pub const ZOOM_STEP: f32 = 0.25;

/// The open document plus transient view and stroke state.
pub struct Editor {
    doc: Document,
    loader: Box<dyn AtlasLoader>,
    history_limit: Option<usize>,
    zoom: f32,
    stroke: bool,
    hover: Option<(u32, u32)>,
    dirty: bool,
}

impl Editor {
    /// Wraps an already built document, probing tilesets from disk.
    pub fn new(doc: Document) -> Self {
        Self::with_loader(doc, Box::new(ImageAtlasLoader))
    }

    /// Wraps a document with a custom tileset loader.
    pub fn with_loader(doc: Document, loader: Box<dyn AtlasLoader>) -> Self {
        Self {
            doc,
            loader,
            history_limit: None,
            zoom: 1.0,
            stroke: false,
            hover: None,
            dirty: false,
        }
    }

    /// Opens a blank map using the tileset at `atlas_ref`.
    pub fn open_new(
        grid_size: GridSize,
        tile_size: TileSize,
        atlas_ref: &str,
        loader: Box<dyn AtlasLoader>,
    ) -> Result<Self, MapError> {
        let atlas = Atlas::load(loader.as_ref(), atlas_ref, Path::new("."), tile_size)?;
        let doc = Document::new(grid_size, tile_size, atlas)?;
        Ok(Self::with_loader(doc, loader))
    }

    /// Caps undo depth for this and every later document; `None` lifts the cap.
    /// The open document's history is restarted either way.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.end_stroke();
        self.history_limit = limit;
        self.doc.set_history_limit(limit);
    }

    /// The open document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Grid view zoom.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Cell under the pointer after the last pointer event, if inside the grid.
    pub fn hover(&self) -> Option<(u32, u32)> {
        self.hover
    }

    /// True while a stroke is in progress.
    pub fn is_painting(&self) -> bool {
        self.stroke
    }

    /// True when there are edits since the last new, save or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the document with a blank one. On error the current document stays.
    pub fn new_document(
        &mut self,
        grid_size: GridSize,
        tile_size: TileSize,
        atlas_ref: &str,
    ) -> Result<(), MapError> {
        let atlas = Atlas::load(self.loader.as_ref(), atlas_ref, Path::new("."), tile_size)?;
        let doc = Document::new(grid_size, tile_size, atlas)?;
        log::info!(
            "new {}x{} map with {}x{} tiles from {atlas_ref}",
            grid_size.columns,
            grid_size.rows,
            tile_size.width,
            tile_size.height
        );
        self.replace(doc);
        Ok(())
    }

    /// Sets the tile used by strokes and clears.
    pub fn select_tile(&mut self, tile: TileIndex) {
        self.doc.set_selected_tile(tile);
    }

    /// Selects the tile under a point of the selector view. Points outside the atlas are ignored.
    pub fn pick_tile_at(&mut self, screen_x: f32, screen_y: f32) -> Option<TileIndex> {
        let atlas = self.doc.atlas();
        let (cx, cy) = screen_point_to_cell(screen_x, screen_y, self.doc.tile_size(), self.doc.scale()).ok()?;
        let (columns, rows) = atlas.tilemap_size();
        if !GridSize::new(columns, rows).contains(cx, cy) {
            return None;
        }
        let tile = TileIndex::try_from(cy as u64 * u64::from(columns) + cx as u64).ok()?;
        self.select_tile(tile);
        Some(tile)
    }

    /// Starts a stroke at cell `(x, y)`: records a checkpoint and paints the cell.
    pub fn begin_stroke(&mut self, x: u32, y: u32) -> Result<(), MapError> {
        self.end_stroke();
        let tile = self.doc.selected_tile();
        let size = self.doc.grid_size();
        if !size.contains(x as i64, y as i64) {
            return Err(MapError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                size,
            });
        }
        self.doc.history_mut().checkpoint();
        self.doc.grid_mut().set(x, y, tile)?;
        self.stroke = true;
        self.dirty = true;
        Ok(())
    }

    /// Paints cell `(x, y)` as part of the current stroke; without one this is a no-op.
    pub fn continue_stroke(&mut self, x: u32, y: u32) -> Result<(), MapError> {
        if !self.stroke {
            return Ok(());
        }
        let tile = self.doc.selected_tile();
        self.doc.grid_mut().set(x, y, tile)
    }

    /// Finishes the current stroke, if any.
    pub fn end_stroke(&mut self) {
        self.stroke = false;
    }

    /// Paints a single cell as its own undo step.
    pub fn paint(&mut self, x: u32, y: u32) -> Result<(), MapError> {
        self.begin_stroke(x, y)?;
        self.end_stroke();
        Ok(())
    }

    /// Button press over the grid view. Starts a stroke when inside the grid.
    pub fn pointer_pressed(&mut self, screen_x: f32, screen_y: f32) -> Result<(), MapError> {
        self.end_stroke();
        if let Some((x, y)) = self.cell_at(screen_x, screen_y) {
            self.begin_stroke(x, y)?;
        }
        Ok(())
    }

    /// Pointer motion over the grid view. Updates the hover cell and paints while pressed.
    pub fn pointer_moved(&mut self, screen_x: f32, screen_y: f32) -> Result<(), MapError> {
        if let Some((x, y)) = self.cell_at(screen_x, screen_y) {
            self.continue_stroke(x, y)?;
        }
        Ok(())
    }

    /// Button release. Ends the stroke.
    pub fn pointer_released(&mut self) {
        self.end_stroke();
    }

    /// Fills the whole grid with the selected tile as one undo step.
    pub fn clear_all(&mut self) {
        self.end_stroke();
        let tile = self.doc.selected_tile();
        self.doc.history_mut().checkpoint();
        self.doc.grid_mut().fill_all(tile);
        self.dirty = true;
    }

    /// Reverts the last edit. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let moved = self.doc.history_mut().undo();
        if moved {
            self.dirty = true;
            log::debug!("undo to {}", self.doc.history().index());
        }
        moved
    }

    /// Reapplies the last undone edit. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        let moved = self.doc.history_mut().redo();
        if moved {
            self.dirty = true;
            log::debug!("redo to {}", self.doc.history().index());
        }
        moved
    }

    /// Sets the persisted selector view scale.
    pub fn set_scale(&mut self, factor: f64) -> Result<(), MapError> {
        self.doc.set_scale(factor)
    }

    /// Sets the grid view zoom.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), MapError> {
        check_scale(f64::from(zoom))?;
        self.zoom = zoom;
        Ok(())
    }

    /// Enlarges the grid view one step, up to [`MAX_ZOOM`].
    pub fn zoom_in(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom += ZOOM_STEP;
        }
    }

    /// Shrinks the grid view one step, down to [`MIN_ZOOM`].
    pub fn zoom_out(&mut self) {
        if self.zoom > MIN_ZOOM {
            self.zoom -= ZOOM_STEP;
        }
    }

    /// Writes the document to `path`. `None` means the dialog was cancelled.
    pub fn save(&mut self, path: Option<&Path>) -> Result<(), MapError> {
        let Some(path) = path else {
            return Ok(());
        };
        codec::write_document(path, &self.doc)?;
        log::info!("saved map to {}", path.display());
        self.dirty = false;
        Ok(())
    }

    /// Replaces the document with the one stored at `path`. `None` means the
    /// dialog was cancelled. On error the current document stays.
    pub fn load(&mut self, path: Option<&Path>) -> Result<(), MapError> {
        let Some(path) = path else {
            return Ok(());
        };
        let doc = codec::read_document(path, self.loader.as_ref())?;
        log::info!(
            "loaded {}x{} map from {}",
            doc.grid_size().columns,
            doc.grid_size().rows,
            path.display()
        );
        self.replace(doc);
        Ok(())
    }

    fn replace(&mut self, mut doc: Document) {
        if self.history_limit.is_some() {
            doc.set_history_limit(self.history_limit);
        }
        self.doc = doc;
        self.stroke = false;
        self.hover = None;
        self.dirty = false;
    }

    fn cell_at(&mut self, screen_x: f32, screen_y: f32) -> Option<(u32, u32)> {
        let (cx, cy) = screen_point_to_cell(screen_x, screen_y, self.doc.tile_size(), f64::from(self.zoom)).ok()?;
        self.hover = if self.doc.grid_size().contains(cx, cy) {
            Some((cx as u32, cy as u32))
        } else {
            None
        };
        self.hover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32, u32);

    impl AtlasLoader for Fixed {
        fn dimensions(&self, _path: &Path) -> Result<(u32, u32), MapError> {
            Ok((self.0, self.1))
        }
    }

    fn editor(columns: u32, rows: u32) -> Editor {
        Editor::open_new(
            GridSize::new(columns, rows),
            TileSize::new(8, 8),
            "tiles.png",
            Box::new(Fixed(32, 32)),
        )
        .unwrap()
    }

    fn cell(ed: &Editor, x: u32, y: u32) -> TileIndex {
        ed.document().grid().get(x, y).unwrap()
    }

    #[test]
    fn paint_then_undo() {
        let mut ed = editor(4, 4);
        ed.select_tile(5);
        ed.paint(0, 0).unwrap();
        assert_eq!(cell(&ed, 0, 0), 5);
        assert!(ed.undo());
        assert_eq!(cell(&ed, 0, 0), 0);
        assert!(ed.redo());
        assert_eq!(cell(&ed, 0, 0), 5);
    }

    #[test]
    fn drag_stroke_is_one_undo_step() {
        let mut ed = editor(4, 4);
        ed.select_tile(2);
        ed.pointer_pressed(1.0, 1.0).unwrap();
        ed.pointer_moved(9.0, 1.0).unwrap();
        ed.pointer_moved(17.0, 9.0).unwrap();
        ed.pointer_released();
        assert_eq!(ed.document().history().len(), 2);
        assert_eq!(cell(&ed, 0, 0), 2);
        assert_eq!(cell(&ed, 1, 0), 2);
        assert_eq!(cell(&ed, 2, 1), 2);

        ed.undo();
        assert!(ed.document().grid().cells().iter().all(|&t| t == 0));
    }

    #[test]
    fn motion_without_press_only_hovers() {
        let mut ed = editor(4, 4);
        ed.select_tile(1);
        ed.pointer_moved(12.0, 20.0).unwrap();
        assert_eq!(ed.hover(), Some((1, 2)));
        assert_eq!(cell(&ed, 1, 2), 0);
        assert_eq!(ed.document().history().len(), 1);
    }

    #[test]
    fn press_outside_grid_is_ignored() {
        let mut ed = editor(2, 2);
        ed.pointer_pressed(-3.0, 4.0).unwrap();
        ed.pointer_pressed(100.0, 4.0).unwrap();
        assert!(!ed.is_painting());
        assert_eq!(ed.hover(), None);
        assert_eq!(ed.document().history().len(), 1);
    }

    #[test]
    fn drag_leaving_grid_keeps_stroke() {
        let mut ed = editor(2, 2);
        ed.select_tile(3);
        ed.pointer_pressed(0.0, 0.0).unwrap();
        ed.pointer_moved(50.0, 0.0).unwrap();
        ed.pointer_moved(8.0, 8.0).unwrap();
        ed.pointer_released();
        assert_eq!(cell(&ed, 1, 1), 3);
        assert_eq!(ed.document().history().len(), 2);
    }

    #[test]
    fn paint_outside_grid_fails_without_checkpoint() {
        let mut ed = editor(2, 2);
        assert!(matches!(ed.paint(2, 0), Err(MapError::OutOfBounds { .. })));
        assert_eq!(ed.document().history().len(), 1);
    }

    #[test]
    fn zoom_changes_hit_testing() {
        let mut ed = editor(4, 4);
        ed.zoom_in();
        ed.zoom_in();
        ed.zoom_in();
        ed.zoom_in();
        assert_eq!(ed.zoom(), 2.0);
        ed.select_tile(7);
        ed.paint(0, 0).unwrap();
        ed.pointer_pressed(16.0, 0.0).unwrap();
        ed.pointer_released();
        assert_eq!(cell(&ed, 1, 0), 7);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut ed = editor(1, 1);
        for _ in 0..100 {
            ed.zoom_in();
        }
        assert_eq!(ed.zoom(), MAX_ZOOM);
        for _ in 0..100 {
            ed.zoom_out();
        }
        assert_eq!(ed.zoom(), MIN_ZOOM);
    }

    #[test]
    fn clear_fills_with_selected_tile() {
        let mut ed = editor(3, 3);
        ed.select_tile(4);
        ed.clear_all();
        assert!(ed.document().grid().cells().iter().all(|&t| t == 4));
        ed.undo();
        assert!(ed.document().grid().cells().iter().all(|&t| t == 0));
    }

    #[test]
    fn pick_tile_from_selector() {
        let mut ed = editor(1, 1);
        // 32x32 atlas of 8x8 tiles at scale 4: each tile is 32 screen pixels.
        assert_eq!(ed.pick_tile_at(70.0, 40.0), Some(6));
        assert_eq!(ed.document().selected_tile(), 6);
        assert_eq!(ed.pick_tile_at(200.0, 0.0), None);
        assert_eq!(ed.document().selected_tile(), 6);
    }

    #[test]
    fn single_cell_grid_supports_every_command() {
        let mut ed = editor(1, 1);
        ed.select_tile(9);
        ed.paint(0, 0).unwrap();
        ed.undo();
        ed.redo();
        assert_eq!(cell(&ed, 0, 0), 9);
        ed.select_tile(1);
        ed.clear_all();
        assert_eq!(cell(&ed, 0, 0), 1);
    }

    #[test]
    fn undo_ends_stroke() {
        let mut ed = editor(2, 2);
        ed.select_tile(1);
        ed.pointer_pressed(0.0, 0.0).unwrap();
        ed.undo();
        ed.pointer_moved(8.0, 0.0).unwrap();
        assert!(ed.document().grid().cells().iter().all(|&t| t == 0));
    }

    #[test]
    fn dirty_tracks_edits() {
        let mut ed = editor(2, 2);
        assert!(!ed.is_dirty());
        ed.paint(0, 0).unwrap();
        assert!(ed.is_dirty());
    }

    #[test]
    fn set_scale_rejects_invalid() {
        let mut ed = editor(1, 1);
        assert!(matches!(ed.set_scale(0.0), Err(MapError::InvalidScale(_))));
        ed.set_scale(1.5).unwrap();
        assert_eq!(ed.document().scale(), 1.5);
    }

    #[test]
    fn history_limit_caps_undo_depth() {
        let mut ed = editor(2, 2);
        ed.set_history_limit(Some(2));
        ed.paint(0, 0).unwrap();
        ed.paint(1, 0).unwrap();
        assert!(ed.undo());
        assert!(!ed.undo());
    }

    #[test]
    fn lifting_history_limit_uncaps_open_document() {
        let mut ed = editor(2, 2);
        ed.set_history_limit(Some(2));
        ed.set_history_limit(None);
        assert_eq!(ed.document().history().limit(), None);
        ed.paint(0, 0).unwrap();
        ed.paint(1, 0).unwrap();
        ed.paint(0, 1).unwrap();
        assert!(ed.undo());
        assert!(ed.undo());
        assert!(ed.undo());
        assert!(!ed.undo());
    }

    #[test]
    fn cancelled_save_and_load_are_no_ops() {
        let mut ed = editor(2, 2);
        ed.paint(0, 0).unwrap();
        ed.save(None).unwrap();
        ed.load(None).unwrap();
        assert!(ed.is_dirty());
        assert_eq!(ed.document().history().len(), 2);
    }
}
