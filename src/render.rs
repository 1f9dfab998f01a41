//! Draw lists for the grid and tile selector views.
//!
//! Nothing here touches the GPU; the shell turns [`DrawCommand`]s into
//! textured quads.

use std::ops::Range;

use macroquad::math::{vec2, Rect, Vec2};

use crate::coords::{screen_point_to_cell, tile_to_atlas_position};
use crate::document::Document;
use crate::error::MapError;
use crate::geom::{GridSize, TileIndex, TileSize};

/// Cells added before the first visible cell.
const CULL_LEAD_CELLS: i64 = 1;
/// Cells added after the last visible cell.
const CULL_TRAIL_CELLS: i64 = 2;

/// One tile to draw: where on screen, and which part of the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Grid cell
    pub cell: (u32, u32),
    /// Tile index at that cell
    pub tile: TileIndex,
    /// Screen rectangle, scaled by the view zoom
    pub dest: Rect,
    /// Source rectangle in atlas pixels
    pub src: Rect,
}

/// Half-open cell ranges of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// Columns
    pub x: Range<u32>,
    /// Rows
    pub y: Range<u32>,
}

impl CellRange {
    /// True when no cell is covered.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// Iterates cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.y
            .clone()
            .flat_map(move |y| self.x.clone().map(move |x| (x, y)))
    }
}

/// Cells of a `grid` drawn at `zoom` that intersect the view `view_min..view_max`, padded by a margin.
pub fn visible_cells(
    grid: GridSize,
    tile_size: TileSize,
    zoom: f32,
    view_min: Vec2,
    view_max: Vec2,
) -> Result<CellRange, MapError> {
    let zoom = f64::from(zoom);
    let (mut x1, mut y1) = screen_point_to_cell(view_min.x, view_min.y, tile_size, zoom)?;
    let (mut x2, mut y2) = screen_point_to_cell(view_max.x, view_max.y, tile_size, zoom)?;

    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
    }
    if y1 > y2 {
        std::mem::swap(&mut y1, &mut y2);
    }

    let clamp = |v: i64, max: u32| v.clamp(0, max as i64) as u32;
    Ok(CellRange {
        x: clamp(x1 - CULL_LEAD_CELLS, grid.columns)..clamp(x2 + 1 + CULL_TRAIL_CELLS, grid.columns),
        y: clamp(y1 - CULL_LEAD_CELLS, grid.rows)..clamp(y2 + 1 + CULL_TRAIL_CELLS, grid.rows),
    })
}

/// Draw list for the grid view. Tiles outside the atlas are skipped.
pub fn grid_draw_commands(
    doc: &Document,
    zoom: f32,
    view_min: Vec2,
    view_max: Vec2,
) -> Result<Vec<DrawCommand>, MapError> {
    let grid = doc.grid();
    let atlas = doc.atlas();
    let ts = doc.tile_size();
    let range = visible_cells(grid.size(), ts, zoom, view_min, view_max)?;

    let (tw, th) = (ts.width as f32, ts.height as f32);
    let mut out = Vec::with_capacity(range.x.len() * range.y.len());
    for (x, y) in range.cells() {
        let tile = grid.get(x, y)?;
        if !atlas.contains(tile) {
            log::trace!("cell ({x}, {y}) holds tile {tile} outside the tileset");
            continue;
        }
        let (sx, sy) = tile_to_atlas_position(tile, atlas.columns(), ts);
        out.push(DrawCommand {
            cell: (x, y),
            tile,
            dest: Rect::new(x as f32 * tw * zoom, y as f32 * th * zoom, tw * zoom, th * zoom),
            src: Rect::new(sx as f32, sy as f32, tw, th),
        });
    }
    Ok(out)
}

/// Screen size of the grid view at `zoom`.
pub fn grid_view_size(doc: &Document, zoom: f32) -> Vec2 {
    let grid = doc.grid_size();
    let ts = doc.tile_size();
    vec2(
        grid.columns as f32 * ts.width as f32 * zoom,
        grid.rows as f32 * ts.height as f32 * zoom,
    )
}

/// Screen size of the tile selector view.
pub fn selector_view_size(doc: &Document) -> Vec2 {
    let atlas = doc.atlas();
    vec2(atlas.width() as f32, atlas.height() as f32) * doc.scale() as f32
}

/// Outline of the selected tile in the tile selector view, or `None` when
/// the selection lies outside the tileset.
pub fn selection_rect(doc: &Document) -> Option<Rect> {
    let tile = doc.selected_tile();
    if !doc.atlas().contains(tile) {
        return None;
    }
    let ts = doc.tile_size();
    let (x, y) = tile_to_atlas_position(tile, doc.atlas().columns(), ts);
    let s = doc.scale() as f32;
    Some(Rect::new(
        x as f32 * s,
        y as f32 * s,
        ts.width as f32 * s,
        ts.height as f32 * s,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::editor::Editor;

    fn doc(columns: u32, rows: u32) -> Document {
        let atlas = Atlas::new("tiles.png", (32, 32), TileSize::new(8, 8)).unwrap();
        Document::new(GridSize::new(columns, rows), TileSize::new(8, 8), atlas).unwrap()
    }

    #[test]
    fn visible_cells_pads_and_clamps() {
        let range = visible_cells(
            GridSize::new(64, 64),
            TileSize::new(16, 16),
            1.0,
            vec2(40.0, 0.0),
            vec2(100.0, 20.0),
        )
        .unwrap();
        // one cell before, two after
        assert_eq!(range.x, 1..9);
        assert_eq!(range.y, 0..4);
    }

    #[test]
    fn view_outside_grid_is_empty() {
        let range = visible_cells(
            GridSize::new(4, 4),
            TileSize::new(8, 8),
            1.0,
            vec2(500.0, 500.0),
            vec2(900.0, 900.0),
        )
        .unwrap();
        assert!(range.is_empty());
        assert_eq!(range.cells().count(), 0);
    }

    #[test]
    fn whole_view_covers_grid() {
        let d = doc(4, 3);
        let cmds = grid_draw_commands(&d, 1.0, Vec2::ZERO, vec2(1000.0, 1000.0)).unwrap();
        assert_eq!(cmds.len(), 12);
        assert_eq!(cmds[0].cell, (0, 0));
        assert_eq!(cmds[11].cell, (3, 2));
    }

    #[test]
    fn commands_carry_source_and_dest() {
        let mut ed = Editor::new(doc(4, 4));
        ed.select_tile(5);
        ed.paint(1, 2).unwrap();
        let cmds = grid_draw_commands(ed.document(), 2.0, Vec2::ZERO, vec2(64.0, 64.0)).unwrap();
        let cmd = cmds.iter().find(|c| c.cell == (1, 2)).unwrap();
        assert_eq!(cmd.tile, 5);
        assert_eq!(cmd.src, Rect::new(8.0, 8.0, 8.0, 8.0));
        assert_eq!(cmd.dest, Rect::new(16.0, 32.0, 16.0, 16.0));
    }

    #[test]
    fn tiles_outside_atlas_are_skipped() {
        let mut ed = Editor::new(doc(2, 1));
        ed.select_tile(16);
        ed.paint(0, 0).unwrap();
        let cmds = grid_draw_commands(ed.document(), 1.0, Vec2::ZERO, vec2(16.0, 8.0)).unwrap();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].cell, (1, 0));
    }

    #[test]
    fn selection_rect_follows_selected_tile() {
        let mut ed = Editor::new(doc(1, 1));
        ed.select_tile(6);
        let r = selection_rect(ed.document());
        assert_eq!(r, Some(Rect::new(64.0, 32.0, 32.0, 32.0)));
        assert_eq!(selector_view_size(ed.document()), vec2(128.0, 128.0));
        assert_eq!(grid_view_size(ed.document(), 2.0), vec2(16.0, 16.0));
    }

    #[test]
    fn selection_outside_atlas_has_no_outline() {
        let mut ed = Editor::new(doc(1, 1));
        ed.select_tile(16);
        assert_eq!(selection_rect(ed.document()), None);
        ed.select_tile(4_000_000_000);
        assert_eq!(selection_rect(ed.document()), None);
        ed.select_tile(u32::MAX);
        assert_eq!(selection_rect(ed.document()), None);
    }
}
