//! Conversions between atlas pixel space, tile indices and grid cells.
//!
//! All functions are pure. Integer math uses floor division only; tile sizes
//! are integral so tile boundaries never fall between pixels.

use crate::error::MapError;
use crate::geom::{TileIndex, TileSize};

/// Top-left pixel of `tile` inside an atlas `tilemap_columns` tiles wide.
///
/// The result is not checked against the atlas height. A tile past the last
/// row yields a position below the image; callers must check before sampling.
/// Positions are `u64` so that every `u32` tile maps without overflow.
/// `tilemap_columns` must be non-zero.
#[inline]
pub fn tile_to_atlas_position(
    tile: TileIndex,
    tilemap_columns: u32,
    tile_size: TileSize,
) -> (u64, u64) {
    let col = u64::from(tile % tilemap_columns);
    let row = u64::from(tile / tilemap_columns);
    (col * u64::from(tile_size.width), row * u64::from(tile_size.height))
}

/// Tile index covering atlas pixel `(px, py)` in an atlas `atlas_width` pixels wide.
///
/// Takes and returns `u64` so positions from [`tile_to_atlas_position`] map back
/// for any tile, including ones past the end of the atlas.
#[inline]
pub fn atlas_position_to_tile(px: u64, py: u64, atlas_width: u32, tile_size: TileSize) -> u64 {
    let tiles_per_row = u64::from(atlas_width / tile_size.width);
    (py / u64::from(tile_size.height)) * tiles_per_row + px / u64::from(tile_size.width)
}

/// Cell under a point of a view that draws each tile `scale` times its pixel size.
///
/// Points left of or above the origin map to negative cells.
pub fn screen_point_to_cell(
    screen_x: f32,
    screen_y: f32,
    tile_size: TileSize,
    scale: f64,
) -> Result<(i64, i64), MapError> {
    check_scale(scale)?;
    let cell_w = f64::from(tile_size.width) * scale;
    let cell_h = f64::from(tile_size.height) * scale;
    Ok((
        (f64::from(screen_x) / cell_w).floor() as i64,
        (f64::from(screen_y) / cell_h).floor() as i64,
    ))
}

/// Rejects zero, negative and non-finite scale factors.
#[inline]
pub fn check_scale(scale: f64) -> Result<f64, MapError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(MapError::InvalidScale(scale))
    }
}
