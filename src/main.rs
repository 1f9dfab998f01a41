use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;
use tile_ed::{render, resolve_atlas_path, Editor, GridSize, ImageAtlasLoader, TileSize};

const GRID_LINE: Color = Color::new(0.5, 0.5, 0.5, 1.0);
const SELECTED: Color = Color::new(0.78, 0.0, 0.0, 1.0);

/// Edit a tilemap using a supplied tileset image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Size of tilemap in tiles
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [64, 64])]
    tiles: Vec<u32>,
    /// Size of tile in pixels
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [16, 16])]
    tilesize: Vec<u32>,
    /// Tileset image
    #[arg(long, value_name = "FILE", default_value = "map_tiles.png")]
    tileset: String,
    /// Map file written by Ctrl+S and read by Ctrl+O
    #[arg(long, value_name = "FILE", default_value = "tilemap.json")]
    map: PathBuf,
    /// Maximum number of undo snapshots kept
    #[arg(long, value_name = "N")]
    history_limit: Option<usize>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Ed".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()).await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let grid = GridSize::new(args.tiles[0], args.tiles[1]);
    let tile = TileSize::new(args.tilesize[0], args.tilesize[1]);
    let mut editor = Editor::open_new(grid, tile, &args.tileset, Box::new(ImageAtlasLoader))
        .with_context(|| format!("Opening tileset {}", args.tileset))?;
    editor.set_history_limit(args.history_limit);

    let mut texture = load_atlas_texture(&editor, Path::new(".")).await?;
    let mut status = String::new();

    loop {
        let split = (screen_height() * 0.65).floor();
        let (mx, my) = mouse_position();

        handle_keys(&mut editor, &args.map, &mut texture, &mut status).await;

        if my < split {
            if is_mouse_button_pressed(MouseButton::Left) {
                editor.pointer_pressed(mx, my)?;
            }
            editor.pointer_moved(mx, my)?;
            if let Some((x, y)) = editor.hover() {
                status = format!("Tile Pos: {x},{y}");
            }
        } else if is_mouse_button_pressed(MouseButton::Left) {
            editor.pick_tile_at(mx, my - split);
        }
        if is_mouse_button_released(MouseButton::Left) {
            editor.pointer_released();
        }

        clear_background(DARKGRAY);
        draw_grid(&editor, &texture, split)?;
        draw_selector(&editor, &texture, split);
        draw_text(&status, 10.0, screen_height() - 10.0, 24.0, WHITE);

        next_frame().await;
    }
}

async fn handle_keys(editor: &mut Editor, map: &Path, texture: &mut Texture2D, status: &mut String) {
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

    if ctrl && is_key_pressed(KeyCode::S) {
        *status = match editor.save(Some(map)) {
            Ok(()) => format!("Saved {}", map.display()),
            Err(e) => failure(&e),
        };
    }
    if ctrl && is_key_pressed(KeyCode::O) {
        match editor.load(Some(map)) {
            Ok(()) => {
                let base = map.parent().unwrap_or(Path::new("."));
                match load_atlas_texture(editor, base).await {
                    Ok(tex) => *texture = tex,
                    Err(e) => log::warn!("{e:#}"),
                }
                *status = format!("Loaded {}", map.display());
            }
            Err(e) => *status = failure(&e),
        }
    }
    if ctrl && is_key_pressed(KeyCode::Z) {
        editor.undo();
    }
    if ctrl && is_key_pressed(KeyCode::Y) {
        editor.redo();
    }
    if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
        editor.zoom_in();
    }
    if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
        editor.zoom_out();
    }
    if is_key_pressed(KeyCode::Delete) {
        editor.clear_all();
    }
}

fn failure(e: &tile_ed::MapError) -> String {
    log::warn!("{e}");
    e.to_string()
}

async fn load_atlas_texture(editor: &Editor, base_dir: &Path) -> anyhow::Result<Texture2D> {
    let path = resolve_atlas_path(editor.document().atlas().reference(), base_dir);
    let tex = load_texture(&path.to_string_lossy())
        .await
        .with_context(|| format!("Loading texture {}", path.display()))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

fn draw_grid(editor: &Editor, texture: &Texture2D, split: f32) -> anyhow::Result<()> {
    let view_max = vec2(screen_width(), split);
    for cmd in render::grid_draw_commands(editor.document(), editor.zoom(), Vec2::ZERO, view_max)? {
        draw_texture_ex(
            texture,
            cmd.dest.x,
            cmd.dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(cmd.dest.size()),
                source: Some(cmd.src),
                ..Default::default()
            },
        );
        draw_rectangle_lines(cmd.dest.x, cmd.dest.y, cmd.dest.w, cmd.dest.h, 1.0, GRID_LINE);
    }
    Ok(())
}

fn draw_selector(editor: &Editor, texture: &Texture2D, split: f32) {
    let doc = editor.document();
    draw_rectangle(0.0, split, screen_width(), screen_height() - split, BLACK);
    draw_texture_ex(
        texture,
        0.0,
        split,
        WHITE,
        DrawTextureParams {
            dest_size: Some(render::selector_view_size(doc)),
            ..Default::default()
        },
    );

    let s = doc.scale() as f32;
    let ts = doc.tile_size();
    let (w, h) = (ts.width as f32 * s, ts.height as f32 * s);
    let (columns, rows) = doc.atlas().tilemap_size();
    for row in 0..rows {
        for col in 0..columns {
            draw_rectangle_lines(col as f32 * w, split + row as f32 * h, w, h, 1.0, GRID_LINE);
        }
    }

    if let Some(sel) = render::selection_rect(doc) {
        draw_rectangle_lines(sel.x, split + sel.y, sel.w, sel.h, 2.0, SELECTED);
    }
}
