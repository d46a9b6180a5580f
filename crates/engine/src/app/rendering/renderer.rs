use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::{Facing, FrameView, Vec2};

use super::transform::{world_to_screen_px, Viewport, PIXELS_PER_TILE};
use super::PLAYER_PLACEHOLDER_HALF_SIZE_PX;

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const PLAYER_PLACEHOLDER_COLOR: [u8; 4] = [235, 235, 245, 255];
const FACING_NOTCH_COLOR: [u8; 4] = [40, 44, 56, 255];
const FACING_NOTCH_HALF_SIZE_PX: i32 = 3;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprites: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprites: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn render_frame(&mut self, view: FrameView<'_>) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let viewport = self.viewport;
        let asset_root = self.asset_root.as_path();
        let sprite_cache = &mut self.sprite_cache;
        let warned_missing_sprites = &mut self.warned_missing_sprites;
        let frame = self.pixels.frame_mut();

        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let tile_px = PIXELS_PER_TILE.round() as i32;
        for tile in view.tiles {
            let world = Vec2 {
                x: tile.position.x as f32,
                y: tile.position.y as f32,
            };
            let (left, top) = world_to_screen_px(world, view.camera_center, viewport);
            if offscreen(left, top, tile_px, viewport) {
                continue;
            }
            let sprite = tile.sprite.as_deref().and_then(|key| {
                resolve_cached_sprite(sprite_cache, warned_missing_sprites, asset_root, key)
            });
            match sprite {
                Some(sprite) => {
                    draw_sprite_in_rect(frame, viewport, left, top, tile_px, sprite);
                }
                None => {
                    fill_rect(frame, viewport, left, top, tile_px, tile_px, tile.color);
                }
            }
        }

        let (player_left, player_top) =
            world_to_screen_px(view.player.position, view.camera_center, viewport);
        let player_sprite = view.player.sprite.as_deref().and_then(|key| {
            resolve_cached_sprite(sprite_cache, warned_missing_sprites, asset_root, key)
        });
        match player_sprite {
            Some(sprite) => {
                draw_sprite_in_rect(frame, viewport, player_left, player_top, tile_px, sprite);
            }
            None => {
                draw_player_placeholder(
                    frame,
                    viewport,
                    player_left,
                    player_top,
                    tile_px,
                    view.player.facing,
                );
            }
        }

        if view.fog_resolution > 0 {
            let cell_px = (PIXELS_PER_TILE / view.fog_resolution as f32).ceil() as i32;
            let inv_resolution = 1.0 / view.fog_resolution as f32;
            for fog_cell in view.fog {
                if fog_cell.opacity <= 0.0 {
                    continue;
                }
                let world = Vec2 {
                    x: fog_cell.cell.x as f32 * inv_resolution,
                    y: fog_cell.cell.y as f32 * inv_resolution,
                };
                let (left, top) = world_to_screen_px(world, view.camera_center, viewport);
                if offscreen(left, top, cell_px, viewport) {
                    continue;
                }
                shade_rect(
                    frame,
                    viewport,
                    left,
                    top,
                    cell_px,
                    cell_px,
                    fog_cell.opacity.min(1.0),
                );
            }
        }

        self.pixels.render()
    }
}

fn offscreen(left: i32, top: i32, size_px: i32, viewport: Viewport) -> bool {
    left + size_px < 0 || top + size_px < 0 || left >= viewport.width as i32 || top >= viewport.height as i32
}

fn draw_player_placeholder(
    frame: &mut [u8],
    viewport: Viewport,
    left: i32,
    top: i32,
    tile_px: i32,
    facing: Facing,
) {
    let cx = left + tile_px / 2;
    let cy = top + tile_px / 2;
    let half = PLAYER_PLACEHOLDER_HALF_SIZE_PX;
    fill_rect(
        frame,
        viewport,
        cx - half,
        cy - half,
        half * 2,
        half * 2,
        PLAYER_PLACEHOLDER_COLOR,
    );

    let (dx, dy) = facing.step();
    let notch_cx = cx + dx * (half - FACING_NOTCH_HALF_SIZE_PX);
    let notch_cy = cy + dy * (half - FACING_NOTCH_HALF_SIZE_PX);
    fill_rect(
        frame,
        viewport,
        notch_cx - FACING_NOTCH_HALF_SIZE_PX,
        notch_cy - FACING_NOTCH_HALF_SIZE_PX,
        FACING_NOTCH_HALF_SIZE_PX * 2,
        FACING_NOTCH_HALF_SIZE_PX * 2,
        FACING_NOTCH_COLOR,
    );
}

fn fill_rect(
    frame: &mut [u8],
    viewport: Viewport,
    left: i32,
    top: i32,
    width_px: i32,
    height_px: i32,
    color: [u8; 4],
) {
    for y in top..top + height_px {
        for x in left..left + width_px {
            write_pixel_rgba_clipped(frame, viewport, x, y, color);
        }
    }
}

/// Darken a rect toward black by `opacity` in [0, 1], preserving alpha.
fn shade_rect(
    frame: &mut [u8],
    viewport: Viewport,
    left: i32,
    top: i32,
    width_px: i32,
    height_px: i32,
    opacity: f32,
) {
    let keep = (1.0 - opacity).clamp(0.0, 1.0);
    let scale = (keep * 256.0) as u32;
    for y in top..top + height_px {
        for x in left..left + width_px {
            let Some(offset) = pixel_byte_offset(frame, viewport, x, y) else {
                continue;
            };
            for channel in 0..3 {
                let value = frame[offset + channel] as u32;
                frame[offset + channel] = ((value * scale) >> 8) as u8;
            }
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], viewport: Viewport, x: i32, y: i32, color: [u8; 4]) {
    let Some(offset) = pixel_byte_offset(frame, viewport, x, y) else {
        return;
    };
    frame[offset..offset + 4].copy_from_slice(&color);
}

fn pixel_byte_offset(frame: &[u8], viewport: Viewport, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x >= viewport.width as i32 || y >= viewport.height as i32 {
        return None;
    }
    let offset = (y as usize * viewport.width as usize + x as usize) * 4;
    if offset + 4 > frame.len() {
        return None;
    }
    Some(offset)
}

/// Nearest-neighbor blit scaled to fill a square rect; transparent source
/// pixels are skipped.
fn draw_sprite_in_rect(
    frame: &mut [u8],
    viewport: Viewport,
    left: i32,
    top: i32,
    size_px: i32,
    sprite: &LoadedSprite,
) {
    if sprite.width == 0 || sprite.height == 0 || size_px <= 0 {
        return;
    }
    let expected_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_len {
        return;
    }

    let sprite_width = sprite.width as usize;
    for dy in 0..size_px {
        let src_y = (dy as u32 * sprite.height / size_px as u32).min(sprite.height - 1) as usize;
        for dx in 0..size_px {
            let src_x = (dx as u32 * sprite.width / size_px as u32).min(sprite.width - 1) as usize;
            let src_offset = (src_y * sprite_width + src_x) * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let color = [
                sprite.rgba[src_offset],
                sprite.rgba[src_offset + 1],
                sprite.rgba[src_offset + 2],
                alpha,
            ];
            write_pixel_rgba_clipped(frame, viewport, left + dx, top + dy, color);
        }
    }
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprites: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !cache.contains_key(key) {
        let loaded = match load_sprite_rgba(&asset_root.join(key)) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                if warned_missing_sprites.insert(key.to_string()) {
                    warn!(
                        sprite_key = key,
                        reason = reason.as_str(),
                        "sprite_load_failed_using_placeholder"
                    );
                }
                None
            }
        };
        cache.insert(key.to_string(), loaded);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame(viewport: Viewport) -> Vec<u8> {
        vec![0u8; viewport.width as usize * viewport.height as usize * 4]
    }

    #[test]
    fn pixel_writes_are_clipped_to_viewport() {
        let viewport = Viewport {
            width: 4,
            height: 4,
        };
        let mut frame = test_frame(viewport);
        write_pixel_rgba_clipped(&mut frame, viewport, -1, 0, [255; 4]);
        write_pixel_rgba_clipped(&mut frame, viewport, 0, 4, [255; 4]);
        write_pixel_rgba_clipped(&mut frame, viewport, 4, 0, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));

        write_pixel_rgba_clipped(&mut frame, viewport, 1, 1, [9, 8, 7, 6]);
        let offset = (1 * 4 + 1) * 4;
        assert_eq!(&frame[offset..offset + 4], &[9, 8, 7, 6]);
    }

    #[test]
    fn shade_rect_darkens_toward_black() {
        let viewport = Viewport {
            width: 2,
            height: 2,
        };
        let mut frame = vec![200u8; 2 * 2 * 4];
        shade_rect(&mut frame, viewport, 0, 0, 2, 2, 0.5);
        assert!(frame[0] < 200 && frame[0] > 0);

        let mut opaque = vec![200u8; 2 * 2 * 4];
        shade_rect(&mut opaque, viewport, 0, 0, 2, 2, 1.0);
        assert_eq!(opaque[0], 0);
        assert_eq!(opaque[1], 0);
        assert_eq!(opaque[2], 0);
        // Alpha channel stays untouched.
        assert_eq!(opaque[3], 200);
    }

    #[test]
    fn shade_rect_zero_opacity_is_identity() {
        let viewport = Viewport {
            width: 2,
            height: 2,
        };
        let mut frame = vec![123u8; 2 * 2 * 4];
        shade_rect(&mut frame, viewport, 0, 0, 2, 2, 0.0);
        assert!(frame.iter().all(|byte| *byte == 123));
    }

    #[test]
    fn sprite_blit_skips_transparent_pixels() {
        let viewport = Viewport {
            width: 2,
            height: 2,
        };
        let mut frame = test_frame(viewport);
        let sprite = LoadedSprite {
            width: 2,
            height: 2,
            rgba: vec![
                255, 0, 0, 255, /* opaque red */
                0, 255, 0, 0, /* transparent green */
                0, 0, 255, 255, /* opaque blue */
                9, 9, 9, 0, /* transparent */
            ],
        };
        draw_sprite_in_rect(&mut frame, viewport, 0, 0, 2, &sprite);
        assert_eq!(&frame[0..4], &[255, 0, 0, 255]);
        assert_eq!(&frame[4..8], &[0, 0, 0, 0]);
        assert_eq!(&frame[8..12], &[0, 0, 255, 255]);
        assert_eq!(&frame[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn offscreen_test_uses_rect_extent() {
        let viewport = Viewport {
            width: 100,
            height: 100,
        };
        assert!(offscreen(-65, 0, 64, viewport));
        assert!(!offscreen(-63, 0, 64, viewport));
        assert!(offscreen(100, 0, 64, viewport));
        assert!(!offscreen(99, 0, 64, viewport));
    }
}
