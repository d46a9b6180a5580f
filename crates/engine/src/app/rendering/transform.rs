use crate::app::Vec2;

pub const PIXELS_PER_TILE: f32 = 64.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// World (tile units, y down) to screen pixels, camera-centered. Screen y
/// grows downward too, so no axis flip.
pub fn world_to_screen_px(world: Vec2, camera_center: Vec2, viewport: Viewport) -> (i32, i32) {
    let x = (world.x - camera_center.x) * PIXELS_PER_TILE + viewport.width as f32 * 0.5;
    let y = (world.y - camera_center.y) * PIXELS_PER_TILE + viewport.height as f32 * 0.5;
    (x.round() as i32, y.round() as i32)
}
