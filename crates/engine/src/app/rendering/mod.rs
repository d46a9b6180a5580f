mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{world_to_screen_px, Viewport, PIXELS_PER_TILE};

pub const PLAYER_PLACEHOLDER_HALF_SIZE_PX: i32 = 12;
