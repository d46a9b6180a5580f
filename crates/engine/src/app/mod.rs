pub mod input;
mod loop_runner;
pub mod map;
mod metrics;
pub mod rendering;
mod session;

pub use input::InputAction;
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use map::{
    DirectionalAsset, Facing, GameMap, MapError, MapObject, ObjectId, ObjectKind, TileLayer,
    TileTag,
};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{Renderer, Viewport, PIXELS_PER_TILE};
pub use session::{
    FogCellView, FrameView, InputSnapshot, PlayerView, Session, ShellCommand, TilePoint,
    TileSprite, Vec2,
};
