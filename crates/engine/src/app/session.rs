use super::input::{ActionStates, InputAction};
use super::map::{Facing, ObjectId};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Integer tile coordinate. Grid y grows downward, matching scenario rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    /// The tile a world position rounds into.
    pub fn from_world(world: Vec2) -> Self {
        Self {
            x: world.x.round() as i32,
            y: world.y.round() as i32,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    interact_pressed: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        interact_pressed: bool,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            interact_pressed,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// Edge-triggered: true for exactly one tick per key press.
    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_interact_pressed(mut self, interact_pressed: bool) -> Self {
        self.interact_pressed = interact_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Outbound message from the simulation to the surrounding shell. The loop
/// drains these after every tick; the pipeline never dispatches side effects
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    OpenDialogue {
        object_id: ObjectId,
        display_name: String,
    },
}

/// One static tile to draw: sprite key when the asset resolved, otherwise
/// the fallback fill color. Already sorted in layer draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSprite {
    pub position: TilePoint,
    pub sprite: Option<String>,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub facing: Facing,
    pub sprite: Option<String>,
}

/// Final fog opacity for one fine cell, in [0, 1]. Cells not listed are
/// outside the map and drawn fully dark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogCellView {
    pub cell: TilePoint,
    pub opacity: f32,
}

/// Read-only per-frame snapshot the renderer consumes.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub map_width: u32,
    pub map_height: u32,
    pub camera_center: Vec2,
    pub tiles: &'a [TileSprite],
    pub player: PlayerView,
    pub fog: &'a [FogCellView],
    pub fog_resolution: u32,
}

/// A running game session driven by the frame loop: fixed-rate ticks, a
/// frame view per redraw, and an outbound command queue drained between
/// ticks.
pub trait Session {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot);

    fn frame_view(&mut self) -> FrameView<'_>;

    fn drain_shell_commands(&mut self) -> Vec<ShellCommand>;

    fn status_line(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_point_rounds_world_position() {
        assert_eq!(
            TilePoint::from_world(Vec2 { x: 1.4, y: 2.6 }),
            TilePoint { x: 1, y: 3 }
        );
        assert_eq!(
            TilePoint::from_world(Vec2 { x: -0.4, y: -0.6 }),
            TilePoint { x: 0, y: -1 }
        );
    }

    #[test]
    fn snapshot_builders_round_trip() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveUp, true)
            .with_interact_pressed(true)
            .with_window_size((640, 480));

        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(!snapshot.is_down(InputAction::MoveDown));
        assert!(snapshot.interact_pressed());
        assert_eq!(snapshot.window_size(), (640, 480));
        assert!(!snapshot.quit_requested());
    }
}
