#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutOfBoundsPolicy {
    /// Historical behavior: coordinates outside layer coverage do not block.
    #[default]
    Passable,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct VisionSettings {
    range: f32,
    clear_radius: f32,
    gradient_start_radius: f32,
    resolution_multiplier: u32,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            range: VISION_RANGE_TILES,
            clear_radius: CLEAR_VISION_RADIUS_TILES,
            gradient_start_radius: GRADIENT_START_RADIUS_TILES,
            resolution_multiplier: FOG_RESOLUTION_MULTIPLIER,
        }
    }
}

impl VisionSettings {
    fn validate(&self) -> Result<(), String> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(format!("vision.range must be positive, got {}", self.range));
        }
        if self.resolution_multiplier == 0 {
            return Err("vision.resolution_multiplier must be at least 1".to_string());
        }
        // The ramp degenerates unless gradient start < clear radius < range.
        if !(self.gradient_start_radius < self.clear_radius && self.clear_radius < self.range) {
            return Err(format!(
                "vision radii must satisfy gradient_start_radius < clear_radius < range, got {} / {} / {}",
                self.gradient_start_radius, self.clear_radius, self.range
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub(crate) struct GameplaySettings {
    move_speed_tiles_per_second: f32,
    movement_duration_ms: u64,
    out_of_bounds: OutOfBoundsPolicy,
    vision: VisionSettings,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            move_speed_tiles_per_second: MOVE_SPEED_TILES_PER_SECOND,
            movement_duration_ms: MOVEMENT_DURATION_MS,
            out_of_bounds: OutOfBoundsPolicy::default(),
            vision: VisionSettings::default(),
        }
    }
}

impl GameplaySettings {
    fn validate(&self) -> Result<(), String> {
        if !(self.move_speed_tiles_per_second.is_finite() && self.move_speed_tiles_per_second > 0.0)
        {
            return Err(format!(
                "move_speed_tiles_per_second must be positive, got {}",
                self.move_speed_tiles_per_second
            ));
        }
        if self.movement_duration_ms == 0 {
            return Err("movement_duration_ms must be positive".to_string());
        }
        self.vision.validate()
    }

    fn movement_duration_seconds(&self) -> f32 {
        self.movement_duration_ms as f32 / 1000.0
    }
}

/// Ephemeral per-tick signals carried between systems in pipeline order.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickEvent {
    PositionChanged { position: Vec2 },
    TileCrossed { tile: TilePoint },
    InteractionRequested { tile: TilePoint },
    InterpolatedPositionChanged { position: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickEventKind {
    PositionChanged,
    TileCrossed,
    InteractionRequested,
    InterpolatedPositionChanged,
}

impl TickEvent {
    fn kind(self) -> TickEventKind {
        match self {
            Self::PositionChanged { .. } => TickEventKind::PositionChanged,
            Self::TileCrossed { .. } => TickEventKind::TileCrossed,
            Self::InteractionRequested { .. } => TickEventKind::InteractionRequested,
            Self::InterpolatedPositionChanged { .. } => TickEventKind::InterpolatedPositionChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TickEventCounts {
    total: u32,
    position_changed: u32,
    tile_crossed: u32,
    interaction_requested: u32,
    interpolated_position_changed: u32,
}

impl TickEventCounts {
    fn record(&mut self, kind: TickEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            TickEventKind::PositionChanged => {
                self.position_changed = self.position_changed.saturating_add(1)
            }
            TickEventKind::TileCrossed => self.tile_crossed = self.tile_crossed.saturating_add(1),
            TickEventKind::InteractionRequested => {
                self.interaction_requested = self.interaction_requested.saturating_add(1)
            }
            TickEventKind::InterpolatedPositionChanged => {
                self.interpolated_position_changed =
                    self.interpolated_position_changed.saturating_add(1)
            }
        }
    }
}

#[derive(Debug, Default)]
struct TickEventBus {
    current_tick_events: Vec<TickEvent>,
    last_tick_counts: TickEventCounts,
}

impl TickEventBus {
    fn emit(&mut self, event: TickEvent) {
        self.current_tick_events.push(event);
    }

    fn iter_emitted_so_far(&self) -> impl Iterator<Item = &TickEvent> {
        self.current_tick_events.iter()
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = TickEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    fn last_tick_counts(&self) -> TickEventCounts {
        self.last_tick_counts
    }
}

/// Outbound messages for the shell, accumulated during a tick and drained
/// by the loop afterwards.
#[derive(Debug, Default)]
struct ShellCommandQueue {
    commands: Vec<ShellCommand>,
}

impl ShellCommandQueue {
    fn enqueue(&mut self, command: ShellCommand) {
        self.commands.push(command);
    }

    fn drain(&mut self) -> Vec<ShellCommand> {
        std::mem::take(&mut self.commands)
    }

    fn pending(&self) -> &[ShellCommand] {
        &self.commands
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MoveAnimation {
    start: Vec2,
    target: Vec2,
    elapsed_seconds: f32,
    duration_seconds: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct PlayerState {
    position: Vec2,
    facing: Facing,
    speed_tiles_per_second: f32,
    interpolated_position: Vec2,
    last_tile: TilePoint,
    animation: Option<MoveAnimation>,
}

impl PlayerState {
    fn spawn(position: TilePoint, facing: Facing, speed_tiles_per_second: f32) -> Self {
        let world = Vec2 {
            x: position.x as f32,
            y: position.y as f32,
        };
        Self {
            position: world,
            facing,
            speed_tiles_per_second,
            interpolated_position: world,
            last_tile: position,
            animation: None,
        }
    }
}

/// Sparse visibility field at the fine-cell resolution. Absent cells are
/// fully occluded; the field is replaced wholesale on every recompute.
#[derive(Debug, Clone, Default, PartialEq)]
struct FogField {
    cells: HashMap<TilePoint, f32>,
    initialized: bool,
}

impl FogField {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn replace(&mut self, cells: HashMap<TilePoint, f32>) {
        self.cells = cells;
        self.initialized = true;
    }

    fn factor(&self, cell: TilePoint) -> f32 {
        self.cells.get(&cell).copied().unwrap_or(0.0)
    }

    fn visible_cell_count(&self) -> usize {
        self.cells.len()
    }
}
