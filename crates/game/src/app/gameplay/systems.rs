#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimSystemId {
    Movement,
    Interaction,
    Interpolation,
    FogOfWar,
}

impl SimSystemId {
    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Interaction => "Interaction",
            Self::Interpolation => "Interpolation",
            Self::FogOfWar => "FogOfWar",
        }
    }
}

/// Movement must precede Interaction (facing must be current) and FogOfWar
/// (the tile-crossing event is consumed in the same tick it is emitted).
const SIM_SYSTEM_ORDER: [SimSystemId; 4] = [
    SimSystemId::Movement,
    SimSystemId::Interaction,
    SimSystemId::Interpolation,
    SimSystemId::FogOfWar,
];

struct SimSystemContext<'a> {
    fixed_dt_seconds: f32,
    input: &'a InputSnapshot,
    query: MapQuery<'a>,
    vision: &'a VisionSettings,
    movement_duration_seconds: f32,
    player: &'a mut PlayerState,
    fog: &'a mut FogField,
    fog_recompute_count: &'a mut u64,
    events: &'a mut TickEventBus,
    commands: &'a mut ShellCommandQueue,
}

#[derive(Debug, Default)]
struct SimSystemsHost {
    last_tick_order: Vec<SimSystemId>,
}

impl SimSystemsHost {
    #[allow(clippy::too_many_arguments)]
    fn run_once_per_tick(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        query: MapQuery<'_>,
        vision: &VisionSettings,
        movement_duration_seconds: f32,
        player: &mut PlayerState,
        fog: &mut FogField,
        fog_recompute_count: &mut u64,
        events: &mut TickEventBus,
        commands: &mut ShellCommandQueue,
    ) {
        self.last_tick_order.clear();
        let mut context = SimSystemContext {
            fixed_dt_seconds,
            input,
            query,
            vision,
            movement_duration_seconds,
            player,
            fog,
            fog_recompute_count,
            events,
            commands,
        };
        for system_id in SIM_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            self.run_system(system_id, &mut context);
        }
    }

    fn run_system(&self, system_id: SimSystemId, context: &mut SimSystemContext<'_>) {
        match system_id {
            SimSystemId::Movement => Self::run_movement_system(context),
            SimSystemId::Interaction => Self::run_interaction_system(context),
            SimSystemId::Interpolation => Self::run_interpolation_system(context),
            SimSystemId::FogOfWar => Self::run_fog_of_war_system(context),
        }
    }

    fn run_movement_system(context: &mut SimSystemContext<'_>) {
        let mut vector = Vec2 { x: 0.0, y: 0.0 };
        if context.input.is_down(InputAction::MoveUp) {
            vector.y -= 1.0;
        }
        if context.input.is_down(InputAction::MoveDown) {
            vector.y += 1.0;
        }
        if context.input.is_down(InputAction::MoveLeft) {
            vector.x -= 1.0;
        }
        if context.input.is_down(InputAction::MoveRight) {
            vector.x += 1.0;
        }
        if vector.x == 0.0 && vector.y == 0.0 {
            return;
        }

        if vector.x != 0.0 && vector.y != 0.0 {
            let length = (vector.x * vector.x + vector.y * vector.y).sqrt();
            vector.x /= length;
            vector.y /= length;
        }

        // Facing updates even when the move is later rejected; the sprite
        // turns toward the wall the player is pushing against.
        context.player.facing = facing_from_vector(vector, context.player.facing);

        let step = context.player.speed_tiles_per_second * context.fixed_dt_seconds;
        let candidate = Vec2 {
            x: context.player.position.x + vector.x * step,
            y: context.player.position.y + vector.y * step,
        };
        let candidate_tile = TilePoint::from_world(candidate);

        if context.query.is_blocking_movement(candidate_tile) {
            // Collision is a silent no-op for this tick, not an error.
            return;
        }

        context.player.position = candidate;
        context.events.emit(TickEvent::PositionChanged {
            position: candidate,
        });

        if candidate_tile != context.player.last_tile {
            context.player.last_tile = candidate_tile;
            context.events.emit(TickEvent::TileCrossed {
                tile: candidate_tile,
            });
        }
    }

    fn run_interaction_system(context: &mut SimSystemContext<'_>) {
        if !context.input.interact_pressed() {
            return;
        }

        let player_tile = TilePoint::from_world(context.player.position);
        let (dx, dy) = context.player.facing.step();
        let target_tile = player_tile.offset(dx, dy);

        let Some(hit) = context.query.interactable_at(target_tile) else {
            return;
        };

        context
            .events
            .emit(TickEvent::InteractionRequested { tile: target_tile });
        context.commands.enqueue(ShellCommand::OpenDialogue {
            object_id: hit.id,
            display_name: hit.name,
        });
    }

    fn run_interpolation_system(context: &mut SimSystemContext<'_>) {
        let target = context.player.position;

        let needs_new_animation = match &context.player.animation {
            Some(animation) => animation.target != target,
            None => context.player.interpolated_position != target,
        };
        if needs_new_animation {
            // Re-anchor at the current interpolated position, not the old
            // target, so a superseded animation never snaps visually.
            context.player.animation = Some(MoveAnimation {
                start: context.player.interpolated_position,
                target,
                elapsed_seconds: 0.0,
                duration_seconds: context.movement_duration_seconds,
            });
        }

        let Some(animation) = &mut context.player.animation else {
            return;
        };

        animation.elapsed_seconds += context.fixed_dt_seconds;
        let progress = (animation.elapsed_seconds / animation.duration_seconds).min(1.0);
        let eased = ease_out_cubic(progress);
        context.player.interpolated_position = Vec2 {
            x: animation.start.x + (animation.target.x - animation.start.x) * eased,
            y: animation.start.y + (animation.target.y - animation.start.y) * eased,
        };

        if progress >= 1.0 {
            // Snap exactly to the target to avoid floating-point drift.
            context.player.interpolated_position = animation.target;
            context.player.animation = None;
        }

        context.events.emit(TickEvent::InterpolatedPositionChanged {
            position: context.player.interpolated_position,
        });
    }

    fn run_fog_of_war_system(context: &mut SimSystemContext<'_>) {
        let crossed_tile = context
            .events
            .iter_emitted_so_far()
            .find_map(|event| match event {
                TickEvent::TileCrossed { tile } => Some(*tile),
                _ => None,
            });
        if context.fog.is_initialized() && crossed_tile.is_none() {
            return;
        }

        let field =
            compute_visibility_field(context.query, context.player.position, context.vision);
        context.fog.replace(field);
        *context.fog_recompute_count = context.fog_recompute_count.saturating_add(1);
        debug!(
            tile_x = crossed_tile.map(|tile| tile.x),
            tile_y = crossed_tile.map(|tile| tile.y),
            visible_cells = context.fog.visible_cell_count(),
            recompute = *context.fog_recompute_count,
            "fog_recomputed"
        );
    }
}
