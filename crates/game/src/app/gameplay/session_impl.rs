impl Session for InvestigationSession {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let query = MapQuery::new(&self.map, self.settings.out_of_bounds);
        self.systems_host.run_once_per_tick(
            fixed_dt_seconds,
            input,
            query,
            &self.settings.vision,
            self.settings.movement_duration_seconds(),
            &mut self.player,
            &mut self.fog,
            &mut self.fog_recompute_count,
            &mut self.tick_events,
            &mut self.shell_commands,
        );

        for command in self.shell_commands.pending() {
            let ShellCommand::OpenDialogue { display_name, .. } = command;
            self.last_dialogue_name = Some(display_name.clone());
        }

        self.tick_events.finish_tick_rollover();
        let counts = self.tick_events.last_tick_counts();
        if counts.total > 0 {
            debug!(
                total = counts.total,
                position_changed = counts.position_changed,
                tile_crossed = counts.tile_crossed,
                interaction_requested = counts.interaction_requested,
                interpolated_position_changed = counts.interpolated_position_changed,
                "tick_events"
            );
        }
    }

    fn frame_view(&mut self) -> FrameView<'_> {
        self.refresh_fog_draw_buffer();

        let facing = self.player.facing;
        let sprite = self
            .map
            .asset(&self.player_asset_id)
            .and_then(|asset| asset.resolve(facing))
            .map(str::to_string);

        FrameView {
            map_width: self.map.width(),
            map_height: self.map.height(),
            camera_center: Vec2 {
                x: self.player.interpolated_position.x + 0.5,
                y: self.player.interpolated_position.y + 0.5,
            },
            tiles: &self.static_tiles,
            player: PlayerView {
                position: self.player.interpolated_position,
                facing,
                sprite,
            },
            fog: &self.fog_draw_buffer,
            fog_resolution: self.settings.vision.resolution_multiplier,
        }
    }

    fn drain_shell_commands(&mut self) -> Vec<ShellCommand> {
        self.shell_commands.drain()
    }

    fn status_line(&self) -> Option<String> {
        Some(match &self.last_dialogue_name {
            Some(name) => format!("Casewalk - {} - {}", self.scenario_name, name),
            None => format!("Casewalk - {}", self.scenario_name),
        })
    }
}
