#[derive(Debug)]
pub(crate) struct InvestigationSession {
    scenario_name: String,
    map: GameMap,
    settings: GameplaySettings,
    player: PlayerState,
    player_asset_id: String,
    fog: FogField,
    fog_recompute_count: u64,
    systems_host: SimSystemsHost,
    tick_events: TickEventBus,
    shell_commands: ShellCommandQueue,
    static_tiles: Vec<TileSprite>,
    fog_draw_buffer: Vec<FogCellView>,
    last_dialogue_name: Option<String>,
}

impl InvestigationSession {
    pub(crate) fn new(
        scenario_name: String,
        map: GameMap,
        settings: GameplaySettings,
    ) -> Result<Self, String> {
        settings.validate()?;

        let player_object = map.player_object().ok_or_else(|| {
            "scenario map declares no player object (p:*); cannot start a session without a spawn"
                .to_string()
        })?;
        let player = PlayerState::spawn(
            player_object.position,
            player_object.facing.unwrap_or_default(),
            settings.move_speed_tiles_per_second,
        );
        let player_asset_id = player_object.id.as_str().to_string();
        let static_tiles = build_static_tiles(&map);

        info!(
            scenario = scenario_name.as_str(),
            spawn_x = player_object.position.x,
            spawn_y = player_object.position.y,
            static_tile_count = static_tiles.len(),
            system_order = SIM_SYSTEM_ORDER_TEXT,
            "session_created"
        );

        Ok(Self {
            scenario_name,
            map,
            settings,
            player,
            player_asset_id,
            fog: FogField::default(),
            fog_recompute_count: 0,
            systems_host: SimSystemsHost::default(),
            tick_events: TickEventBus::default(),
            shell_commands: ShellCommandQueue::default(),
            static_tiles,
            fog_draw_buffer: Vec::new(),
            last_dialogue_name: None,
        })
    }

    fn refresh_fog_draw_buffer(&mut self) {
        self.fog_draw_buffer.clear();

        let resolution = self.settings.vision.resolution_multiplier as i32;
        let resolution_f = self.settings.vision.resolution_multiplier as f32;
        let fine_width = self.map.width() as i32 * resolution;
        let fine_height = self.map.height() as i32 * resolution;
        // The distance ramp tracks the animated avatar, not the discrete
        // tile, so the gradient never jumps on a tile crossing.
        let origin = self.player.interpolated_position;

        for y in 0..fine_height {
            for x in 0..fine_width {
                let cell = TilePoint { x, y };
                let cell_center = Vec2 {
                    x: (x as f32 + 0.5) / resolution_f,
                    y: (y as f32 + 0.5) / resolution_f,
                };
                let distance_opacity =
                    distance_fog_opacity(origin, cell_center, &self.settings.vision);
                let opacity = fog_cell_opacity(distance_opacity, self.fog.factor(cell));
                if opacity > 0.0 {
                    self.fog_draw_buffer.push(FogCellView { cell, opacity });
                }
            }
        }
    }
}

fn build_static_tiles(map: &GameMap) -> Vec<TileSprite> {
    let mut tiles = Vec::new();

    for layer in map.layers() {
        let color = layer_fill_color(layer);
        for (y, row) in layer.rows().iter().enumerate() {
            for (x, code) in row.iter().enumerate() {
                if *code == 0 {
                    continue;
                }
                let sprite = map
                    .asset(&code.to_string())
                    .and_then(|asset| asset.resolve(Facing::Down))
                    .map(str::to_string);
                tiles.push(TileSprite {
                    position: TilePoint {
                        x: x as i32,
                        y: y as i32,
                    },
                    sprite,
                    color,
                });
            }
        }
    }

    let mut objects: Vec<&MapObject> = map
        .objects()
        .iter()
        .filter(|object| object.id.kind() != ObjectKind::Player)
        .collect();
    objects.sort_by_key(|object| object.order_in_layer);
    for object in objects {
        let facing = object.facing.unwrap_or_default();
        let sprite = map
            .asset(object.id.as_str())
            .and_then(|asset| asset.resolve(facing))
            .map(str::to_string);
        tiles.push(TileSprite {
            position: object.position,
            sprite,
            color: object_fill_color(object),
        });
    }

    tiles
}
