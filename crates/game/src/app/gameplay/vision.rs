/// Grid-traversal line of sight from `from` to `to` in tile space
/// (Amanatides & Woo stepping). Returns true when the ray reaches the
/// destination tile unobstructed.
fn line_of_sight_clear(query: MapQuery<'_>, from: Vec2, to: Vec2, range: f32) -> bool {
    let start_x = from.x.floor() as i32;
    let start_y = from.y.floor() as i32;
    let end_x = to.x.floor() as i32;
    let end_y = to.y.floor() as i32;

    // Same-tile rays are trivially clear; this keeps the origin's own tile
    // from being occluded by its adjacent walls.
    if start_x == end_x && start_y == end_y {
        return true;
    }

    let ray_dir_x = to.x - from.x;
    let ray_dir_y = to.y - from.y;
    if ray_dir_x == 0.0 && ray_dir_y == 0.0 {
        return true;
    }

    let delta_dist_x = if ray_dir_x == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / ray_dir_x).abs()
    };
    let delta_dist_y = if ray_dir_y == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / ray_dir_y).abs()
    };

    let mut map_x = start_x;
    let mut map_y = start_y;

    let (step_x, mut side_dist_x) = if ray_dir_x < 0.0 {
        (-1, (from.x - map_x as f32) * delta_dist_x)
    } else {
        (1, (map_x as f32 + 1.0 - from.x) * delta_dist_x)
    };
    let (step_y, mut side_dist_y) = if ray_dir_y < 0.0 {
        (-1, (from.y - map_y as f32) * delta_dist_y)
    } else {
        (1, (map_y as f32 + 1.0 - from.y) * delta_dist_y)
    };

    // Walls may see adjacent walls; without this, wall faces bordering other
    // walls would read as fully dark.
    let destination_blocking = query.is_blocking_vision(TilePoint { x: end_x, y: end_y });

    let max_steps = (range * 2.0).ceil().max(1.0) as u32;
    let mut steps = 0u32;

    while steps < max_steps {
        if side_dist_x < side_dist_y {
            side_dist_x += delta_dist_x;
            map_x += step_x;
        } else {
            side_dist_y += delta_dist_y;
            map_y += step_y;
        }
        steps += 1;

        if query.is_blocking_vision(TilePoint { x: map_x, y: map_y })
            && !destination_blocking
            && (map_x != end_x || map_y != end_y)
        {
            return false;
        }

        if map_x == end_x && map_y == end_y {
            return true;
        }
    }

    // Step budget exhausted without reaching the target; fail open rather
    // than leaving the cell stuck dark.
    true
}

/// Visibility factors for all fine cells within range of the origin:
/// fraction of supersampled rays per cell that reach it. Only factors > 0
/// are stored.
fn compute_visibility_field(
    query: MapQuery<'_>,
    origin: Vec2,
    vision: &VisionSettings,
) -> HashMap<TilePoint, f32> {
    let mut visible = HashMap::new();
    let map = query.map();
    let map_width = map.width() as i32;
    let map_height = map.height() as i32;
    if map_width == 0 || map_height == 0 {
        return visible;
    }

    let resolution = vision.resolution_multiplier as i32;
    let resolution_f = vision.resolution_multiplier as f32;
    let origin_fine_x = origin.x * resolution_f;
    let origin_fine_y = origin.y * resolution_f;
    let range_fine = vision.range * resolution_f;

    let min_y = ((origin_fine_y - range_fine).floor() as i32).max(0);
    let max_y = ((origin_fine_y + range_fine).ceil() as i32).min(map_height * resolution - 1);
    let min_x = ((origin_fine_x - range_fine).floor() as i32).max(0);
    let max_x = ((origin_fine_x + range_fine).ceil() as i32).min(map_width * resolution - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let cell_center = Vec2 {
                x: (x as f32 + 0.5) / resolution_f,
                y: (y as f32 + 0.5) / resolution_f,
            };
            if distance_between(origin, cell_center) > vision.range {
                continue;
            }

            let mut successful_rays = 0u32;
            for (offset_x, offset_y) in RAY_SAMPLE_OFFSETS {
                let target = Vec2 {
                    x: (x as f32 + offset_x) / resolution_f,
                    y: (y as f32 + offset_y) / resolution_f,
                };
                if line_of_sight_clear(query, origin, target, vision.range) {
                    successful_rays += 1;
                }
            }

            if successful_rays > 0 {
                let factor = successful_rays as f32 / RAY_SAMPLE_OFFSETS.len() as f32;
                visible.insert(TilePoint { x, y }, factor);
            }
        }
    }

    visible
}

/// Distance-based fog for a tile-space point: clear inside the clear
/// radius, full beyond the vision range, linear ramp between.
fn distance_fog_opacity(origin: Vec2, point: Vec2, vision: &VisionSettings) -> f32 {
    let distance = distance_between(origin, point);

    if distance <= vision.clear_radius {
        return 0.0;
    }
    if distance >= vision.range {
        return 1.0;
    }

    let gradient_range = vision.range - vision.gradient_start_radius;
    let gradient_position = distance - vision.gradient_start_radius;
    (gradient_position / gradient_range).clamp(0.0, 1.0)
}

/// Shadow occlusion and distance falloff both contribute; whichever
/// produces more fog wins.
fn fog_cell_opacity(distance_opacity: f32, visibility_factor: f32) -> f32 {
    distance_opacity.max(1.0 - visibility_factor)
}
