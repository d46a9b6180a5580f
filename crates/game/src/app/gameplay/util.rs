/// Cardinal facing for a movement vector; the vertical component wins on
/// diagonal input so sprites stay front/back facing while strafing.
fn facing_from_vector(vector: Vec2, fallback: Facing) -> Facing {
    if vector.y < 0.0 {
        Facing::Up
    } else if vector.y > 0.0 {
        Facing::Down
    } else if vector.x < 0.0 {
        Facing::Left
    } else if vector.x > 0.0 {
        Facing::Right
    } else {
        fallback
    }
}

fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}

fn distance_between(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

fn layer_fill_color(layer: &TileLayer) -> [u8; 4] {
    if layer.has_tag(TileTag::NonPassable) {
        TILE_COLOR_WALL
    } else if layer.has_tag(TileTag::Interactable) {
        TILE_COLOR_INTERACTABLE
    } else {
        TILE_COLOR_FLOOR
    }
}

fn object_fill_color(object: &MapObject) -> [u8; 4] {
    match object.id.kind() {
        ObjectKind::Suspect => OBJECT_COLOR_SUSPECT,
        ObjectKind::Clue => OBJECT_COLOR_CLUE,
        ObjectKind::Player | ObjectKind::Other => OBJECT_COLOR_OTHER,
    }
}
