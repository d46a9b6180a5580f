use std::collections::HashMap;
use std::fs;
use std::path::Path;

use engine::{
    Facing, FogCellView, FrameView, GameMap, InputAction, InputSnapshot, MapObject, ObjectId,
    ObjectKind, PlayerView, ScenarioInfo, Session, ShellCommand, TileLayer, TilePoint, TileSprite,
    TileTag, Vec2,
};
use serde::Deserialize;
use tracing::{debug, info};

pub(crate) const SETTINGS_FILE: &str = "settings.json";

const VISION_RANGE_TILES: f32 = 16.0;
const CLEAR_VISION_RADIUS_TILES: f32 = 8.0;
const GRADIENT_START_RADIUS_TILES: f32 = 6.0;
const FOG_RESOLUTION_MULTIPLIER: u32 = 3;
const MOVE_SPEED_TILES_PER_SECOND: f32 = 8.0;
const MOVEMENT_DURATION_MS: u64 = 200;
const SIM_SYSTEM_ORDER_TEXT: &str = "Movement>Interaction>Interpolation>FogOfWar";

// Five supersampling points per fine cell: center plus near-corner offsets.
const RAY_SAMPLE_OFFSETS: [(f32, f32); 5] = [
    (0.5, 0.5),
    (0.1, 0.1),
    (0.9, 0.1),
    (0.1, 0.9),
    (0.9, 0.9),
];

const TILE_COLOR_WALL: [u8; 4] = [70, 74, 86, 255];
const TILE_COLOR_FLOOR: [u8; 4] = [44, 48, 58, 255];
const TILE_COLOR_INTERACTABLE: [u8; 4] = [146, 116, 58, 255];
const OBJECT_COLOR_SUSPECT: [u8; 4] = [152, 88, 96, 255];
const OBJECT_COLOR_CLUE: [u8; 4] = [180, 150, 70, 255];
const OBJECT_COLOR_OTHER: [u8; 4] = [116, 120, 132, 255];

include!("types.rs");
include!("map_query.rs");
include!("vision.rs");
include!("systems.rs");
include!("session_state.rs");
include!("session_impl.rs");
include!("util.rs");

pub(crate) fn build_session(
    scenario_info: &ScenarioInfo,
    map: GameMap,
    settings: GameplaySettings,
) -> Result<InvestigationSession, String> {
    InvestigationSession::new(scenario_info.scenario_name.clone(), map, settings)
}

/// Load gameplay settings from disk, falling back to defaults when the file
/// does not exist. Parse failures are startup errors, not silent defaults.
pub(crate) fn load_settings(path: &Path) -> Result<GameplaySettings, String> {
    if !path.is_file() {
        return Ok(GameplaySettings::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read settings '{}': {error}", path.display()))?;
    let settings = parse_settings_json(&raw)?;
    info!(path = %path.display(), "settings_loaded");
    Ok(settings)
}

fn parse_settings_json(raw: &str) -> Result<GameplaySettings, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, GameplaySettings>(&mut deserializer) {
        Ok(settings) => Ok(settings),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse settings json: {source}"))
            } else {
                Err(format!("parse settings json at {path}: {source}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
