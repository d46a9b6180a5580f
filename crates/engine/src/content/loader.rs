use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::app::{DirectionalAsset, GameMap, MapError, MapObject, ObjectId, TileLayer, TilePoint};
use crate::AppPaths;

use super::hashing::scenario_fingerprint_hex;
use super::types::{AssetDoc, ScenarioDoc};

pub const SCENARIO_ENV_VAR: &str = "CASEWALK_SCENARIO";
pub const DEFAULT_SCENARIO_FILE: &str = "manor.json";

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario file not found: {path}")]
    ScenarioFileMissing { path: PathBuf },
    #[error("invalid map data in scenario {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: MapError,
    },
}

/// Identity of a loaded scenario: backend metadata plus the SHA-256
/// fingerprint of the document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub scenario_id: u32,
    pub scenario_name: String,
    pub created_date: Option<String>,
    pub fingerprint_hex: String,
}

/// Pick the scenario file to load: `CASEWALK_SCENARIO` (absolute, or
/// relative to the scenarios directory), else the default scenario.
pub fn resolve_scenario_path(paths: &AppPaths) -> Result<PathBuf, ScenarioError> {
    let candidate = match env::var(SCENARIO_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            if raw.is_absolute() {
                raw
            } else {
                paths.scenarios_dir.join(raw)
            }
        }
        Err(_) => paths.scenarios_dir.join(DEFAULT_SCENARIO_FILE),
    };

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(ScenarioError::ScenarioFileMissing { path: candidate })
    }
}

pub fn load_scenario(path: &Path) -> Result<(ScenarioInfo, GameMap), ScenarioError> {
    let bytes = fs::read(path).map_err(|source| ScenarioError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let fingerprint_hex = scenario_fingerprint_hex(&bytes);
    let doc: ScenarioDoc =
        serde_json::from_slice(&bytes).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let map = convert_map(path, doc.map)?;
    let info = ScenarioInfo {
        scenario_id: doc.scenario_id,
        scenario_name: doc.scenario_name,
        created_date: doc.created_date,
        fingerprint_hex,
    };

    info!(
        scenario_id = info.scenario_id,
        scenario_name = info.scenario_name.as_str(),
        fingerprint = info.fingerprint_hex.as_str(),
        layer_count = map.layers().len(),
        object_count = map.objects().len(),
        map_width = map.width(),
        map_height = map.height(),
        "scenario_loaded"
    );

    Ok((info, map))
}

fn convert_map(path: &Path, doc: super::types::MapDoc) -> Result<GameMap, ScenarioError> {
    let map_error = |source: MapError| ScenarioError::Map {
        path: path.to_path_buf(),
        source,
    };

    let layers = doc
        .layers
        .into_iter()
        .map(|layer| TileLayer::new(layer.name, layer.order_in_layer, layer.tags, layer.tile_map))
        .collect::<Vec<_>>();

    let mut objects = Vec::with_capacity(doc.objects.len());
    for object in doc.objects {
        objects.push(MapObject {
            id: ObjectId::new(object.id).map_err(map_error)?,
            name: object.name,
            position: TilePoint {
                x: object.position.x,
                y: object.position.y,
            },
            facing: object.facing,
            tags: object.tags,
            order_in_layer: object.order_in_layer,
        });
    }

    let assets: HashMap<String, DirectionalAsset> =
        doc.assets.into_iter().map(convert_asset).collect();

    GameMap::new(layers, objects, assets).map_err(map_error)
}

fn convert_asset(doc: AssetDoc) -> (String, DirectionalAsset) {
    (
        doc.id,
        DirectionalAsset {
            left: doc.images.left,
            right: doc.images.right,
            front: doc.images.front,
            back: doc.images.back,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Facing, ObjectKind, TileTag};
    use tempfile::TempDir;

    const SAMPLE_SCENARIO: &str = r#"{
        "createdDate": "2025-11-02",
        "scenarioId": 7,
        "scenarioName": "Study in Teal",
        "map": {
            "layers": [
                {
                    "orderInLayer": 0,
                    "name": "floor",
                    "type": ["Passable"],
                    "tileMap": [[1, 1, 1], [1, 1, 1]]
                },
                {
                    "orderInLayer": 1,
                    "name": "walls",
                    "type": ["Non-Passable", "Blocks-Vision"],
                    "tileMap": [[2, 2], [0, 0, 2, 2]]
                }
            ],
            "objects": [
                {
                    "id": "p:1",
                    "name": "Detective",
                    "type": ["Passable"],
                    "position": {"x": 1, "y": 1},
                    "facing": "down"
                },
                {
                    "id": "c:1",
                    "orderInLayer": 2,
                    "name": "Torn Letter",
                    "type": ["Interactable", "Non-Passable"],
                    "position": {"x": 2, "y": 0}
                }
            ],
            "assets": [
                {"id": "p:1", "images": {"front": "sprites/detective_front.png"}},
                {"id": "c:1", "images": {}}
            ]
        }
    }"#;

    fn write_scenario(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write scenario");
        path
    }

    #[test]
    fn sample_scenario_parses_into_game_map() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_scenario(&dir, "sample.json", SAMPLE_SCENARIO);

        let (info, map) = load_scenario(&path).expect("load");

        assert_eq!(info.scenario_id, 7);
        assert_eq!(info.scenario_name, "Study in Teal");
        assert_eq!(info.created_date.as_deref(), Some("2025-11-02"));
        assert_eq!(info.fingerprint_hex.len(), 64);

        // Width is the max row length across all layers, rows may be ragged.
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 2);
        assert_eq!(map.layers().len(), 2);
        assert!(map.layers()[1].has_tag(TileTag::BlocksVision));
        assert_eq!(map.layers()[1].tile_at(3, 1), Some(2));
        assert_eq!(map.layers()[1].tile_at(2, 0), None);

        let player = map.player_object().expect("player object");
        assert_eq!(player.id.kind(), ObjectKind::Player);
        assert_eq!(player.facing, Some(Facing::Down));

        let clue_asset = map.asset("c:1").expect("asset entry");
        assert!(clue_asset.is_empty());
        let player_asset = map.asset("p:1").expect("asset entry");
        assert_eq!(
            player_asset.resolve(Facing::Up),
            Some("sprites/detective_front.png")
        );
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_scenario(&dir, "broken.json", "{\"scenarioName\": ");

        let error = load_scenario(&path).expect_err("should fail");
        assert!(matches!(error, ScenarioError::Parse { .. }));
    }

    #[test]
    fn unknown_tag_reports_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_scenario(
            &dir,
            "tags.json",
            r#"{
                "scenarioName": "x",
                "map": {
                    "layers": [
                        {"orderInLayer": 0, "name": "l", "type": ["Ethereal"], "tileMap": [[1]]}
                    ]
                }
            }"#,
        );

        let error = load_scenario(&path).expect_err("should fail");
        assert!(matches!(error, ScenarioError::Parse { .. }));
    }

    #[test]
    fn duplicate_object_ids_surface_as_map_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_scenario(
            &dir,
            "dup.json",
            r#"{
                "scenarioName": "x",
                "map": {
                    "layers": [],
                    "objects": [
                        {"id": "c:1", "name": "a", "type": [], "position": {"x": 0, "y": 0}},
                        {"id": "c:1", "name": "b", "type": [], "position": {"x": 1, "y": 0}}
                    ]
                }
            }"#,
        );

        let error = load_scenario(&path).expect_err("should fail");
        assert!(matches!(error, ScenarioError::Map { .. }));
    }

    #[test]
    fn missing_scenario_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let paths = AppPaths {
            root: dir.path().to_path_buf(),
            assets_dir: dir.path().join("assets"),
            scenarios_dir: dir.path().join("assets").join("scenarios"),
        };

        let error = resolve_scenario_path(&paths).expect_err("no scenario on disk");
        assert!(matches!(error, ScenarioError::ScenarioFileMissing { .. }));
    }
}
