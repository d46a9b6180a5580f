use serde::Deserialize;

use crate::app::{Facing, TileTag};

/// Raw scenario document as served by the scenario backend. Field names
/// match the wire schema (camelCase, `type` for the tag list).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScenarioDoc {
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub scenario_id: u32,
    pub scenario_name: String,
    pub map: MapDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MapDoc {
    pub layers: Vec<LayerDoc>,
    #[serde(default)]
    pub objects: Vec<ObjectDoc>,
    #[serde(default)]
    pub assets: Vec<AssetDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayerDoc {
    pub order_in_layer: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub tags: Vec<TileTag>,
    pub tile_map: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PositionDoc {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectDoc {
    pub id: String,
    #[serde(default)]
    pub order_in_layer: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub tags: Vec<TileTag>,
    pub position: PositionDoc,
    #[serde(default)]
    pub facing: Option<Facing>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssetDoc {
    pub id: String,
    #[serde(default)]
    pub images: DirectionalImagesDoc,
}

/// Any subset of the four facings may be present; missing keys fall back at
/// lookup time, a fully empty set renders as a placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DirectionalImagesDoc {
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}
