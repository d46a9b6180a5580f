use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::session::TilePoint;

/// Semantic tags shared by tile layers and map objects. A tile or object may
/// carry several at once (a wall is `Non-Passable` + `Blocks-Vision`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TileTag {
    Interactable,
    #[serde(rename = "Non-Interactable")]
    NonInteractable,
    Passable,
    #[serde(rename = "Non-Passable")]
    NonPassable,
    #[serde(rename = "Blocks-Vision")]
    BlocksVision,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit tile step in this facing. Grid y grows downward.
    pub fn step(self) -> (i32, i32) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Player,
    Suspect,
    Clue,
    Other,
}

/// Stable object identifier in `kind:n` form, e.g. `p:1`, `s:2`, `c:1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    raw: String,
}

impl ObjectId {
    pub fn new(raw: impl Into<String>) -> Result<Self, MapError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(MapError::EmptyObjectId);
        }
        Ok(Self { raw })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ObjectKind {
        match self.raw.split(':').next() {
            Some("p") => ObjectKind::Player,
            Some("s") => ObjectKind::Suspect,
            Some("c") => ObjectKind::Clue,
            _ => ObjectKind::Other,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One tile grid of a map. Rows may have irregular lengths; the layer width
/// is the longest row. Tile code 0 means empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    name: String,
    order_in_layer: i32,
    tags: Vec<TileTag>,
    tile_map: Vec<Vec<u32>>,
}

impl TileLayer {
    pub fn new(
        name: impl Into<String>,
        order_in_layer: i32,
        tags: Vec<TileTag>,
        tile_map: Vec<Vec<u32>>,
    ) -> Self {
        Self {
            name: name.into(),
            order_in_layer,
            tags,
            tile_map,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order_in_layer(&self) -> i32 {
        self.order_in_layer
    }

    pub fn tags(&self) -> &[TileTag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: TileTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn width(&self) -> u32 {
        self.tile_map.iter().map(Vec::len).max().unwrap_or(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.tile_map.len() as u32
    }

    /// Bounds-checked lookup; out-of-range (including short rows) is `None`.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        self.tile_map
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.tile_map
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: ObjectId,
    pub name: String,
    pub position: TilePoint,
    pub facing: Option<Facing>,
    pub tags: Vec<TileTag>,
    pub order_in_layer: i32,
}

impl MapObject {
    pub fn has_tag(&self, tag: TileTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Directional sprite references for one asset. Any subset may be present;
/// lookup falls back front, then any available side, then none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionalAsset {
    pub left: Option<String>,
    pub right: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
}

impl DirectionalAsset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.front.is_none() && self.back.is_none()
    }

    fn key_for_facing(&self, facing: Facing) -> Option<&str> {
        match facing {
            Facing::Down => self.front.as_deref(),
            Facing::Up => self.back.as_deref(),
            Facing::Left => self.left.as_deref(),
            Facing::Right => self.right.as_deref(),
        }
    }

    pub fn resolve(&self, facing: Facing) -> Option<&str> {
        self.key_for_facing(facing)
            .or(self.front.as_deref())
            .or(self.left.as_deref())
            .or(self.right.as_deref())
            .or(self.back.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("object id must not be empty")]
    EmptyObjectId,
    #[error("duplicate object id: {0}")]
    DuplicateObjectId(String),
}

/// Immutable-per-session map: layers in draw order, objects, asset table.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    layers: Vec<TileLayer>,
    objects: Vec<MapObject>,
    assets: HashMap<String, DirectionalAsset>,
}

impl GameMap {
    pub fn new(
        mut layers: Vec<TileLayer>,
        objects: Vec<MapObject>,
        assets: HashMap<String, DirectionalAsset>,
    ) -> Result<Self, MapError> {
        let mut seen_ids = std::collections::HashSet::new();
        for object in &objects {
            if !seen_ids.insert(object.id.as_str().to_string()) {
                return Err(MapError::DuplicateObjectId(object.id.as_str().to_string()));
            }
        }
        layers.sort_by_key(TileLayer::order_in_layer);
        Ok(Self {
            layers,
            objects,
            assets,
        })
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn width(&self) -> u32 {
        self.layers.iter().map(TileLayer::width).max().unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.layers.iter().map(TileLayer::height).max().unwrap_or(0)
    }

    pub fn contains_tile(&self, tile: TilePoint) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width()
            && (tile.y as u32) < self.height()
    }

    pub fn objects_at(&self, tile: TilePoint) -> impl Iterator<Item = &MapObject> {
        self.objects
            .iter()
            .filter(move |object| object.position == tile)
    }

    pub fn asset(&self, id: &str) -> Option<&DirectionalAsset> {
        self.assets.get(id)
    }

    pub fn player_object(&self) -> Option<&MapObject> {
        self.objects
            .iter()
            .find(|object| object.id.kind() == ObjectKind::Player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_with_rows(rows: Vec<Vec<u32>>) -> TileLayer {
        TileLayer::new("floor", 0, vec![TileTag::Passable], rows)
    }

    #[test]
    fn layer_width_is_max_row_length() {
        let layer = layer_with_rows(vec![vec![1, 1], vec![1, 1, 1, 1], vec![1]]);
        assert_eq!(layer.width(), 4);
        assert_eq!(layer.height(), 3);
    }

    #[test]
    fn tile_at_is_none_for_short_rows_and_out_of_bounds() {
        let layer = layer_with_rows(vec![vec![1, 2], vec![3]]);
        assert_eq!(layer.tile_at(1, 0), Some(2));
        assert_eq!(layer.tile_at(1, 1), None);
        assert_eq!(layer.tile_at(-1, 0), None);
        assert_eq!(layer.tile_at(0, 9), None);
    }

    #[test]
    fn map_sorts_layers_by_order_in_layer() {
        let above = TileLayer::new("props", 5, vec![], vec![vec![1]]);
        let below = TileLayer::new("floor", 1, vec![], vec![vec![1]]);
        let map = GameMap::new(vec![above, below], Vec::new(), HashMap::new()).expect("map");
        assert_eq!(map.layers()[0].name(), "floor");
        assert_eq!(map.layers()[1].name(), "props");
    }

    #[test]
    fn duplicate_object_ids_are_rejected() {
        let object = |raw: &str| MapObject {
            id: ObjectId::new(raw).expect("id"),
            name: "dup".to_string(),
            position: TilePoint { x: 0, y: 0 },
            facing: None,
            tags: Vec::new(),
            order_in_layer: 0,
        };
        let result = GameMap::new(Vec::new(), vec![object("c:1"), object("c:1")], HashMap::new());
        assert_eq!(
            result.unwrap_err(),
            MapError::DuplicateObjectId("c:1".to_string())
        );
    }

    #[test]
    fn object_id_kind_parses_prefix() {
        assert_eq!(ObjectId::new("p:1").expect("id").kind(), ObjectKind::Player);
        assert_eq!(
            ObjectId::new("s:2").expect("id").kind(),
            ObjectKind::Suspect
        );
        assert_eq!(ObjectId::new("c:9").expect("id").kind(), ObjectKind::Clue);
        assert_eq!(
            ObjectId::new("door:1").expect("id").kind(),
            ObjectKind::Other
        );
        assert!(ObjectId::new("").is_err());
    }

    #[test]
    fn directional_asset_falls_back_front_then_any() {
        let full = DirectionalAsset {
            left: Some("l.png".to_string()),
            right: Some("r.png".to_string()),
            front: Some("f.png".to_string()),
            back: Some("b.png".to_string()),
        };
        assert_eq!(full.resolve(Facing::Left), Some("l.png"));
        assert_eq!(full.resolve(Facing::Down), Some("f.png"));

        let front_only = DirectionalAsset {
            front: Some("f.png".to_string()),
            ..DirectionalAsset::empty()
        };
        assert_eq!(front_only.resolve(Facing::Up), Some("f.png"));

        let back_only = DirectionalAsset {
            back: Some("b.png".to_string()),
            ..DirectionalAsset::empty()
        };
        assert_eq!(back_only.resolve(Facing::Right), Some("b.png"));

        assert_eq!(DirectionalAsset::empty().resolve(Facing::Down), None);
        assert!(DirectionalAsset::empty().is_empty());
    }
}
