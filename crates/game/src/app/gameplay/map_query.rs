/// Pure lookups against the session's map. Borrowed per tick so systems can
/// share it without owning the map; the out-of-bounds policy is injected
/// from settings rather than hard-coded.
#[derive(Clone, Copy)]
struct MapQuery<'a> {
    map: &'a GameMap,
    out_of_bounds: OutOfBoundsPolicy,
}

#[derive(Debug, Clone, PartialEq)]
struct InteractableHit {
    id: ObjectId,
    name: String,
}

impl<'a> MapQuery<'a> {
    fn new(map: &'a GameMap, out_of_bounds: OutOfBoundsPolicy) -> Self {
        Self { map, out_of_bounds }
    }

    fn map(&self) -> &'a GameMap {
        self.map
    }

    fn is_blocking_movement(&self, tile: TilePoint) -> bool {
        if !self.map.contains_tile(tile) && self.out_of_bounds == OutOfBoundsPolicy::Blocked {
            return true;
        }

        for layer in self.map.layers() {
            if !layer.has_tag(TileTag::NonPassable) {
                continue;
            }
            if matches!(layer.tile_at(tile.x, tile.y), Some(code) if code != 0) {
                return true;
            }
        }

        self.map
            .objects_at(tile)
            .any(|object| object.has_tag(TileTag::NonPassable))
    }

    /// Out-of-range tiles never block sight.
    fn is_blocking_vision(&self, tile: TilePoint) -> bool {
        for layer in self.map.layers() {
            if !layer.has_tag(TileTag::BlocksVision) {
                continue;
            }
            if matches!(layer.tile_at(tile.x, tile.y), Some(code) if code != 0) {
                return true;
            }
        }
        false
    }

    /// Object hits win over layer-tile hits; a layer hit reports the tile
    /// code as its id and the layer name as its display name.
    fn interactable_at(&self, tile: TilePoint) -> Option<InteractableHit> {
        for object in self.map.objects_at(tile) {
            if object.has_tag(TileTag::Interactable) {
                return Some(InteractableHit {
                    id: object.id.clone(),
                    name: object.name.clone(),
                });
            }
        }

        for layer in self.map.layers() {
            if !layer.has_tag(TileTag::Interactable) {
                continue;
            }
            if let Some(code) = layer.tile_at(tile.x, tile.y) {
                if code != 0 {
                    return ObjectId::new(code.to_string()).ok().map(|id| InteractableHit {
                        id,
                        name: layer.name().to_string(),
                    });
                }
            }
        }

        None
    }
}
