//! Layer types for tile and object layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tile id reported for a grid position that holds no tile
pub const EMPTY_TILE_ID: i64 = -1;

/// A single grid position's tile reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Tileset the tile belongs to
    pub tileset_id: Uuid,
    /// Tile id local to the tileset
    pub tile_id: u32,
}

impl Cell {
    pub fn new(tileset_id: Uuid, tile_id: u32) -> Self {
        Self {
            tileset_id,
            tile_id,
        }
    }
}

/// A layer (tiles or objects)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    pub data: LayerData,
}

impl Layer {
    /// Number of cells in a `width` x `height` grid, `None` if it does not fit in memory
    pub fn grid_len(width: u32, height: u32) -> Option<usize> {
        usize::try_from(width)
            .ok()?
            .checked_mul(usize::try_from(height).ok()?)
    }

    /// Create a new empty tile layer.
    ///
    /// A grid too large to address gets no cells; [`Layer::check_size`]
    /// reports such a layer.
    pub fn new_tile_layer(name: String, width: u32, height: u32) -> Self {
        let size = Self::grid_len(width, height).unwrap_or(0);
        Self {
            name,
            visible: true,
            width,
            height,
            data: LayerData::Tiles {
                tiles: vec![None; size],
            },
        }
    }

    /// Create a new object layer
    pub fn new_object_layer(name: String, width: u32, height: u32) -> Self {
        Self {
            name,
            visible: true,
            width,
            height,
            data: LayerData::Objects {
                entities: Vec::new(),
            },
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles { .. } => LayerType::Tiles,
            LayerData::Objects { .. } => LayerType::Objects,
        }
    }

    pub fn is_tile_layer(&self) -> bool {
        self.layer_type() == LayerType::Tiles
    }

    /// Check that a tile layer stores exactly one entry per grid position
    pub fn check_size(&self) -> Result<(), String> {
        let LayerData::Tiles { tiles } = &self.data else {
            return Ok(());
        };
        match Self::grid_len(self.width, self.height) {
            Some(len) if len == tiles.len() => Ok(()),
            _ => Err(format!(
                "Layer '{}' stores {} tiles for a {}x{} grid",
                self.name,
                tiles.len(),
                self.width,
                self.height
            )),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize)
            .saturating_mul(self.width as usize)
            .saturating_add(x as usize)
    }

    /// Get the cell at a grid position.
    ///
    /// Returns `None` for empty cells, out-of-bounds positions and object layers.
    pub fn cell_at(&self, x: u32, y: u32) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match &self.data {
            LayerData::Tiles { tiles } => tiles.get(self.index(x, y)).copied().flatten(),
            LayerData::Objects { .. } => None,
        }
    }

    /// Tile id at a grid position, [`EMPTY_TILE_ID`] when there is no tile
    pub fn tile_id_at(&self, x: u32, y: u32) -> i64 {
        self.cell_at(x, y)
            .map(|cell| i64::from(cell.tile_id))
            .unwrap_or(EMPTY_TILE_ID)
    }

    /// Set the cell at a grid position. Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, x: u32, y: u32, cell: Option<Cell>) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        if let LayerData::Tiles { tiles } = &mut self.data {
            if index < tiles.len() {
                tiles[index] = cell;
            }
        }
    }

    /// Tilesets referenced by the cells of this layer, in order of first use
    pub fn used_tilesets(&self) -> Vec<Uuid> {
        let mut used = Vec::new();
        if let LayerData::Tiles { tiles } = &self.data {
            for cell in tiles.iter().flatten() {
                if !used.contains(&cell.tileset_id) {
                    used.push(cell.tileset_id);
                }
            }
        }
        used
    }

    /// Resize the layer, moving existing content by `offset`.
    ///
    /// Content that falls outside the new bounds is dropped.
    pub fn resize(&mut self, width: u32, height: u32, offset: (i32, i32)) {
        let old_width = self.width as usize;
        if let LayerData::Tiles { tiles } = &mut self.data {
            let mut resized = vec![None; Self::grid_len(width, height).unwrap_or(0)];
            for (index, cell) in tiles.iter().enumerate().take_while(|_| old_width > 0) {
                let Some(cell) = cell else {
                    continue;
                };
                let nx = (index % old_width) as i64 + i64::from(offset.0);
                let ny = (index / old_width) as i64 + i64::from(offset.1);
                if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                    continue;
                }
                let target = (ny as usize)
                    .saturating_mul(width as usize)
                    .saturating_add(nx as usize);
                if let Some(slot) = resized.get_mut(target) {
                    *slot = Some(*cell);
                }
            }
            *tiles = resized;
        }
        self.width = width;
        self.height = height;
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Tiles,
    Objects,
}

/// The data contained in a layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerData {
    /// Tile layer, row-major; `None` means empty
    Tiles { tiles: Vec<Option<Cell>> },
    /// Object layer containing entity references
    Objects {
        /// Entity IDs placed on this layer
        entities: Vec<Uuid>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_layer() {
        let layer = Layer::new_tile_layer("logic".to_string(), 10, 8);

        assert_eq!(layer.name, "logic");
        assert!(layer.visible);
        assert_eq!(layer.layer_type(), LayerType::Tiles);

        if let LayerData::Tiles { tiles } = &layer.data {
            assert_eq!(tiles.len(), 80);
            assert!(tiles.iter().all(|t| t.is_none()));
        } else {
            panic!("Expected tile layer");
        }
    }

    #[test]
    fn test_new_object_layer() {
        let layer = Layer::new_object_layer("Objects".to_string(), 4, 4);

        assert_eq!(layer.name, "Objects");
        assert_eq!(layer.layer_type(), LayerType::Objects);
        assert_eq!(layer.cell_at(0, 0), None);
        assert!(layer.used_tilesets().is_empty());
    }

    #[test]
    fn test_cell_access() {
        let tileset = Uuid::new_v4();
        let mut layer = Layer::new_tile_layer("base".to_string(), 3, 2);

        assert_eq!(layer.tile_id_at(2, 1), EMPTY_TILE_ID);
        layer.set_cell(2, 1, Some(Cell::new(tileset, 12)));
        assert_eq!(layer.tile_id_at(2, 1), 12);
        assert_eq!(layer.cell_at(2, 1), Some(Cell::new(tileset, 12)));

        // Out of bounds is ignored / empty
        layer.set_cell(3, 0, Some(Cell::new(tileset, 1)));
        assert_eq!(layer.tile_id_at(3, 0), EMPTY_TILE_ID);
    }

    #[test]
    fn test_used_tilesets_in_first_use_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut layer = Layer::new_tile_layer("deco".to_string(), 3, 1);
        layer.set_cell(0, 0, Some(Cell::new(second, 0)));
        layer.set_cell(1, 0, Some(Cell::new(first, 1)));
        layer.set_cell(2, 0, Some(Cell::new(second, 2)));

        assert_eq!(layer.used_tilesets(), vec![second, first]);
    }

    #[test]
    fn test_check_size() {
        let mut layer = Layer::new_tile_layer("logic".to_string(), 3, 2);
        assert!(layer.check_size().is_ok());

        layer.width = 70_000;
        layer.height = 70_000;
        assert!(layer.check_size().unwrap_err().contains("70000x70000"));

        let objects = Layer::new_object_layer("Objects".to_string(), 9, 9);
        assert!(objects.check_size().is_ok());
    }

    #[test]
    fn test_resize_moves_and_crops() {
        let tileset = Uuid::new_v4();
        let mut layer = Layer::new_tile_layer("base".to_string(), 2, 2);
        layer.set_cell(0, 0, Some(Cell::new(tileset, 1)));
        layer.set_cell(1, 1, Some(Cell::new(tileset, 4)));

        layer.resize(3, 2, (1, -1));

        assert_eq!(layer.width, 3);
        assert_eq!(layer.height, 2);
        // (0,0) moved to (1,-1): cropped
        assert_eq!(layer.tile_id_at(1, 0), EMPTY_TILE_ID);
        assert_eq!(layer.tile_id_at(1, 1), EMPTY_TILE_ID);
        // (1,1) moved to (2,0)
        assert_eq!(layer.tile_id_at(2, 0), 4);
    }
}
