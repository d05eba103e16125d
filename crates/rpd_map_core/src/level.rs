//! Level/map containing tile layers and objects

use crate::{EntityInstance, Layer, LayerData};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A level/map containing tiles and objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub entities: Vec<EntityInstance>,
}

impl Level {
    /// Create a new empty level
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            width,
            height,
            layers: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Add a new layer
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Add an empty tile layer sized to the level and return its index
    pub fn add_tile_layer(&mut self, name: &str) -> usize {
        self.layers
            .push(Layer::new_tile_layer(name.to_string(), self.width, self.height));
        self.layers.len() - 1
    }

    /// First layer with the given name
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// First layer with the given name, mutable
    pub fn layer_by_name_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    pub fn get_layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Add an object to the level
    pub fn add_entity(&mut self, entity: EntityInstance) {
        self.entities.push(entity);
    }

    /// Remove an object by ID, also dropping it from object layers
    pub fn remove_entity(&mut self, id: Uuid) -> Option<EntityInstance> {
        let pos = self.entities.iter().position(|e| e.id == id)?;
        for layer in &mut self.layers {
            if let LayerData::Objects { entities } = &mut layer.data {
                entities.retain(|e| *e != id);
            }
        }
        Some(self.entities.remove(pos))
    }

    pub fn get_entity(&self, id: Uuid) -> Option<&EntityInstance> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Resize the level and all of its layers.
    ///
    /// Tile content moves by `offset` cells; objects move by `offset * tile_size`
    /// pixels. When `remove_objects_outside` is set, objects that end up outside
    /// the new bounds are removed. Returns the number of removed objects.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        offset: (i32, i32),
        tile_size: u32,
        remove_objects_outside: bool,
    ) -> usize {
        for layer in &mut self.layers {
            layer.resize(width, height, offset);
        }
        self.width = width;
        self.height = height;

        let dx = (offset.0 * tile_size as i32) as f32;
        let dy = (offset.1 * tile_size as i32) as f32;
        for entity in &mut self.entities {
            entity.translate(dx, dy);
        }

        if !remove_objects_outside {
            return 0;
        }

        let pixel_width = (width * tile_size) as f32;
        let pixel_height = (height * tile_size) as f32;
        let outside: Vec<Uuid> = self
            .entities
            .iter()
            .filter(|e| !e.is_inside(pixel_width, pixel_height))
            .map(|e| e.id)
            .collect();
        for id in &outside {
            self.remove_entity(*id);
        }
        outside.len()
    }
}
