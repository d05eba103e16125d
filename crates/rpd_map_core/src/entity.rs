//! Objects placed on a level (mobs, items, triggers)

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An object placed on a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInstance {
    pub id: Uuid,
    /// Type name (e.g., "Mob", "Item", "Trap")
    pub type_name: String,
    /// Position in pixels [x, y]
    pub position: [f32; 2],
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl EntityInstance {
    pub fn new(type_name: String, position: [f32; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_name,
            position,
            properties: HashMap::new(),
        }
    }

    /// Whether the position lies within a `width` x `height` pixel area
    pub fn is_inside(&self, width: f32, height: f32) -> bool {
        let [x, y] = self.position;
        x >= 0.0 && y >= 0.0 && x < width && y < height
    }

    /// Move by a pixel delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position[0] += dx;
        self.position[1] += dy;
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_string())
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }
}
