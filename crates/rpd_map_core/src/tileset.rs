//! Tileset configuration with multi-image support

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Per-tile metadata
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TileProperties {
    /// Terrain/semantic type name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    /// Animation frames for this tile (list of tile ids)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_frames: Option<Vec<u32>>,
    /// Custom user-defined properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, Value>,
}

impl TileProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, tile_type: &str) -> Self {
        self.tile_type = Some(tile_type.to_string());
        self
    }

    pub fn with_custom(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.custom.insert(key.to_string(), value.into());
        self
    }

    /// Check if any properties are set (non-default)
    pub fn is_empty(&self) -> bool {
        self.tile_type.is_none() && self.animation_frames.is_none() && self.custom.is_empty()
    }
}

/// A single image source within a tileset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetImage {
    pub id: Uuid,
    pub name: String,
    /// Path to the image file
    pub path: String,
    pub columns: u32,
    pub rows: u32,
}

impl TilesetImage {
    pub fn new(name: String, path: String, columns: u32, rows: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            path,
            columns,
            rows,
        }
    }

    /// Total number of tiles in this image
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }
}

/// A named collection of tile images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    /// Tile size in pixels (square tiles)
    pub tile_size: u32,
    #[serde(default)]
    pub images: Vec<TilesetImage>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tile_properties: BTreeMap<u32, TileProperties>,
}

impl Tileset {
    /// Create a new tileset with a single image
    pub fn new(name: String, path: String, tile_size: u32, columns: u32, rows: u32) -> Self {
        let image = TilesetImage::new("Main".to_string(), path, columns, rows);
        Self {
            id: Uuid::new_v4(),
            name,
            tile_size,
            images: vec![image],
            tile_properties: BTreeMap::new(),
        }
    }

    /// Create a new tileset without an image
    pub fn new_empty(name: String, tile_size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tile_size,
            images: Vec::new(),
            tile_properties: BTreeMap::new(),
        }
    }

    /// Add a new image to this tileset
    pub fn add_image(&mut self, name: String, path: String, columns: u32, rows: u32) -> Uuid {
        let image = TilesetImage::new(name, path, columns, rows);
        let id = image.id;
        self.images.push(image);
        id
    }

    pub fn total_tile_count(&self) -> u32 {
        self.images.iter().map(|img| img.tile_count()).sum()
    }

    /// Columns of the first image, zero without images
    pub fn columns(&self) -> u32 {
        self.images.first().map(|img| img.columns).unwrap_or(0)
    }

    pub fn primary_path(&self) -> Option<&str> {
        self.images.first().map(|img| img.path.as_str())
    }

    pub fn get_tile_properties(&self, tile_id: u32) -> Option<&TileProperties> {
        self.tile_properties.get(&tile_id)
    }

    /// Set properties for a tile; empty properties remove the entry
    pub fn set_tile_properties(&mut self, tile_id: u32, properties: TileProperties) {
        if properties.is_empty() {
            self.tile_properties.remove(&tile_id);
        } else {
            self.tile_properties.insert(tile_id, properties);
        }
    }
}
