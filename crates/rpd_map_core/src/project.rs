//! Map project - a level bundled with the tilesets its cells reference

use crate::{Level, Tileset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A level together with its tilesets
///
/// This is the unit handed to exporters and the format read by the
/// `rpd_export` command line tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapProject {
    /// Format version
    pub version: u32,
    pub level: Level,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

impl MapProject {
    pub fn new(level: Level, tilesets: Vec<Tileset>) -> Self {
        Self {
            version: 1,
            level,
            tilesets,
        }
    }

    /// Get a tileset by ID
    pub fn get_tileset(&self, id: Uuid) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.id == id)
    }

    /// Get a tileset by name
    pub fn tileset_by_name(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.name == name)
    }

    /// All unique tileset IDs referenced by cells in this level
    pub fn used_tileset_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .level
            .layers
            .iter()
            .flat_map(|layer| layer.used_tilesets())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Validate layer sizes and that all tileset references in the level are satisfied
    pub fn validate(&self) -> Result<(), String> {
        for layer in &self.level.layers {
            layer.check_size()?;
            for tileset_id in layer.used_tilesets() {
                if self.get_tileset(tileset_id).is_none() {
                    return Err(format!(
                        "Layer '{}' references missing tileset {}",
                        layer.name, tileset_id
                    ));
                }
            }
        }
        Ok(())
    }
}
