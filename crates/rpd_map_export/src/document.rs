//! Level document assembly
//!
//! Walks the layers of a level and merges what each recognised layer
//! contributes into a single [`LevelDocument`].

use rpd_map_core::{Layer, MapProject};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ExportConfig, LayerNames, MarkerTable};
use crate::markers::extract_markers;
use crate::pack::{pack_cells, GridOrder};
use crate::ExportError;

/// The game's JSON level format
///
/// Fields are declared in key order so the serialized object is sorted.
/// Fields without a producing layer are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_tile_var: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tiles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deco_tile_var: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiexit: Option<Vec<[u32; 2]>>,
    pub tiles: String,
    pub water: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl LevelDocument {
    /// Indented JSON text
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// How a layer takes part in the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Logic,
    Base,
    Deco,
}

impl LayerRole {
    /// Role for a layer name, `None` for layers the format ignores
    pub fn of(name: &str, names: &LayerNames) -> Option<Self> {
        if name == names.logic {
            Some(LayerRole::Logic)
        } else if name == names.base {
            Some(LayerRole::Base)
        } else if name == names.deco {
            Some(LayerRole::Deco)
        } else {
            None
        }
    }
}

/// Builds [`LevelDocument`]s from map projects
#[derive(Debug, Clone)]
pub struct LevelExporter {
    config: ExportConfig,
    markers: MarkerTable,
}

impl Default for LevelExporter {
    fn default() -> Self {
        Self {
            config: ExportConfig::default(),
            markers: MarkerTable::default(),
        }
    }
}

impl LevelExporter {
    /// Create an exporter, validating the configuration
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        config.validate()?;
        let markers = config.marker_table()?;
        Ok(Self { config, markers })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Assemble the level document for a project
    pub fn assemble(&self, project: &MapProject) -> Result<LevelDocument, ExportError> {
        let mut doc = LevelDocument::default();
        let mut tiles = None;

        for layer in &project.level.layers {
            let Some(role) = LayerRole::of(&layer.name, &self.config.layers) else {
                continue;
            };
            if !layer.is_tile_layer() {
                debug!("Skipping non-tile layer '{}'", layer.name);
                continue;
            }
            layer.check_size().map_err(ExportError::InvalidLayer)?;

            match role {
                LayerRole::Logic => self.encode_logic(layer, &mut doc),
                LayerRole::Base => {
                    doc.base_tile_var = Some(pack_cells(layer, GridOrder::RowMajor));
                }
                LayerRole::Deco => {
                    doc.deco_tile_var = Some(pack_cells(layer, GridOrder::RowMajor));
                    doc.custom_tiles = Some(true);
                    tiles = Some(self.deco_tiles(project, layer)?);
                }
            }
        }

        doc.tiles = tiles.unwrap_or_else(|| self.config.default_tiles.clone());
        doc.water = self.config.water.clone();
        Ok(doc)
    }

    fn encode_logic(&self, layer: &Layer, doc: &mut LevelDocument) {
        let markers = extract_markers(layer, &self.markers, self.config.entrance_policy);
        debug!(
            "Logic layer '{}': {}x{}, {} exits",
            layer.name,
            layer.width,
            layer.height,
            markers.multiexit.len()
        );

        doc.width = Some(layer.width);
        doc.height = Some(layer.height);
        doc.map = Some(pack_cells(layer, GridOrder::RowMajor));
        doc.entrance = Some(markers.entrance);
        doc.multiexit = Some(markers.multiexit);
    }

    /// `tiles` value for a deco layer, which must use exactly one tileset
    fn deco_tiles(&self, project: &MapProject, layer: &Layer) -> Result<String, ExportError> {
        let used = layer.used_tilesets();
        let tileset_id = match used.as_slice() {
            [] => return Err(ExportError::EmptyDecoLayer),
            [id] => *id,
            _ => {
                return Err(ExportError::MultipleDecoTilesets { count: used.len() });
            }
        };

        let tileset = project
            .get_tileset(tileset_id)
            .ok_or_else(|| ExportError::UnknownTileset {
                layer: layer.name.clone(),
                tileset_id,
            })?;

        Ok(format!("{}{}", tileset.name, self.config.tiles_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpd_map_core::{Cell, Level, Tileset};

    fn project_with(layers: &[&str]) -> MapProject {
        let mut level = Level::new("Test".to_string(), 4, 3);
        for name in layers {
            level.add_tile_layer(name);
        }
        let tileset = Tileset::new("tiles0".to_string(), "tiles0.png".to_string(), 16, 16, 16);
        MapProject::new(level, vec![tileset])
    }

    fn set(project: &mut MapProject, layer: &str, x: u32, y: u32, tileset: usize, id: u32) {
        let tileset_id = project.tilesets[tileset].id;
        project
            .level
            .layer_by_name_mut(layer)
            .unwrap()
            .set_cell(x, y, Some(Cell::new(tileset_id, id)));
    }

    #[test]
    fn logic_layer_fields() {
        let mut project = project_with(&["logic"]);
        set(&mut project, "logic", 1, 2, 0, 7);
        set(&mut project, "logic", 3, 0, 0, 8);
        set(&mut project, "logic", 0, 0, 0, 4);

        let doc = LevelExporter::default().assemble(&project).unwrap();

        assert_eq!(doc.width, Some(4));
        assert_eq!(doc.height, Some(3));
        assert_eq!(doc.entrance, Some(vec![1, 2]));
        assert_eq!(doc.multiexit, Some(vec![[3, 0]]));
        let map = doc.map.unwrap();
        assert_eq!(map.len(), 12);
        assert_eq!(map[0], 4);
        assert_eq!(map[3], 8);
        assert_eq!(map[2 * 4 + 1], 7);
        assert_eq!(map[1], -1);
    }

    #[test]
    fn defaults_without_deco() {
        let project = project_with(&["logic", "base"]);
        let doc = LevelExporter::default().assemble(&project).unwrap();

        assert_eq!(doc.tiles, "tiles0_x.png");
        assert_eq!(doc.water, "water0.png");
        assert!(doc.base_tile_var.is_some());
        assert!(doc.deco_tile_var.is_none());
        assert!(doc.custom_tiles.is_none());
    }

    #[test]
    fn deco_layer_names_tileset() {
        let mut project = project_with(&["deco"]);
        set(&mut project, "deco", 2, 1, 0, 30);

        let doc = LevelExporter::default().assemble(&project).unwrap();

        assert_eq!(doc.tiles, "tiles0.png");
        assert_eq!(doc.custom_tiles, Some(true));
        assert_eq!(doc.deco_tile_var.unwrap()[4 + 2], 30);
    }

    #[test]
    fn empty_deco_layer_fails() {
        let project = project_with(&["logic", "deco"]);
        let err = LevelExporter::default().assemble(&project).unwrap_err();

        assert!(matches!(err, ExportError::EmptyDecoLayer));
        assert_eq!(err.to_string(), "You have deco layer please fill it");
    }

    #[test]
    fn deco_layer_with_two_tilesets_fails() {
        let mut project = project_with(&["deco"]);
        project.tilesets.push(Tileset::new(
            "tiles1".to_string(),
            "tiles1.png".to_string(),
            16,
            16,
            16,
        ));
        set(&mut project, "deco", 0, 0, 0, 1);
        set(&mut project, "deco", 1, 0, 1, 1);

        let err = LevelExporter::default().assemble(&project).unwrap_err();

        assert!(matches!(err, ExportError::MultipleDecoTilesets { count: 2 }));
        assert_eq!(err.to_string(), "Only one tileset per layer supported");
    }

    #[test]
    fn deco_layer_with_unknown_tileset_fails() {
        let mut project = project_with(&["deco"]);
        let layer = project.level.layer_by_name_mut("deco").unwrap();
        layer.set_cell(0, 0, Some(Cell::new(uuid::Uuid::new_v4(), 1)));

        let err = LevelExporter::default().assemble(&project).unwrap_err();
        assert!(matches!(err, ExportError::UnknownTileset { .. }));
    }

    #[test]
    fn cells_stored_beyond_the_grid_are_rejected() {
        let mut project = project_with(&["deco"]);
        project.tilesets.push(Tileset::new(
            "tiles1".to_string(),
            "tiles1.png".to_string(),
            16,
            16,
            16,
        ));
        set(&mut project, "deco", 0, 0, 0, 1);
        let hidden = Cell::new(project.tilesets[1].id, 1);
        let layer = project.level.layer_by_name_mut("deco").unwrap();
        if let rpd_map_core::LayerData::Tiles { tiles } = &mut layer.data {
            tiles.push(Some(hidden));
        }

        let err = LevelExporter::default().assemble(&project).unwrap_err();
        assert!(matches!(err, ExportError::InvalidLayer(_)));
        assert_eq!(err.to_string(), "Layer 'deco' stores 13 tiles for a 4x3 grid");
    }

    #[test]
    fn unknown_and_object_layers_are_ignored() {
        let mut project = project_with(&["background"]);
        project
            .level
            .add_layer(rpd_map_core::Layer::new_object_layer("logic".to_string(), 4, 3));

        let doc = LevelExporter::default().assemble(&project).unwrap();

        assert_eq!(
            doc,
            LevelDocument {
                tiles: "tiles0_x.png".to_string(),
                water: "water0.png".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn later_logic_layer_wins() {
        let mut project = project_with(&["logic"]);
        set(&mut project, "logic", 0, 0, 0, 7);
        project
            .level
            .add_layer(rpd_map_core::Layer::new_tile_layer("logic".to_string(), 2, 2));

        let doc = LevelExporter::default().assemble(&project).unwrap();

        assert_eq!(doc.width, Some(2));
        assert_eq!(doc.entrance, Some(vec![]));
        assert_eq!(doc.map.unwrap().len(), 4);
    }

    #[test]
    fn custom_layer_names() {
        let mut config = ExportConfig::default();
        config.layers.deco = "decoration".to_string();
        config.default_tiles = "tiles_sewers.png".to_string();
        let exporter = LevelExporter::new(config).unwrap();

        // "deco" is now an ordinary layer and does not need a tileset
        let project = project_with(&["deco"]);
        let doc = exporter.assemble(&project).unwrap();
        assert_eq!(doc.tiles, "tiles_sewers.png");
    }

    #[test]
    fn json_keys_are_sorted() {
        let mut project = project_with(&["logic", "base", "deco"]);
        set(&mut project, "deco", 0, 0, 0, 1);

        let json = LevelExporter::default()
            .assemble(&project)
            .unwrap()
            .to_json_pretty()
            .unwrap();
        // Top-level keys in the order they appear in the text
        let keys: Vec<&str> = json
            .lines()
            .filter_map(|line| line.strip_prefix("  \""))
            .filter_map(|rest| rest.split_once("\":"))
            .map(|(key, _)| key)
            .collect();

        assert_eq!(
            keys,
            vec![
                "baseTileVar",
                "customTiles",
                "decoTileVar",
                "entrance",
                "height",
                "map",
                "multiexit",
                "tiles",
                "water",
                "width"
            ]
        );
        // Indented output
        assert!(json.contains("\n  \"baseTileVar\""));
    }
}
