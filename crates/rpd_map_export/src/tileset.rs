//! Tileset export as generic JSON

use std::path::{Path, PathBuf};

use rpd_map_core::{Tileset, Value};
use serde::{Deserialize, Serialize};

use crate::format::{record_outcome, write_json, TilesetFormat};
use crate::save_file::SaveFile;
use crate::ExportError;

/// JSON representation of a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    pub columns: u32,
    /// First image, relative to the output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Additional images beyond the first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileEntry>,
}

/// Per-tile data of a [`TilesetDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub id: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<TilePropertyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePropertyEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: serde_json::Value,
}

impl TilesetDocument {
    /// Convert a tileset, making image paths relative to `dir`
    pub fn from_tileset(tileset: &Tileset, dir: &Path) -> Self {
        let mut paths = tileset.images.iter().map(|img| relative_path(&img.path, dir));
        let image = paths.next();
        let images = paths.collect();

        let tiles = tileset
            .tile_properties
            .iter()
            .map(|(id, props)| TileEntry {
                id: *id,
                tile_type: props.tile_type.clone(),
                animation: props.animation_frames.clone().unwrap_or_default(),
                properties: props
                    .custom
                    .iter()
                    .map(|(name, value)| TilePropertyEntry {
                        name: name.clone(),
                        value_type: value_type_name(value).to_string(),
                        value: value.to_json(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            kind: "tileset".to_string(),
            name: tileset.name.clone(),
            tilewidth: tileset.tile_size,
            tileheight: tileset.tile_size,
            tilecount: tileset.total_tile_count(),
            columns: tileset.columns(),
            image,
            images,
            tiles,
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "class",
    }
}

/// `path` relative to `dir` when it lies inside it, unchanged otherwise
fn relative_path(path: &str, dir: &Path) -> String {
    let path = Path::new(path);
    if path.is_absolute() {
        if let Ok(relative) = path.strip_prefix(dir) {
            return relative.to_string_lossy().replace('\\', "/");
        }
    }
    path.to_string_lossy().replace('\\', "/")
}

/// Tileset format writing [`TilesetDocument`] JSON
#[derive(Debug, Default)]
pub struct RpdTilesetFormat {
    error: String,
}

impl RpdTilesetFormat {
    pub fn new() -> Self {
        Self::default()
    }

    fn try_write(&self, tileset: &Tileset, path: &Path) -> Result<(), ExportError> {
        let file = SaveFile::create(path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        write_json(file, &TilesetDocument::from_tileset(tileset, &dir))
    }
}

impl TilesetFormat for RpdTilesetFormat {
    fn short_name(&self) -> &str {
        "rpd-tileset"
    }

    fn name_filter(&self) -> String {
        "Json tileset files (*.json)".to_string()
    }

    fn read(&mut self, _path: &Path) -> Option<Tileset> {
        None
    }

    fn supports_file(&self, _path: &Path) -> bool {
        false
    }

    fn write(&mut self, tileset: &Tileset, path: &Path) -> Result<(), ExportError> {
        let result = self.try_write(tileset, path);
        record_outcome(&mut self.error, path, result)
    }

    fn error_string(&self) -> &str {
        &self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpd_map_core::TileProperties;
    use std::fs;

    fn sample_tileset(dir: &Path) -> Tileset {
        let image = dir.join("art/tiles_caves.png");
        let mut tileset = Tileset::new(
            "tiles_caves".to_string(),
            image.to_string_lossy().to_string(),
            16,
            16,
            4,
        );
        tileset.add_image("Extra".to_string(), "extra.png".to_string(), 2, 2);
        tileset.set_tile_properties(
            5,
            TileProperties::new()
                .with_type("water")
                .with_custom("deep", true)
                .with_custom("depth", 3i64),
        );
        tileset
    }

    #[test]
    fn document_from_tileset() {
        let dir = Path::new("/levels");
        let doc = TilesetDocument::from_tileset(&sample_tileset(dir), dir);

        assert_eq!(doc.kind, "tileset");
        assert_eq!(doc.name, "tiles_caves");
        assert_eq!(doc.tilewidth, 16);
        assert_eq!(doc.tilecount, 68);
        assert_eq!(doc.columns, 16);
        assert_eq!(doc.image.as_deref(), Some("art/tiles_caves.png"));
        assert_eq!(doc.images, vec!["extra.png".to_string()]);

        assert_eq!(doc.tiles.len(), 1);
        let tile = &doc.tiles[0];
        assert_eq!(tile.id, 5);
        assert_eq!(tile.tile_type.as_deref(), Some("water"));
        // Custom properties are sorted by name
        assert_eq!(tile.properties[0].name, "deep");
        assert_eq!(tile.properties[0].value_type, "bool");
        assert_eq!(tile.properties[1].name, "depth");
        assert_eq!(tile.properties[1].value, serde_json::json!(3));
    }

    #[test]
    fn paths_outside_dir_are_kept() {
        assert_eq!(
            relative_path("/other/tiles.png", Path::new("/levels")),
            "/other/tiles.png"
        );
        assert_eq!(relative_path("tiles.png", Path::new("/levels")), "tiles.png");
    }

    #[test]
    fn write_tileset_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiles_caves.json");
        let mut format = RpdTilesetFormat::new();

        format.write(&sample_tileset(tmp.path()), &path).unwrap();

        let doc: TilesetDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.image.as_deref(), Some("art/tiles_caves.png"));
        assert!(format.error_string().is_empty());
    }

    #[test]
    fn reading_is_unsupported() {
        let mut format = RpdTilesetFormat::new();
        assert!(format.read(Path::new("tiles.json")).is_none());
        assert!(!format.supports_file(Path::new("tiles.json")));
    }

    #[test]
    fn failed_tileset_write_reports_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut format = RpdTilesetFormat::new();
        let tileset = sample_tileset(tmp.path());

        let err = format
            .write(&tileset, &tmp.path().join("missing/tiles.json"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Open(_)));
        assert_eq!(format.error_string(), "Could not open file for writing.");
    }
}
