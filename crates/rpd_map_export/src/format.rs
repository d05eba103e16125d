//! File format interfaces and the level format

use std::path::Path;

use rpd_map_core::{MapProject, Tileset};
use serde::Serialize;
use tracing::{info, warn};

use crate::document::LevelExporter;
use crate::save_file::SaveFile;
use crate::{ExportConfig, ExportError};

/// A format maps can be written in
pub trait MapFormat {
    /// Identifier used to pick the format by name
    fn short_name(&self) -> &str;

    /// Human readable filter, e.g. `"Levels (*.json)"`
    fn name_filter(&self) -> String;

    fn write(&mut self, project: &MapProject, path: &Path) -> Result<(), ExportError>;

    /// Message of the last failed write, empty after a success
    fn error_string(&self) -> &str;
}

/// A format tilesets can be written in
pub trait TilesetFormat {
    fn short_name(&self) -> &str;

    fn name_filter(&self) -> String;

    /// Read a tileset, `None` if the format cannot read
    fn read(&mut self, path: &Path) -> Option<Tileset>;

    fn supports_file(&self, path: &Path) -> bool;

    fn write(&mut self, tileset: &Tileset, path: &Path) -> Result<(), ExportError>;

    fn error_string(&self) -> &str;
}

/// Serialize `value` as indented JSON into a committed [`SaveFile`]
pub(crate) fn write_json<T: Serialize>(mut file: SaveFile, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    file.write_all(json.as_bytes())?;
    file.commit()
}

/// Store the outcome of a write as the format's error string
pub(crate) fn record_outcome(
    error: &mut String,
    path: &Path,
    result: Result<(), ExportError>,
) -> Result<(), ExportError> {
    match &result {
        Ok(()) => {
            error.clear();
            info!("Exported {:?}", path);
        }
        Err(e) => {
            *error = e.to_string();
            warn!("Export to {:?} failed: {}", path, e);
        }
    }
    result
}

/// Remixed Pixel Dungeon level format
#[derive(Debug, Default)]
pub struct RpdMapFormat {
    exporter: LevelExporter,
    error: String,
}

impl RpdMapFormat {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        Ok(Self {
            exporter: LevelExporter::new(config)?,
            error: String::new(),
        })
    }

    fn try_write(&self, project: &MapProject, path: &Path) -> Result<(), ExportError> {
        let file = SaveFile::create(path)?;
        let document = self.exporter.assemble(project)?;
        write_json(file, &document)
    }
}

impl MapFormat for RpdMapFormat {
    fn short_name(&self) -> &str {
        "rpd"
    }

    fn name_filter(&self) -> String {
        "Remixed Pixel Dungeon levels (*.json)".to_string()
    }

    fn write(&mut self, project: &MapProject, path: &Path) -> Result<(), ExportError> {
        let result = self.try_write(project, path);
        record_outcome(&mut self.error, path, result)
    }

    fn error_string(&self) -> &str {
        &self.error
    }
}
