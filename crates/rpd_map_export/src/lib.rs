//! Remixed Pixel Dungeon export for rpd_map
//!
//! Converts a [`MapProject`](rpd_map_core::MapProject) into the game's JSON
//! level format and writes tilesets as generic JSON. Layers are recognised by
//! name:
//! - `logic` - terrain grid plus entrance/exit markers
//! - `base` - base tile variations
//! - `deco` - decoration tiles drawn from a single custom tileset
//!
//! # Example
//!
//! ```rust,ignore
//! use rpd_map_export::{FormatRegistry, RpdPlugin, ExportConfig};
//!
//! let mut registry = FormatRegistry::default();
//! RpdPlugin::initialize(&mut registry, ExportConfig::default())?;
//!
//! let format = registry.map_format_for_file(Path::new("level.json")).unwrap();
//! if format.write(&project, Path::new("level.json")).is_err() {
//!     eprintln!("{}", format.error_string());
//! }
//! ```

mod config;
mod document;
mod format;
mod markers;
mod pack;
mod registry;
mod save_file;
mod tileset;

pub use config::{EntrancePolicy, ExportConfig, LayerNames, MarkerIds, MarkerTable, TileRole};
pub use document::{LayerRole, LevelDocument, LevelExporter};
pub use format::{MapFormat, RpdMapFormat, TilesetFormat};
pub use markers::{extract_markers, Markers};
pub use pack::{pack_cells, GridOrder, GridPositions};
pub use registry::{extensions_from_filter, FormatRegistry, RpdPlugin};
pub use save_file::SaveFile;
pub use tileset::{RpdTilesetFormat, TileEntry, TilePropertyEntry, TilesetDocument};

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while exporting a level or tileset
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not open file for writing.")]
    Open(#[source] std::io::Error),
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Error while writing file:\n{0}")]
    Write(#[source] std::io::Error),
    #[error("{0}")]
    Commit(#[source] std::io::Error),
    #[error("You have deco layer please fill it")]
    EmptyDecoLayer,
    #[error("Only one tileset per layer supported")]
    MultipleDecoTilesets { count: usize },
    #[error("Layer '{layer}' references missing tileset {tileset_id}")]
    UnknownTileset { layer: String, tileset_id: Uuid },
    #[error("{0}")]
    InvalidLayer(String),
    #[error("Invalid export configuration: {0}")]
    Config(String),
    #[error("Failed to parse export configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
