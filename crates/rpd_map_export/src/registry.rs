//! Registry of map and tileset formats
//!
//! Formats are found by short name or by the extensions listed in their
//! name filter. [`RpdPlugin`] registers the Remixed Pixel Dungeon formats.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::format::{MapFormat, RpdMapFormat, TilesetFormat};
use crate::tileset::RpdTilesetFormat;
use crate::{ExportConfig, ExportError};

/// Registry of the map and tileset formats available to the host.
#[derive(Default)]
pub struct FormatRegistry {
    map_formats: Vec<Box<dyn MapFormat>>,
    tileset_formats: Vec<Box<dyn TilesetFormat>>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field(
                "map_formats",
                &self.map_formats.iter().map(|m| m.short_name()).collect::<Vec<_>>(),
            )
            .field(
                "tileset_formats",
                &self
                    .tileset_formats
                    .iter()
                    .map(|t| t.short_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FormatRegistry {
    pub fn register_map_format(&mut self, format: Box<dyn MapFormat>) {
        debug!("Registered map format '{}'", format.short_name());
        self.map_formats.push(format);
    }

    pub fn register_tileset_format(&mut self, format: Box<dyn TilesetFormat>) {
        debug!("Registered tileset format '{}'", format.short_name());
        self.tileset_formats.push(format);
    }

    /// Map format by short name.
    pub fn map_format(&mut self, short_name: &str) -> Option<&mut Box<dyn MapFormat>> {
        self.map_formats
            .iter_mut()
            .find(|f| f.short_name() == short_name)
    }

    /// First map format whose name filter matches the file's extension.
    pub fn map_format_for_file(&mut self, path: &Path) -> Option<&mut Box<dyn MapFormat>> {
        let ext = file_extension(path)?;
        self.map_formats
            .iter_mut()
            .find(|f| extensions_from_filter(&f.name_filter()).contains(&ext))
    }

    /// Tileset format by short name.
    pub fn tileset_format(&mut self, short_name: &str) -> Option<&mut Box<dyn TilesetFormat>> {
        self.tileset_formats
            .iter_mut()
            .find(|f| f.short_name() == short_name)
    }

    /// First tileset format whose name filter matches the file's extension.
    pub fn tileset_format_for_file(
        &mut self,
        path: &Path,
    ) -> Option<&mut Box<dyn TilesetFormat>> {
        let ext = file_extension(path)?;
        self.tileset_formats
            .iter_mut()
            .find(|f| extensions_from_filter(&f.name_filter()).contains(&ext))
    }

    /// Name filters of all map formats, in registration order.
    pub fn map_name_filters(&self) -> Vec<String> {
        self.map_formats.iter().map(|f| f.name_filter()).collect()
    }

    /// Return all file extensions handled by any registered format.
    pub fn all_file_extensions(&self) -> Vec<String> {
        let filters = self
            .map_formats
            .iter()
            .map(|f| f.name_filter())
            .chain(self.tileset_formats.iter().map(|f| f.name_filter()));

        let mut exts = Vec::new();
        for filter in filters {
            for ext in extensions_from_filter(&filter) {
                if !exts.contains(&ext) {
                    exts.push(ext);
                }
            }
        }
        exts
    }
}

/// Extensions listed in a name filter such as `"Levels (*.json *.lvl)"`.
pub fn extensions_from_filter(filter: &str) -> Vec<String> {
    let patterns = match (filter.rfind('('), filter.rfind(')')) {
        (Some(open), Some(close)) if open < close => &filter[open + 1..close],
        _ => filter,
    };
    patterns
        .split_whitespace()
        .filter_map(|p| p.strip_prefix("*."))
        .map(str::to_ascii_lowercase)
        .collect()
}

fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Entry point registering the Remixed Pixel Dungeon formats.
pub struct RpdPlugin;

impl RpdPlugin {
    pub fn initialize(
        registry: &mut FormatRegistry,
        config: ExportConfig,
    ) -> Result<(), ExportError> {
        registry.register_map_format(Box::new(RpdMapFormat::new(config)?));
        registry.register_tileset_format(Box::new(RpdTilesetFormat::new()));
        Ok(())
    }
}
