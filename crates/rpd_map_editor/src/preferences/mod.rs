//! Editor preferences and persistent settings
//!
//! [`Preferences`] is created once at startup (usually through
//! [`Preferences::load`]) and passed by reference to whatever needs it.
//! Interested parties subscribe to [`PreferenceChange`] notifications; a
//! setter only notifies when the stored value actually changes.
//!
//! Settings are stored as JSON in platform-specific config directories:
//! - Windows: %APPDATA%/rpd_map/
//! - Linux: ~/.config/rpd_map/
//! - macOS: ~/Library/Application Support/org.rpd_map.rpd_map/

mod file;

pub use file::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which object labels the map view draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectLabelVisibility {
    NoObjectLabels,
    SelectedObjectLabels,
    AllObjectLabels,
}

/// Encoding used for tile layer data in saved maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerDataFormat {
    Xml,
    Base64,
    Base64Gzip,
    Base64Zlib,
    Csv,
}

/// Order in which tiles are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOrder {
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

/// File dialogs that remember their last location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileType {
    ObjectTypesFile,
    ImageFile,
    ExportedFile,
    ExternalTileset,
}

/// The persisted preference values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Version for future migrations
    pub version: u32,

    // Map view
    pub show_grid: bool,
    pub show_tile_object_outlines: bool,
    pub show_tile_animations: bool,
    pub snap_to_grid: bool,
    pub snap_to_fine_grid: bool,
    pub grid_color: [u8; 3],
    pub grid_fine: u32,
    pub object_line_width: f32,
    pub highlight_current_layer: bool,
    pub show_tileset_grid: bool,
    pub object_label_visibility: ObjectLabelVisibility,

    // Saving
    pub layer_data_format: LayerDataFormat,
    pub map_render_order: RenderOrder,
    pub dtd_enabled: bool,
    pub reload_tilesets_on_change: bool,

    // Editing
    pub remove_objects_outside_map: bool,
    pub automapping_drawing: bool,

    // Interface
    pub language: String,
    pub open_last_files_on_startup: bool,

    // Paths
    pub maps_directory: String,
    pub stamps_directory: String,
    pub object_types_file: String,
    pub last_paths: BTreeMap<FileType, String>,

    // Bookkeeping
    /// Unix timestamp of the first run
    pub first_run: Option<u64>,
    pub run_count: u32,
    pub is_patron: bool,
    pub check_for_updates: bool,

    /// Plugin file name -> enabled
    pub enabled_plugins: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            show_grid: false,
            show_tile_object_outlines: false,
            show_tile_animations: true,
            snap_to_grid: false,
            snap_to_fine_grid: false,
            grid_color: [0, 0, 0],
            grid_fine: 4,
            object_line_width: 2.0,
            highlight_current_layer: false,
            show_tileset_grid: true,
            object_label_visibility: ObjectLabelVisibility::AllObjectLabels,
            layer_data_format: LayerDataFormat::Base64Zlib,
            map_render_order: RenderOrder::RightDown,
            dtd_enabled: false,
            reload_tilesets_on_change: true,
            remove_objects_outside_map: true,
            automapping_drawing: false,
            language: String::new(),
            open_last_files_on_startup: true,
            maps_directory: String::new(),
            stamps_directory: String::new(),
            object_types_file: String::new(),
            last_paths: BTreeMap::new(),
            first_run: None,
            run_count: 0,
            is_patron: false,
            check_for_updates: true,
            enabled_plugins: BTreeMap::new(),
        }
    }
}

/// A preference that changed, with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceChange {
    ShowGrid(bool),
    ShowTileObjectOutlines(bool),
    ShowTileAnimations(bool),
    SnapToGrid(bool),
    SnapToFineGrid(bool),
    GridColor([u8; 3]),
    GridFine(u32),
    ObjectLineWidth(f32),
    HighlightCurrentLayer(bool),
    ShowTilesetGrid(bool),
    ObjectLabelVisibility(ObjectLabelVisibility),
    LayerDataFormat(LayerDataFormat),
    MapRenderOrder(RenderOrder),
    DtdEnabled(bool),
    ReloadTilesetsOnChange(bool),
    RemoveObjectsOutsideMap(bool),
    AutomappingDrawing(bool),
    OpenLastFilesOnStartup(bool),
    Language(String),
    MapsDirectory(String),
    StampsDirectory(String),
    ObjectTypesFile(String),
    LastPath(FileType, String),
    PluginEnabled(String, bool),
    IsPatron(bool),
    CheckForUpdates(bool),
}

/// Handle returned by [`Preferences::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&PreferenceChange)>;

/// User preferences with change notification
pub struct Preferences {
    settings: Settings,
    /// File the preferences were loaded from and are saved to
    path: Option<PathBuf>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    dirty: bool,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("settings", &self.settings)
            .field("path", &self.path)
            .field("observers", &self.observers.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl Preferences {
    /// Preferences backed by the given settings, not tied to a file
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            path: None,
            observers: Vec::new(),
            next_observer: 0,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether there are changes not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register a change observer
    pub fn subscribe(&mut self, observer: impl FnMut(&PreferenceChange) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: PreferenceChange) {
        self.dirty = true;
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }

    fn set<T: PartialEq + Clone>(
        &mut self,
        field: fn(&mut Settings) -> &mut T,
        value: T,
        change: fn(T) -> PreferenceChange,
    ) {
        let slot = field(&mut self.settings);
        if *slot == value {
            return;
        }
        *slot = value.clone();
        self.notify(change(value));
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.set(|s| &mut s.show_grid, show, PreferenceChange::ShowGrid);
    }

    pub fn set_show_tile_object_outlines(&mut self, enabled: bool) {
        self.set(
            |s| &mut s.show_tile_object_outlines,
            enabled,
            PreferenceChange::ShowTileObjectOutlines,
        );
    }

    pub fn set_show_tile_animations(&mut self, enabled: bool) {
        self.set(
            |s| &mut s.show_tile_animations,
            enabled,
            PreferenceChange::ShowTileAnimations,
        );
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.set(|s| &mut s.snap_to_grid, snap, PreferenceChange::SnapToGrid);
    }

    pub fn set_snap_to_fine_grid(&mut self, snap: bool) {
        self.set(
            |s| &mut s.snap_to_fine_grid,
            snap,
            PreferenceChange::SnapToFineGrid,
        );
    }

    pub fn set_grid_color(&mut self, color: [u8; 3]) {
        self.set(|s| &mut s.grid_color, color, PreferenceChange::GridColor);
    }

    /// Number of fine grid divisions, at least 1
    pub fn set_grid_fine(&mut self, divisions: u32) {
        self.set(
            |s| &mut s.grid_fine,
            divisions.max(1),
            PreferenceChange::GridFine,
        );
    }

    pub fn set_object_line_width(&mut self, width: f32) {
        self.set(
            |s| &mut s.object_line_width,
            width,
            PreferenceChange::ObjectLineWidth,
        );
    }

    pub fn set_highlight_current_layer(&mut self, highlight: bool) {
        self.set(
            |s| &mut s.highlight_current_layer,
            highlight,
            PreferenceChange::HighlightCurrentLayer,
        );
    }

    pub fn set_show_tileset_grid(&mut self, show: bool) {
        self.set(
            |s| &mut s.show_tileset_grid,
            show,
            PreferenceChange::ShowTilesetGrid,
        );
    }

    pub fn set_object_label_visibility(&mut self, visibility: ObjectLabelVisibility) {
        self.set(
            |s| &mut s.object_label_visibility,
            visibility,
            PreferenceChange::ObjectLabelVisibility,
        );
    }

    pub fn set_layer_data_format(&mut self, format: LayerDataFormat) {
        self.set(
            |s| &mut s.layer_data_format,
            format,
            PreferenceChange::LayerDataFormat,
        );
    }

    pub fn set_map_render_order(&mut self, order: RenderOrder) {
        self.set(
            |s| &mut s.map_render_order,
            order,
            PreferenceChange::MapRenderOrder,
        );
    }

    pub fn set_dtd_enabled(&mut self, enabled: bool) {
        self.set(|s| &mut s.dtd_enabled, enabled, PreferenceChange::DtdEnabled);
    }

    pub fn set_reload_tilesets_on_change(&mut self, reload: bool) {
        self.set(
            |s| &mut s.reload_tilesets_on_change,
            reload,
            PreferenceChange::ReloadTilesetsOnChange,
        );
    }

    pub fn set_automapping_drawing(&mut self, enabled: bool) {
        self.set(
            |s| &mut s.automapping_drawing,
            enabled,
            PreferenceChange::AutomappingDrawing,
        );
    }

    pub fn set_open_last_files_on_startup(&mut self, open: bool) {
        self.set(
            |s| &mut s.open_last_files_on_startup,
            open,
            PreferenceChange::OpenLastFilesOnStartup,
        );
    }

    pub fn remove_objects_outside_map(&self) -> bool {
        self.settings.remove_objects_outside_map
    }

    pub fn set_remove_objects_outside_map(&mut self, remove: bool) {
        self.set(
            |s| &mut s.remove_objects_outside_map,
            remove,
            PreferenceChange::RemoveObjectsOutsideMap,
        );
    }

    pub fn set_language(&mut self, language: &str) {
        self.set(
            |s| &mut s.language,
            language.to_string(),
            PreferenceChange::Language,
        );
    }

    pub fn set_maps_directory(&mut self, path: &str) {
        self.set(
            |s| &mut s.maps_directory,
            path.to_string(),
            PreferenceChange::MapsDirectory,
        );
    }

    pub fn set_stamps_directory(&mut self, path: &str) {
        self.set(
            |s| &mut s.stamps_directory,
            path.to_string(),
            PreferenceChange::StampsDirectory,
        );
    }

    pub fn set_object_types_file(&mut self, path: &str) {
        self.set(
            |s| &mut s.object_types_file,
            path.to_string(),
            PreferenceChange::ObjectTypesFile,
        );
    }

    pub fn set_patron(&mut self, is_patron: bool) {
        self.set(|s| &mut s.is_patron, is_patron, PreferenceChange::IsPatron);
    }

    pub fn set_check_for_updates(&mut self, on: bool) {
        self.set(
            |s| &mut s.check_for_updates,
            on,
            PreferenceChange::CheckForUpdates,
        );
    }

    /// Last directory or file used by a file dialog
    pub fn last_path(&self, file_type: FileType) -> Option<&str> {
        self.settings.last_paths.get(&file_type).map(String::as_str)
    }

    pub fn set_last_path(&mut self, file_type: FileType, path: &str) {
        if self.last_path(file_type) == Some(path) {
            return;
        }
        self.settings
            .last_paths
            .insert(file_type, path.to_string());
        self.notify(PreferenceChange::LastPath(file_type, path.to_string()));
    }

    /// Plugins are enabled unless explicitly disabled
    pub fn is_plugin_enabled(&self, file_name: &str) -> bool {
        self.settings
            .enabled_plugins
            .get(file_name)
            .copied()
            .unwrap_or(true)
    }

    pub fn set_plugin_enabled(&mut self, file_name: &str, enabled: bool) {
        if self.settings.enabled_plugins.get(file_name) == Some(&enabled) {
            return;
        }
        self.settings
            .enabled_plugins
            .insert(file_name.to_string(), enabled);
        self.notify(PreferenceChange::PluginEnabled(
            file_name.to_string(),
            enabled,
        ));
    }
}
