//! Export configuration and the sentinel tile table
//!
//! Every field has a default matching the game's built-in conventions, so an
//! empty TOML document is a valid configuration:
//!
//! ```toml
//! default_tiles = "tiles0_x.png"
//! water = "water0.png"
//! entrance_policy = "all"
//!
//! [layers]
//! logic = "logic"
//! base = "base"
//! deco = "deco"
//!
//! [markers]
//! entrance = 7
//! exit = 8
//! locked_exit = 25
//! unlocked_exit = 26
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ExportError;

/// Names of the layers the exporter understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerNames {
    pub logic: String,
    pub base: String,
    pub deco: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            logic: "logic".to_string(),
            base: "base".to_string(),
            deco: "deco".to_string(),
        }
    }
}

/// Tile ids that carry meaning in the logic layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerIds {
    pub entrance: u32,
    pub exit: u32,
    pub locked_exit: u32,
    pub unlocked_exit: u32,
}

impl Default for MarkerIds {
    fn default() -> Self {
        Self {
            entrance: 7,
            exit: 8,
            locked_exit: 25,
            unlocked_exit: 26,
        }
    }
}

impl MarkerIds {
    /// Every id paired with the role it marks
    pub fn entries(&self) -> [(u32, TileRole); 4] {
        [
            (self.entrance, TileRole::Entrance),
            (self.exit, TileRole::Exit),
            (self.locked_exit, TileRole::LockedExit),
            (self.unlocked_exit, TileRole::UnlockedExit),
        ]
    }
}

/// What to emit when the logic layer holds more than one entrance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrancePolicy {
    /// Every entrance, flattened as `[x, y, x, y, ...]`
    #[default]
    All,
    /// Only the first entrance in scan order
    First,
    /// Only the last entrance in scan order
    Last,
}

/// Settings for the level exporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub layers: LayerNames,
    pub markers: MarkerIds,
    /// `tiles` value used when no deco layer names a tileset
    pub default_tiles: String,
    /// Value of the `water` field
    pub water: String,
    /// Appended to the deco tileset name to form the `tiles` value
    pub tiles_extension: String,
    pub entrance_policy: EntrancePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layers: LayerNames::default(),
            markers: MarkerIds::default(),
            default_tiles: "tiles0_x.png".to_string(),
            water: "water0.png".to_string(),
            tiles_extension: ".png".to_string(),
            entrance_policy: EntrancePolicy::All,
        }
    }
}

impl ExportConfig {
    /// Parse and validate a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check that layer names and marker ids are unambiguous
    pub fn validate(&self) -> Result<(), ExportError> {
        let names = [
            ("logic", &self.layers.logic),
            ("base", &self.layers.base),
            ("deco", &self.layers.deco),
        ];
        for (i, (role, name)) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ExportError::Config(format!(
                    "Layer name for '{}' must not be empty",
                    role
                )));
            }
            if let Some((other, _)) = names[..i].iter().find(|(_, n)| n == name) {
                return Err(ExportError::Config(format!(
                    "Layers '{}' and '{}' share the name '{}'",
                    other, role, name
                )));
            }
        }

        MarkerTable::new(&self.markers).map(|_| ())
    }

    /// Build the sentinel table for this configuration
    pub fn marker_table(&self) -> Result<MarkerTable, ExportError> {
        MarkerTable::new(&self.markers)
    }
}

/// Semantic role of a sentinel tile id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileRole {
    Entrance,
    Exit,
    LockedExit,
    UnlockedExit,
}

impl TileRole {
    /// Whether this role belongs to the exit family
    pub fn is_exit(self) -> bool {
        matches!(
            self,
            TileRole::Exit | TileRole::LockedExit | TileRole::UnlockedExit
        )
    }
}

/// Lookup from tile id to [`TileRole`]
#[derive(Debug, Clone)]
pub struct MarkerTable {
    roles: HashMap<i64, TileRole>,
}

impl MarkerTable {
    /// Build a table, rejecting ids assigned to more than one role
    pub fn new(ids: &MarkerIds) -> Result<Self, ExportError> {
        let mut roles = HashMap::new();
        for (id, role) in ids.entries() {
            if let Some(existing) = roles.insert(i64::from(id), role) {
                return Err(ExportError::Config(format!(
                    "Tile id {} is used for both {:?} and {:?}",
                    id, existing, role
                )));
            }
        }
        Ok(Self { roles })
    }

    /// Role of a tile id, if it is a sentinel
    pub fn role_of(&self, tile_id: i64) -> Option<TileRole> {
        self.roles.get(&tile_id).copied()
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        let roles = MarkerIds::default()
            .entries()
            .into_iter()
            .map(|(id, role)| (i64::from(id), role))
            .collect();
        Self { roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ExportConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.default_tiles, "tiles0_x.png");
        assert_eq!(config.water, "water0.png");
        assert_eq!(config.entrance_policy, EntrancePolicy::All);
    }

    #[test]
    fn parse_partial_config() {
        let config = ExportConfig::from_toml_str(
            r#"
water = "water3.png"
entrance_policy = "last"

[layers]
deco = "decoration"

[markers]
exit = 9
"#,
        )
        .unwrap();

        assert_eq!(config.water, "water3.png");
        assert_eq!(config.entrance_policy, EntrancePolicy::Last);
        assert_eq!(config.layers.deco, "decoration");
        assert_eq!(config.layers.logic, "logic");
        assert_eq!(config.markers.exit, 9);
        assert_eq!(config.markers.entrance, 7);
    }

    #[test]
    fn duplicate_marker_ids_are_rejected() {
        let err = ExportConfig::from_toml_str(
            r#"
[markers]
exit = 7
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
        assert!(err.to_string().contains("Tile id 7"));
    }

    #[test]
    fn duplicate_layer_names_are_rejected() {
        let err = ExportConfig::from_toml_str(
            r#"
[layers]
base = "logic"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("share the name 'logic'"));
    }

    #[test]
    fn empty_layer_name_is_rejected() {
        let mut config = ExportConfig::default();
        config.layers.deco.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ExportConfig::from_toml_str("water = [").unwrap_err();
        assert!(matches!(err, ExportError::ConfigParse(_)));
    }

    #[test]
    fn default_table_roles() {
        let table = MarkerTable::default();
        assert_eq!(table.role_of(7), Some(TileRole::Entrance));
        assert_eq!(table.role_of(8), Some(TileRole::Exit));
        assert_eq!(table.role_of(25), Some(TileRole::LockedExit));
        assert_eq!(table.role_of(26), Some(TileRole::UnlockedExit));
        assert_eq!(table.role_of(-1), None);
        assert_eq!(table.role_of(1), None);

        assert!(!TileRole::Entrance.is_exit());
        assert!(TileRole::LockedExit.is_exit());
    }

    #[test]
    fn default_table_matches_default_ids() {
        let table = MarkerTable::default();
        let built = MarkerTable::new(&MarkerIds::default()).unwrap();
        for (id, role) in MarkerIds::default().entries() {
            assert_eq!(table.role_of(i64::from(id)), Some(role));
            assert_eq!(built.role_of(i64::from(id)), Some(role));
        }
    }

    #[test]
    fn custom_table_matches_config() {
        let mut config = ExportConfig::default();
        config.markers.entrance = 100;
        let table = config.marker_table().unwrap();
        assert_eq!(table.role_of(100), Some(TileRole::Entrance));
        assert_eq!(table.role_of(7), None);
    }
}
