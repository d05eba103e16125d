//! Export command
//!
//! Picks a registered format for the destination, writes the project (or
//! one of its tilesets) and remembers the destination as the last exported
//! file.

use std::path::{Path, PathBuf};

use rpd_map_core::MapProject;
use rpd_map_export::{ExportError, FormatRegistry};
use thiserror::Error;
use tracing::{debug, info};

use crate::preferences::{FileType, Preferences};

#[derive(Debug, Error)]
pub enum ExportCommandError {
    #[error("Failed to read project {path:?}: {source}")]
    ReadProject {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project {path:?}: {source}")]
    ParseProject {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("No export format handles {0:?}")]
    NoFormat(PathBuf),

    #[error("Project has no tileset named '{0}'")]
    NoSuchTileset(String),

    #[error("{0}")]
    Export(#[from] ExportError),
}

/// What to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// The project's level
    Level,
    /// A tileset by name
    Tileset(String),
}

/// Load and validate a project saved as JSON
pub fn load_project(path: &Path) -> Result<MapProject, ExportCommandError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ExportCommandError::ReadProject {
            path: path.to_path_buf(),
            source,
        })?;
    let project: MapProject =
        serde_json::from_str(&content).map_err(|source| ExportCommandError::ParseProject {
            path: path.to_path_buf(),
            source,
        })?;
    project.validate().map_err(ExportCommandError::InvalidProject)?;
    debug!(
        "Loaded project '{}' with {} tilesets",
        project.level.name,
        project.tilesets.len()
    );
    Ok(project)
}

/// Export `target` to `path` with the format matching its extension.
///
/// On success the destination becomes the last exported file in `prefs`.
pub fn export(
    registry: &mut FormatRegistry,
    project: &MapProject,
    target: &ExportTarget,
    path: &Path,
    prefs: &mut Preferences,
) -> Result<(), ExportCommandError> {
    match target {
        ExportTarget::Level => {
            let format = registry
                .map_format_for_file(path)
                .ok_or_else(|| ExportCommandError::NoFormat(path.to_path_buf()))?;
            format.write(project, path)?;
        }
        ExportTarget::Tileset(name) => {
            let tileset = project
                .tileset_by_name(name)
                .ok_or_else(|| ExportCommandError::NoSuchTileset(name.clone()))?;
            let format = registry
                .tileset_format_for_file(path)
                .ok_or_else(|| ExportCommandError::NoFormat(path.to_path_buf()))?;
            format.write(tileset, path)?;
        }
    }

    prefs.set_last_path(FileType::ExportedFile, &path.to_string_lossy());
    info!("Export of {:?} finished", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpd_map_core::{Cell, Level, Tileset};
    use rpd_map_export::{ExportConfig, LevelDocument, RpdPlugin, TilesetDocument};
    use std::fs;

    fn registry() -> FormatRegistry {
        let mut registry = FormatRegistry::default();
        RpdPlugin::initialize(&mut registry, ExportConfig::default()).unwrap();
        registry
    }

    fn project() -> MapProject {
        let tileset = Tileset::new(
            "tiles_sewers".to_string(),
            "tiles_sewers.png".to_string(),
            16,
            8,
            8,
        );
        let mut level = Level::new("Sewers".to_string(), 3, 2);
        level.add_tile_layer("logic");
        level
            .layer_by_name_mut("logic")
            .unwrap()
            .set_cell(1, 1, Some(Cell::new(tileset.id, 7)));
        MapProject::new(level, vec![tileset])
    }

    #[test]
    fn export_level_records_last_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sewers.json");
        let mut prefs = Preferences::default();

        export(
            &mut registry(),
            &project(),
            &ExportTarget::Level,
            &path,
            &mut prefs,
        )
        .unwrap();

        let doc: LevelDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.entrance, Some(vec![1, 1]));
        assert_eq!(doc.tiles, "tiles0_x.png");
        assert_eq!(
            prefs.last_path(FileType::ExportedFile),
            Some(&*path.to_string_lossy())
        );
    }

    #[test]
    fn export_tileset_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiles_sewers.json");
        let mut prefs = Preferences::default();
        let target = ExportTarget::Tileset("tiles_sewers".to_string());

        export(&mut registry(), &project(), &target, &path, &mut prefs).unwrap();

        let doc: TilesetDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.name, "tiles_sewers");
        assert_eq!(doc.tilecount, 64);
    }

    #[test]
    fn unknown_extension_has_no_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sewers.tmx");
        let mut prefs = Preferences::default();

        let err = export(
            &mut registry(),
            &project(),
            &ExportTarget::Level,
            &path,
            &mut prefs,
        )
        .unwrap_err();
        assert!(matches!(err, ExportCommandError::NoFormat(_)));
        assert_eq!(prefs.last_path(FileType::ExportedFile), None);
    }

    #[test]
    fn missing_tileset_name() {
        let tmp = tempfile::tempdir().unwrap();
        let target = ExportTarget::Tileset("tiles_caves".to_string());

        let err = export(
            &mut registry(),
            &project(),
            &target,
            &tmp.path().join("t.json"),
            &mut Preferences::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportCommandError::NoSuchTileset(name) if name == "tiles_caves"));
    }

    #[test]
    fn failed_export_keeps_format_message() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing/sewers.json");
        let mut prefs = Preferences::default();

        let err = export(
            &mut registry(),
            &project(),
            &ExportTarget::Level,
            &path,
            &mut prefs,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Could not open file for writing.");
        assert!(!prefs.is_dirty());
    }

    #[test]
    fn load_project_from_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("project.json");
        fs::write(&path, serde_json::to_string(&project()).unwrap()).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.level.name, "Sewers");
        assert_eq!(loaded.tilesets.len(), 1);

        fs::write(&path, "{").unwrap();
        assert!(matches!(
            load_project(&path),
            Err(ExportCommandError::ParseProject { .. })
        ));
    }

    #[test]
    fn load_project_rejects_dangling_tileset() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("project.json");
        let mut project = project();
        project.tilesets.clear();
        fs::write(&path, serde_json::to_string(&project).unwrap()).unwrap();

        assert!(matches!(
            load_project(&path),
            Err(ExportCommandError::InvalidProject(_))
        ));
    }
}
