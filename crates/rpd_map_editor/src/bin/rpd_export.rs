//! rpd_export - export a map project as a Remixed Pixel Dungeon level

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rpd_map_editor::export::{export, load_project, ExportCommandError, ExportTarget};
use rpd_map_editor::preferences::Preferences;
use rpd_map_export::{ExportConfig, FormatRegistry, RpdPlugin};
use tracing::{error, warn};

const PLUGIN_NAME: &str = "rpd";

/// Export a map project as a Remixed Pixel Dungeon level or tileset
#[derive(Parser, Debug)]
#[command(name = "rpd_export")]
#[command(about = "Export a map project to Remixed Pixel Dungeon JSON")]
struct Args {
    /// Map project (JSON)
    project: PathBuf,

    /// Destination file
    output: PathBuf,

    /// Export configuration (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Export the named tileset instead of the level
    #[arg(long, short)]
    tileset: Option<String>,

    /// Preferences file to use instead of the per-user one
    #[arg(long)]
    preferences: Option<PathBuf>,
}

fn run(args: &Args, prefs: &mut Preferences) -> Result<(), ExportCommandError> {
    let config = match &args.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };

    let mut registry = FormatRegistry::default();
    if prefs.is_plugin_enabled(PLUGIN_NAME) {
        RpdPlugin::initialize(&mut registry, config)?;
    } else {
        warn!("Plugin '{}' is disabled in the preferences", PLUGIN_NAME);
    }

    let project = load_project(&args.project)?;
    let target = match &args.tileset {
        Some(name) => ExportTarget::Tileset(name.clone()),
        None => ExportTarget::Level,
    };
    export(&mut registry, &project, &target, &args.output, prefs)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut prefs = match &args.preferences {
        Some(path) => Preferences::load_from(path).unwrap_or_else(|e| {
            warn!("Could not load preferences: {}. Using defaults.", e);
            Preferences::default()
        }),
        None => Preferences::load(),
    };

    let result = run(&args, &mut prefs);

    if prefs.path().is_some() {
        if let Err(e) = prefs.save() {
            warn!("Could not save preferences: {}", e);
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
