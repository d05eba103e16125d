//! Extraction of entrance and exit positions from the logic layer

use rpd_map_core::Layer;
use tracing::warn;

use crate::config::{EntrancePolicy, MarkerTable, TileRole};
use crate::pack::GridOrder;

/// Marker positions found in a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// Entrance coordinates flattened as `[x, y, x, y, ...]`
    pub entrance: Vec<u32>,
    /// One `[x, y]` pair per exit-family cell
    pub multiexit: Vec<[u32; 2]>,
}

/// Scan a layer column by column for sentinel tiles
pub fn extract_markers(layer: &Layer, table: &MarkerTable, policy: EntrancePolicy) -> Markers {
    let mut entrances = Vec::new();
    let mut multiexit = Vec::new();

    for (x, y) in GridOrder::ColumnMajor.positions(layer.width, layer.height) {
        match table.role_of(layer.tile_id_at(x, y)) {
            Some(TileRole::Entrance) => entrances.push([x, y]),
            Some(role) if role.is_exit() => multiexit.push([x, y]),
            _ => {}
        }
    }

    if entrances.len() > 1 {
        warn!(
            "Layer '{}' has {} entrances, expected one (policy: {:?})",
            layer.name,
            entrances.len(),
            policy
        );
    }

    let entrance = match policy {
        EntrancePolicy::All => entrances.into_iter().flatten().collect(),
        EntrancePolicy::First => entrances.first().map(|p| p.to_vec()).unwrap_or_default(),
        EntrancePolicy::Last => entrances.last().map(|p| p.to_vec()).unwrap_or_default(),
    };

    Markers {
        entrance,
        multiexit,
    }
}
