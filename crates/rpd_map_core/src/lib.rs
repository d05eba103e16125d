//! Core data structures for rpd_map
//!
//! This crate provides the fundamental types for representing tile-based maps:
//! - `Level` - A complete map with layers and entities
//! - `Layer` - A single layer (tiles or objects)
//! - `Cell` - A tile reference into a tileset
//! - `Tileset` - Tile atlas configuration with multi-image support
//! - `EntityInstance` - Placed objects with properties
//! - `Value` - Generic property value type
//! - `MapProject` - Self-contained format bundling a level and its tilesets

mod entity;
mod layer;
mod level;
mod project;
mod tileset;
mod value;

pub use entity::EntityInstance;
pub use layer::{Cell, Layer, LayerData, LayerType, EMPTY_TILE_ID};
pub use level::Level;
pub use project::MapProject;
pub use tileset::{TileProperties, Tileset, TilesetImage};
pub use value::Value;
