//! Editor-side pieces of rpd_map
//!
//! - [`preferences`] - user preferences with change notification and persistence
//! - [`resize`] - state behind the "Resize Map" dialog
//! - [`export`] - export command tying the format registry to the preferences

pub mod export;
pub mod preferences;
pub mod resize;
