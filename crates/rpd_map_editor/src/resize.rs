//! "Resize Map" dialog state
//!
//! The dialog edits a new size and an offset for the existing content. The
//! offset is kept inside the range that keeps the old and new map
//! overlapping: `x ∈ [min(0, dw), max(0, dw)]` where `dw = new_w - old_w`,
//! and the same for `y`.

use rpd_map_core::Level;
use tracing::info;

use crate::preferences::Preferences;

/// Inclusive range an offset component may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl OffsetBounds {
    /// Bounds for resizing `old` to `new`
    pub fn between(old: (u32, u32), new: (u32, u32)) -> Self {
        let dw = new.0 as i32 - old.0 as i32;
        let dh = new.1 as i32 - old.1 as i32;
        Self {
            min_x: dw.min(0),
            max_x: dw.max(0),
            min_y: dh.min(0),
            max_y: dh.max(0),
        }
    }

    pub fn clamp(&self, offset: (i32, i32)) -> (i32, i32) {
        (
            offset.0.clamp(self.min_x, self.max_x),
            offset.1.clamp(self.min_y, self.max_y),
        )
    }
}

/// State for the resize dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDialog {
    /// Whether the dialog is open
    pub open: bool,
    old_size: (u32, u32),
    new_size: (u32, u32),
    offset: (i32, i32),
    /// Remove objects that end up outside the resized map
    pub remove_objects_outside_map: bool,
}

impl ResizeDialog {
    /// Open the dialog, taking the remove-objects flag from the preferences
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            open: true,
            old_size: (0, 0),
            new_size: (0, 0),
            offset: (0, 0),
            remove_objects_outside_map: prefs.remove_objects_outside_map(),
        }
    }

    /// Set the current map size. Also resets the new size and the offset.
    pub fn set_old_size(&mut self, width: u32, height: u32) {
        self.old_size = (width, height);
        self.new_size = (width, height);
        self.offset = (0, 0);
    }

    /// Change the new size, clamping the offset into the new bounds
    pub fn set_new_size(&mut self, width: u32, height: u32) {
        self.new_size = (width.max(1), height.max(1));
        self.offset = self.bounds().clamp(self.offset);
    }

    /// Change the offset, clamped into the current bounds
    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.offset = self.bounds().clamp((x, y));
    }

    pub fn old_size(&self) -> (u32, u32) {
        self.old_size
    }

    pub fn new_size(&self) -> (u32, u32) {
        self.new_size
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn bounds(&self) -> OffsetBounds {
        OffsetBounds::between(self.old_size, self.new_size)
    }

    /// Close the dialog, storing the remove-objects flag in the preferences
    pub fn accept(&mut self, prefs: &mut Preferences) -> ResizeRequest {
        self.open = false;
        prefs.set_remove_objects_outside_map(self.remove_objects_outside_map);
        ResizeRequest {
            width: self.new_size.0,
            height: self.new_size.1,
            offset: self.offset,
            remove_objects_outside_map: self.remove_objects_outside_map,
        }
    }

    /// Close the dialog without touching anything
    pub fn cancel(&mut self) {
        self.open = false;
    }
}

/// A resize confirmed in the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
    pub offset: (i32, i32),
    pub remove_objects_outside_map: bool,
}

impl ResizeRequest {
    /// Resize `level`. Returns the number of removed objects.
    pub fn apply(&self, level: &mut Level, tile_size: u32) -> usize {
        let removed = level.resize(
            self.width,
            self.height,
            self.offset,
            tile_size,
            self.remove_objects_outside_map,
        );
        info!(
            "Resized '{}' to {}x{} (offset {:?}), removed {} objects",
            level.name, self.width, self.height, self.offset, removed
        );
        removed
    }
}
