//! Flattening of tile grids into linear tile id sequences

use rpd_map_core::Layer;

/// Traversal order over a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridOrder {
    /// Rows top to bottom, each row left to right
    #[default]
    RowMajor,
    /// Columns left to right, each column top to bottom
    ColumnMajor,
}

impl GridOrder {
    /// All `(x, y)` positions of a `width` x `height` grid in this order
    pub fn positions(self, width: u32, height: u32) -> GridPositions {
        GridPositions {
            order: self,
            width,
            height,
            next: 0,
            len: u64::from(width) * u64::from(height),
        }
    }
}

/// Iterator returned by [`GridOrder::positions`]
#[derive(Debug, Clone)]
pub struct GridPositions {
    order: GridOrder,
    width: u32,
    height: u32,
    next: u64,
    len: u64,
}

impl Iterator for GridPositions {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let i = self.next;
        self.next += 1;
        // Both quotient and remainder are below a u32 dimension
        let (x, y) = match self.order {
            GridOrder::RowMajor => (i % u64::from(self.width), i / u64::from(self.width)),
            GridOrder::ColumnMajor => (i / u64::from(self.height), i % u64::from(self.height)),
        };
        Some((x as u32, y as u32))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n as u64).min(self.len);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.next).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

/// Flatten a layer's cells into tile ids, `-1` for empty cells
pub fn pack_cells(layer: &Layer, order: GridOrder) -> Vec<i64> {
    order
        .positions(layer.width, layer.height)
        .map(|(x, y)| layer.tile_id_at(x, y))
        .collect()
}
