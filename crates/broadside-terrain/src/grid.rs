//! LandMask: packed land/sea grid with point queries.

use serde::{Deserialize, Serialize};

use broadside_core::types::Position;

/// Land mask header metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaskHeader {
    /// West edge in world units.
    pub origin_x: f64,
    /// South edge in world units.
    pub origin_y: f64,
    /// World units per cell side.
    pub cell_size: f64,
    /// Number of columns (west to east).
    pub width: u32,
    /// Number of rows (north to south).
    pub height: u32,
}

impl MaskHeader {
    /// North edge in world units.
    pub fn north_y(&self) -> f64 {
        self.origin_y + self.height as f64 * self.cell_size
    }

    /// East edge in world units.
    pub fn east_x(&self) -> f64 {
        self.origin_x + self.width as f64 * self.cell_size
    }
}

/// Land/sea grid. Everything outside the grid is open sea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandMask {
    pub header: MaskHeader,
    /// Packed mask, row-major (north-to-south, west-to-east).
    /// Bit 1 = land, bit 0 = sea. One bit per cell.
    bits: Vec<u8>,
}

impl LandMask {
    /// Create a mask from pre-packed bits.
    pub fn new(header: MaskHeader, bits: Vec<u8>) -> Self {
        Self { header, bits }
    }

    /// A battle area with no land at all.
    pub fn open_sea() -> Self {
        Self {
            header: MaskHeader {
                origin_x: 0.0,
                origin_y: 0.0,
                cell_size: 1.0,
                width: 0,
                height: 0,
            },
            bits: Vec::new(),
        }
    }

    /// Build a mask from text rows, north row first. `#` marks land,
    /// anything else is sea. Short rows are padded with sea.
    pub fn from_rows(origin_x: f64, origin_y: f64, cell_size: f64, rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let cells = (width * height) as usize;
        let mut bits = vec![0u8; cells.div_ceil(8)];

        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch == '#' {
                    let idx = r * width as usize + c;
                    bits[idx / 8] |= 1 << (idx % 8);
                }
            }
        }

        Self::new(
            MaskHeader {
                origin_x,
                origin_y,
                cell_size,
                width,
                height,
            },
            bits,
        )
    }

    /// Convert a world position to integer grid row/col.
    /// Returns None if outside grid bounds.
    fn world_to_cell(&self, pos: &Position) -> Option<(usize, usize)> {
        let h = &self.header;
        if h.width == 0 || h.height == 0 || h.cell_size <= 0.0 {
            return None;
        }

        let col = (pos.x - h.origin_x) / h.cell_size;
        // Row 0 is the north edge.
        let row = (h.north_y() - pos.y) / h.cell_size;

        if col < 0.0 || row < 0.0 || col >= h.width as f64 || row >= h.height as f64 {
            return None;
        }

        Some((row.floor() as usize, col.floor() as usize))
    }

    /// Whether the position lies over solid terrain.
    pub fn is_land(&self, pos: &Position) -> bool {
        let Some((row, col)) = self.world_to_cell(pos) else {
            return false;
        };
        let idx = row * self.header.width as usize + col;
        self.bits
            .get(idx / 8)
            .is_some_and(|byte| byte & (1 << (idx % 8)) != 0)
    }

    /// Number of land cells in the mask.
    pub fn land_cells(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl Default for LandMask {
    fn default() -> Self {
        Self::open_sea()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4×3 mask with a 2×2 island in the middle, 10 units per cell,
    /// southwest corner at the origin.
    fn make_test_mask() -> LandMask {
        LandMask::from_rows(0.0, 0.0, 10.0, &["....", ".##.", ".##."])
    }

    #[test]
    fn test_island_cells_are_land() {
        let mask = make_test_mask();
        assert_eq!(mask.land_cells(), 4);
        // Row 1 spans y in [10, 20), col 1 spans x in [10, 20)
        assert!(mask.is_land(&Position::new(15.0, 15.0)));
        assert!(mask.is_land(&Position::new(25.0, 5.0)));
    }

    #[test]
    fn test_sea_and_outside_are_not_land() {
        let mask = make_test_mask();
        // North row is all sea
        assert!(!mask.is_land(&Position::new(15.0, 25.0)));
        // West column is sea
        assert!(!mask.is_land(&Position::new(5.0, 15.0)));
        // Outside the grid entirely
        assert!(!mask.is_land(&Position::new(-100.0, 15.0)));
        assert!(!mask.is_land(&Position::new(15.0, 500.0)));
    }

    #[test]
    fn test_open_sea_has_no_land() {
        let mask = LandMask::open_sea();
        assert_eq!(mask.land_cells(), 0);
        assert!(!mask.is_land(&Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_header_edges() {
        let mask = make_test_mask();
        assert!((mask.header.north_y() - 30.0).abs() < 1e-10);
        assert!((mask.header.east_x() - 40.0).abs() < 1e-10);
    }
}
