//! Jittered cell grid used to propose one candidate position per chunk cell.
use glam::{UVec2, Vec2};
use rand::RngCore;

use crate::sampling::{next_down, rand_range};

/// Largest jitter, in cell units, that keeps a candidate inside its cell.
pub const MAX_JITTER: f32 = 0.5;

/// Square grid of unit cells in chunk-local space.
#[derive(Debug, Clone)]
pub struct JitterGrid {
    /// Cells per side.
    pub cells_per_side: u32,
    /// Maximum offset from the cell center per axis, in [0, 0.5].
    pub jitter: f32,
}

impl JitterGrid {
    /// Create a new grid; jitter is clamped to [0, 0.5].
    pub fn new(cells_per_side: u32, jitter: f32) -> Self {
        let jitter = if jitter.is_finite() {
            jitter.clamp(0.0, MAX_JITTER)
        } else {
            0.0
        };
        Self {
            cells_per_side,
            jitter,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.cells_per_side as usize) * (self.cells_per_side as usize)
    }

    /// Cells in row-major order (y outer, x inner).
    pub fn cells(&self) -> impl Iterator<Item = UVec2> {
        let n = self.cells_per_side;
        (0..n).flat_map(move |y| (0..n).map(move |x| UVec2::new(x, y)))
    }

    /// Local center of a cell.
    #[inline]
    pub fn cell_center(&self, cell: UVec2) -> Vec2 {
        cell.as_vec2() + Vec2::splat(0.5)
    }

    /// Local candidate position for a cell, offset from its center by the grid jitter.
    ///
    /// Draws two variates when jitter is positive and none otherwise. The result
    /// always lies in `[cell, cell + 1)` on both axes.
    pub fn sample(&self, cell: UVec2, rng: &mut dyn RngCore) -> Vec2 {
        let center = self.cell_center(cell);
        if self.jitter <= 0.0 {
            return center;
        }

        let jx = rand_range(rng, -self.jitter, self.jitter);
        let jy = rand_range(rng, -self.jitter, self.jitter);

        let min = cell.as_vec2();
        let px = (center.x + jx).clamp(min.x, next_down(min.x + 1.0));
        let py = (center.y + jy).clamp(min.y, next_down(min.y + 1.0));
        Vec2::new(px, py)
    }
}
