//! Chunk coordinates and the mapping between world space and the chunk grid.
//!
//! Chunks are squares of `chunk_size` unit cells on an unbounded grid. Coordinates are
//! integers so map keys compare exactly; a world position maps to
//! `floor(position / chunk_size)` per axis.
use glam::{IVec2, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer coordinate of a chunk on the grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk index along the X axis.
    pub x: i32,
    /// Chunk index along the Y axis.
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another coordinate.
    pub fn chebyshev(self, other: ChunkCoord) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(value: ChunkCoord) -> Self {
        IVec2::new(value.x, value.y)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Converts world positions to chunk coordinates and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkMapper {
    chunk_size: u32,
}

impl ChunkMapper {
    /// Creates a mapper for chunks of `chunk_size` cells per side.
    pub fn new(chunk_size: u32) -> Self {
        debug_assert!(chunk_size > 0, "chunk_size must be > 0");
        Self { chunk_size }
    }

    /// Cells per side.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Chunk containing `position`.
    pub fn coord_for(&self, position: Vec2) -> ChunkCoord {
        let size = self.chunk_size as f32;
        ChunkCoord::new(
            (position.x / size).floor() as i32,
            (position.y / size).floor() as i32,
        )
    }

    /// World position of the chunk's lower-left corner.
    pub fn world_origin_of(&self, coord: ChunkCoord) -> Vec2 {
        Vec2::new(coord.x as f32, coord.y as f32) * self.chunk_size as f32
    }

    /// Coordinates within Chebyshev distance `radius` of `center`, in row-major order.
    pub fn window(&self, center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
        chunk_window(center, radius)
    }
}

/// Coordinates within Chebyshev distance `radius` of `center`, in row-major order.
pub fn chunk_window(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let r = radius.min(i32::MAX as u32) as i32;
    let side = 2 * radius as usize + 1;
    let mut out = Vec::with_capacity(side * side);
    for dy in -r..=r {
        for dx in -r..=r {
            out.push(ChunkCoord::new(
                center.x.saturating_add(dx),
                center.y.saturating_add(dy),
            ));
        }
    }
    out
}

/// Creates a deterministic seed for a chunk from a base seed.
pub fn seed_for_chunk(base_seed: u64, chunk: ChunkCoord) -> u64 {
    let cx = chunk.x as i64 as u64;
    let cy = chunk.y as i64 as u64;
    let mixed =
        base_seed ^ cx.wrapping_mul(0x9E3779B97F4A7C15) ^ cy.wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
