#![forbid(unsafe_code)]
//! chunk_scatter: Chunk streaming around a moving viewer with weighted, spacing-aware
//! decoration placement.
//!
//! Modules:
//! - sampling: random variates and the jittered cell grid
//! - scatter: chunk coordinates, category selection, spacing, planning, streaming, events
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod sampling;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use chunk_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::sampling::{rand01, rand_range, JitterGrid};
    pub use crate::scatter::chunk::{chunk_window, seed_for_chunk, ChunkCoord, ChunkMapper};
    pub use crate::scatter::config::{ScaleRange, StreamConfig, WeightShape};
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, StreamEvent, StreamEventKind, VecSink,
    };
    pub use crate::scatter::factory::{
        ContentKind, InstanceFactory, InstanceHandle, InstanceTransform, MemoryFactory,
        MemoryInstance,
    };
    pub use crate::scatter::occupancy::{OccupancyIndex, SpacingRules};
    pub use crate::scatter::planner::{depth_hint, CellOutcome, ChunkPlan, DecorationPlanner};
    pub use crate::scatter::selection::CategorySelector;
    pub use crate::scatter::stream::{Chunk, ChunkStreamer, TickReport};
    pub use crate::scatter::viewer::{FnViewer, ViewerSource};
    pub use crate::scatter::{Category, CategoryId, DecorationRecord, SpacingClass};
}
