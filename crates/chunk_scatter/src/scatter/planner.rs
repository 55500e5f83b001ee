//! Per-chunk decoration planning.
//!
//! [`DecorationPlanner`] walks a chunk's cells in row-major order and, for each cell,
//! optionally rolls the density gate, draws a category, proposes a jittered position
//! and keeps it only when [`OccupancyIndex`] finds no spacing conflict. Rejected cells
//! are forfeited; there is no retry at another offset.
//!
//! Planning produces [`DecorationRecord`]s only. Turning them into instances is the
//! streamer's job, which lets a reload re-materialize records without drawing again.
use glam::{UVec2, Vec2, Vec3};
use rand::RngCore;
use tracing::debug;

use crate::error::Result;
use crate::sampling::{rand01, rand_range, JitterGrid};
use crate::scatter::chunk::{ChunkCoord, ChunkMapper};
use crate::scatter::config::StreamConfig;
use crate::scatter::events::{EventSink, StreamEvent, StreamEventKind};
use crate::scatter::occupancy::OccupancyIndex;
use crate::scatter::selection::CategorySelector;
use crate::scatter::{CategoryId, DecorationRecord};

/// What happened to a single candidate cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    /// The density roll skipped the cell.
    Skipped,
    /// The draw landed in residual "no decoration" mass.
    Empty,
    /// A category was drawn but its position conflicts with a placed record.
    Rejected { category: CategoryId, position: Vec2 },
    /// The candidate was accepted.
    Placed(DecorationRecord),
}

/// Records and counters for one planned chunk.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct ChunkPlan {
    /// Accepted records in placement order.
    pub records: Vec<DecorationRecord>,
    /// Cells visited before the plan finished.
    pub cells_evaluated: usize,
    /// Cells skipped by density or left empty by the draw.
    pub cells_empty: usize,
    /// Cells whose candidate was rejected for spacing.
    pub cells_rejected: usize,
}

/// Draw-order hint for a decoration: lower on screen draws in front, and at equal
/// height a larger `sort_offset` draws in front.
#[inline]
pub fn depth_hint(y: f32, depth_multiplier: f32, sort_offset: i32) -> i32 {
    ((-y * depth_multiplier).round() as i32).saturating_add(sort_offset)
}

/// Plans decorations for chunks under a validated [`StreamConfig`].
#[derive(Debug, Clone)]
pub struct DecorationPlanner {
    config: StreamConfig,
    selector: CategorySelector,
    mapper: ChunkMapper,
    grid: JitterGrid,
}

impl DecorationPlanner {
    /// Validates the configuration and precomputes the category selector.
    pub fn try_new(config: StreamConfig) -> Result<Self> {
        config.validate()?;
        let selector = CategorySelector::try_new(&config.categories, config.weight_shape)?;
        let mapper = ChunkMapper::new(config.chunk_size);
        let grid = JitterGrid::new(config.chunk_size, config.jitter);
        Ok(Self {
            config,
            selector,
            mapper,
            grid,
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn mapper(&self) -> &ChunkMapper {
        &self.mapper
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    /// Cell grid used for candidates.
    pub fn grid(&self) -> &JitterGrid {
        &self.grid
    }

    /// Depth hint for a record, using its category's sort offset.
    pub fn depth_hint_for(&self, record: &DecorationRecord) -> i32 {
        let offset = self
            .config
            .category(&record.category)
            .map(|c| c.sort_offset)
            .unwrap_or_default();
        depth_hint(record.position.y, self.config.depth_multiplier, offset)
    }

    /// Evaluates one cell of the chunk whose lower-left corner is `origin`.
    pub fn plan_cell(
        &self,
        origin: Vec2,
        cell: UVec2,
        placed: &[DecorationRecord],
        rng: &mut dyn RngCore,
    ) -> CellOutcome {
        if self.config.density < 1.0 && rand01(rng) >= self.config.density {
            return CellOutcome::Skipped;
        }

        let Some(index) = self.selector.pick(rng) else {
            return CellOutcome::Empty;
        };
        let category = &self.config.categories[index];
        let position = origin + self.grid.sample(cell, rng);

        let occupancy = OccupancyIndex::new(placed, &self.config.spacing);
        if occupancy.is_too_close(position, category.class) {
            return CellOutcome::Rejected {
                category: category.id.clone(),
                position,
            };
        }

        let range = self.config.scale_range_for(category);
        let scale = rand_range(rng, range.min, range.max);
        CellOutcome::Placed(DecorationRecord {
            position: Vec3::new(position.x, position.y, self.config.decoration_lift),
            category: category.id.clone(),
            class: category.class,
            scale,
        })
    }

    /// Plans every cell of `coord` in row-major order.
    pub fn plan_chunk(
        &self,
        coord: ChunkCoord,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> ChunkPlan {
        let origin = self.mapper.world_origin_of(coord);
        let cap = self.config.max_decorations_per_chunk;
        let mut plan = ChunkPlan {
            records: Vec::new(),
            cells_evaluated: 0,
            cells_empty: 0,
            cells_rejected: 0,
        };

        for cell in self.grid.cells() {
            if cap.is_some_and(|max| plan.records.len() >= max) {
                break;
            }
            plan.cells_evaluated += 1;

            match self.plan_cell(origin, cell, &plan.records, rng) {
                CellOutcome::Skipped | CellOutcome::Empty => plan.cells_empty += 1,
                CellOutcome::Rejected { category, position } => {
                    plan.cells_rejected += 1;
                    if sink.wants(StreamEventKind::PlacementRejected) {
                        sink.send(StreamEvent::PlacementRejected {
                            coord,
                            category,
                            position,
                        });
                    }
                }
                CellOutcome::Placed(record) => {
                    if sink.wants(StreamEventKind::PlacementMade) {
                        sink.send(StreamEvent::PlacementMade {
                            coord,
                            record: record.clone(),
                        });
                    }
                    plan.records.push(record);
                }
            }
        }

        debug!(
            "Planned chunk {}: {} placed, {} rejected, {} empty of {} cells.",
            coord,
            plan.records.len(),
            plan.cells_rejected,
            plan.cells_empty,
            plan.cells_evaluated
        );
        plan
    }
}
