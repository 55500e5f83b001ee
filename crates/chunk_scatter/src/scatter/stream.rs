//! Tick-driven chunk lifecycle around a viewer.
//!
//! Each tick the [`ChunkStreamer`] maps the viewer to a chunk, loads every chunk of the
//! visible window that is not loaded yet, then unloads loaded chunks outside of it.
//!
//! Unloading releases instances but keeps the chunk's [`DecorationRecord`]s in a
//! dormant store; a later reload re-materializes them instead of planning again.
//! First-time plans are seeded per chunk from the configured seed, so the layout of
//! a chunk does not depend on the order in which chunks were visited.
use std::collections::{HashMap, HashSet};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::scatter::chunk::{chunk_window, seed_for_chunk, ChunkCoord, ChunkMapper};
use crate::scatter::config::StreamConfig;
use crate::scatter::events::{EventSink, StreamEvent, StreamEventKind};
use crate::scatter::factory::{ContentKind, InstanceFactory, InstanceHandle, InstanceTransform};
use crate::scatter::planner::DecorationPlanner;
use crate::scatter::viewer::ViewerSource;
use crate::scatter::DecorationRecord;

/// A chunk and the instances it owns.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Vec<InstanceHandle>,
    records: Vec<DecorationRecord>,
    decorations: Vec<InstanceHandle>,
}

impl Chunk {
    fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            tiles: Vec::new(),
            records: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Live tile instances.
    pub fn tiles(&self) -> &[InstanceHandle] {
        &self.tiles
    }

    /// Placement records; present whether or not instances exist.
    pub fn records(&self) -> &[DecorationRecord] {
        &self.records
    }

    /// Live decoration instances.
    pub fn decorations(&self) -> &[InstanceHandle] {
        &self.decorations
    }

    /// Returns every live handle to the factory and frees the handle lists.
    ///
    /// Handles the factory no longer knows are skipped.
    fn release(&mut self, factory: &mut dyn InstanceFactory) -> usize {
        let tiles = std::mem::take(&mut self.tiles);
        let decorations = std::mem::take(&mut self.decorations);
        let mut released = 0;
        for handle in tiles.into_iter().chain(decorations) {
            match factory.destroy(handle) {
                Ok(()) => released += 1,
                Err(e) => debug!("Ignoring release failure in chunk {}: {}.", self.coord, e),
            }
        }
        released
    }
}

/// Summary of one tick.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter, starting at 1.
    pub tick: u64,
    /// Chunk the viewer was in.
    pub viewer_chunk: ChunkCoord,
    /// Chunks loaded this tick, in window order.
    pub loaded: Vec<ChunkCoord>,
    /// Loaded chunks whose decorations came from retained records.
    pub reloaded: Vec<ChunkCoord>,
    /// Chunks unloaded this tick, sorted.
    pub unloaded: Vec<ChunkCoord>,
    /// Decorations accepted by the planner.
    pub placements: usize,
    /// Candidates rejected for spacing.
    pub rejections: usize,
    /// Instances the factory failed to create.
    pub resource_failures: usize,
}

impl TickReport {
    /// Whether the loaded set changed.
    pub fn changed(&self) -> bool {
        !self.loaded.is_empty() || !self.unloaded.is_empty()
    }
}

/// Owns the loaded chunks and drives their lifecycle.
#[derive(Debug)]
pub struct ChunkStreamer {
    planner: DecorationPlanner,
    active: HashMap<ChunkCoord, Chunk>,
    dormant: HashMap<ChunkCoord, Vec<DecorationRecord>>,
    ticks: u64,
}

impl ChunkStreamer {
    /// Validates `config` and creates a streamer with nothing loaded.
    pub fn try_new(config: StreamConfig) -> Result<Self> {
        let planner = DecorationPlanner::try_new(config)?;
        Ok(Self {
            planner,
            active: HashMap::new(),
            dormant: HashMap::new(),
            ticks: 0,
        })
    }

    pub fn config(&self) -> &StreamConfig {
        self.planner.config()
    }

    pub fn planner(&self) -> &DecorationPlanner {
        &self.planner
    }

    pub fn mapper(&self) -> &ChunkMapper {
        self.planner.mapper()
    }

    /// Number of ticks evaluated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Coordinates that should be loaded for a viewer in `center`.
    pub fn visible_window(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        chunk_window(center, self.config().visible_chunks)
    }

    /// Polls the viewer and brings the loaded set in line with its window.
    pub fn tick(
        &mut self,
        viewer: &dyn ViewerSource,
        factory: &mut dyn InstanceFactory,
    ) -> TickReport {
        self.tick_with_events(viewer, factory, &mut ())
    }

    /// Like [`ChunkStreamer::tick`], reporting progress to `sink`.
    pub fn tick_with_events(
        &mut self,
        viewer: &dyn ViewerSource,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        let position: Vec3 = viewer.current_position();
        let center = self.mapper().coord_for(position.truncate());
        self.update_window(center, factory, sink)
    }

    /// Loads the window around `center` and unloads everything outside it.
    pub fn update_window(
        &mut self,
        center: ChunkCoord,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            viewer_chunk: center,
            ..Default::default()
        };
        if sink.wants(StreamEventKind::TickStarted) {
            sink.send(StreamEvent::TickStarted {
                tick: self.ticks,
                viewer_chunk: center,
            });
        }

        let desired = self.visible_window(center);
        for &coord in &desired {
            if !self.active.contains_key(&coord) {
                self.load_chunk(coord, factory, sink, &mut report);
            }
        }

        let keep: HashSet<ChunkCoord> = desired.into_iter().collect();
        let mut stale: Vec<ChunkCoord> = self
            .active
            .keys()
            .filter(|c| !keep.contains(c))
            .copied()
            .collect();
        stale.sort_unstable();
        for coord in stale {
            if self.unload_chunk(coord, factory, sink).is_some() {
                report.unloaded.push(coord);
            }
        }

        if report.changed() {
            info!(
                "Tick {} at chunk {}: {} loaded ({} from records), {} unloaded, {} active.",
                report.tick,
                center,
                report.loaded.len(),
                report.reloaded.len(),
                report.unloaded.len(),
                self.active.len()
            );
        }
        if report.resource_failures > 0 {
            warn!(
                "Tick {}: {} instances could not be created.",
                report.tick, report.resource_failures
            );
        }
        if sink.wants(StreamEventKind::TickFinished) {
            sink.send(StreamEvent::TickFinished {
                report: report.clone(),
            });
        }
        report
    }

    fn load_chunk(
        &mut self,
        coord: ChunkCoord,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
        report: &mut TickReport,
    ) {
        let mut chunk = Chunk::new(coord);
        let reused_records = match self.dormant.remove(&coord) {
            Some(records) => {
                chunk.records = records;
                true
            }
            None => false,
        };

        self.spawn_tiles(&mut chunk, factory, sink, report);

        if !reused_records {
            let seed = seed_for_chunk(self.config().seed, coord);
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = self.planner.plan_chunk(coord, &mut rng, sink);
            report.placements += plan.records.len();
            report.rejections += plan.cells_rejected;
            chunk.records = plan.records;
        }

        self.materialize_decorations(&mut chunk, factory, sink, report);

        debug!(
            "Loaded chunk {}: {} tiles, {} of {} decorations{}.",
            coord,
            chunk.tiles.len(),
            chunk.decorations.len(),
            chunk.records.len(),
            if reused_records { " (from records)" } else { "" }
        );
        if sink.wants(StreamEventKind::ChunkLoaded) {
            sink.send(StreamEvent::ChunkLoaded {
                coord,
                tiles: chunk.tiles.len(),
                decorations: chunk.decorations.len(),
                reused_records,
            });
        }

        report.loaded.push(coord);
        if reused_records {
            report.reloaded.push(coord);
        }
        self.active.insert(coord, chunk);
    }

    fn spawn_tiles(
        &self,
        chunk: &mut Chunk,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
        report: &mut TickReport,
    ) {
        let config = self.config();
        let origin = self.mapper().world_origin_of(chunk.coord);
        let grid = self.planner.grid();
        let kind = ContentKind::Tile {
            prefab: &config.tile_prefab,
        };

        chunk.tiles.reserve(grid.cell_count());
        for cell in grid.cells() {
            let position = origin + grid.cell_center(cell);
            let transform = InstanceTransform::from_translation(position.extend(0.0));
            match factory.create(kind, &transform) {
                Ok(handle) => chunk.tiles.push(handle),
                Err(e) => {
                    report.resource_failures += 1;
                    report_failure(chunk.coord, kind.prefab(), &e.to_string(), sink);
                }
            }
        }
    }

    fn materialize_decorations(
        &self,
        chunk: &mut Chunk,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
        report: &mut TickReport,
    ) {
        let config = self.config();
        chunk.decorations.reserve(chunk.records.len());
        for record in &chunk.records {
            let Some(category) = config.category(&record.category) else {
                warn!(
                    "Chunk {} holds a record of unknown category '{}'; skipping.",
                    chunk.coord, record.category
                );
                if sink.wants(StreamEventKind::Warning) {
                    sink.send(StreamEvent::Warning {
                        context: format!("chunk:{}", chunk.coord),
                        message: format!("Unknown category '{}'", record.category),
                    });
                }
                continue;
            };

            let kind = ContentKind::Decoration {
                category: &category.id,
                prefab: &category.prefab,
            };
            let transform =
                InstanceTransform::from_translation(record.position).with_uniform_scale(record.scale);
            match factory.create(kind, &transform) {
                Ok(handle) => {
                    factory.set_depth_hint(handle, self.planner.depth_hint_for(record));
                    chunk.decorations.push(handle);
                }
                Err(e) => {
                    report.resource_failures += 1;
                    report_failure(chunk.coord, kind.prefab(), &e.to_string(), sink);
                }
            }
        }
    }

    /// Unloads one chunk, keeping its records. Returns the number of released
    /// instances, or `None` if the chunk was not loaded.
    pub fn unload_chunk(
        &mut self,
        coord: ChunkCoord,
        factory: &mut dyn InstanceFactory,
        sink: &mut dyn EventSink,
    ) -> Option<usize> {
        let mut chunk = self.active.remove(&coord)?;
        let released = chunk.release(factory);
        debug!(
            "Unloaded chunk {}: released {} instances, kept {} records.",
            coord,
            released,
            chunk.records.len()
        );
        if sink.wants(StreamEventKind::ChunkUnloaded) {
            sink.send(StreamEvent::ChunkUnloaded {
                coord,
                released,
                retained_records: chunk.records.len(),
            });
        }
        let mut records = std::mem::take(&mut chunk.records);
        records.shrink_to_fit();
        self.dormant.insert(coord, records);
        Some(released)
    }

    /// Unloads every loaded chunk. Returns the number of released instances.
    pub fn unload_all(&mut self, factory: &mut dyn InstanceFactory) -> usize {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort_unstable();
        coords
            .into_iter()
            .filter_map(|c| self.unload_chunk(c, factory, &mut ()))
            .sum()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.active.contains_key(&coord)
    }

    /// Loaded coordinates, sorted.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.active.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn loaded_count(&self) -> usize {
        self.active.len()
    }

    /// A loaded chunk.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.active.get(&coord)
    }

    /// Loaded chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active.values()
    }

    /// Records retained for an unloaded chunk.
    pub fn dormant_records(&self, coord: ChunkCoord) -> Option<&[DecorationRecord]> {
        self.dormant.get(&coord).map(Vec::as_slice)
    }

    /// Number of unloaded chunks with retained records.
    pub fn dormant_count(&self) -> usize {
        self.dormant.len()
    }

    /// Drops all retained records; affected chunks are planned again on their next load.
    pub fn clear_dormant(&mut self) {
        self.dormant.clear();
    }
}

fn report_failure(coord: ChunkCoord, prefab: &str, message: &str, sink: &mut dyn EventSink) {
    warn!("Chunk {}: failed to create '{}': {}.", coord, prefab, message);
    if sink.wants(StreamEventKind::ResourceFailed) {
        sink.send(StreamEvent::ResourceFailed {
            coord,
            prefab: prefab.to_owned(),
            message: message.to_owned(),
        });
    }
}
