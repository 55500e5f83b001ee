//! Event types and sinks for observing chunk streaming.
//!
//! This module defines [`StreamEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while ticking a
//! [`crate::scatter::stream::ChunkStreamer`].
use glam::Vec2;

use crate::scatter::chunk::ChunkCoord;
use crate::scatter::stream::TickReport;
use crate::scatter::{CategoryId, DecorationRecord};

/// Describes events emitted while streaming.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Emitted before a tick evaluates the window.
    TickStarted {
        /// Tick counter, starting at 1.
        tick: u64,
        /// Chunk the viewer is in.
        viewer_chunk: ChunkCoord,
    },

    /// Emitted after all loads and unloads of a tick.
    TickFinished {
        /// Summary of the tick.
        report: TickReport,
    },

    /// Emitted when a chunk becomes loaded.
    ChunkLoaded {
        /// Chunk coordinate.
        coord: ChunkCoord,
        /// Tile instances created.
        tiles: usize,
        /// Decoration instances created.
        decorations: usize,
        /// Whether decorations came from retained records instead of the planner.
        reused_records: bool,
    },

    /// Emitted when a chunk is unloaded.
    ChunkUnloaded {
        /// Chunk coordinate.
        coord: ChunkCoord,
        /// Instances handed back to the factory.
        released: usize,
        /// Records kept for a later reload.
        retained_records: usize,
    },

    /// Emitted when the planner accepts a decoration.
    PlacementMade {
        /// Owning chunk.
        coord: ChunkCoord,
        /// The accepted record.
        record: DecorationRecord,
    },

    /// Emitted when a candidate is rejected for spacing.
    PlacementRejected {
        /// Owning chunk.
        coord: ChunkCoord,
        /// Category that was drawn.
        category: CategoryId,
        /// Candidate position in world space.
        position: Vec2,
    },

    /// Emitted when the factory fails to create an instance.
    ResourceFailed {
        /// Owning chunk.
        coord: ChunkCoord,
        /// Prefab that failed.
        prefab: String,
        /// Factory error message.
        message: String,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. chunk coordinate).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl StreamEvent {
    /// The kind of this event.
    pub fn kind(&self) -> StreamEventKind {
        match self {
            StreamEvent::TickStarted { .. } => StreamEventKind::TickStarted,
            StreamEvent::TickFinished { .. } => StreamEventKind::TickFinished,
            StreamEvent::ChunkLoaded { .. } => StreamEventKind::ChunkLoaded,
            StreamEvent::ChunkUnloaded { .. } => StreamEventKind::ChunkUnloaded,
            StreamEvent::PlacementMade { .. } => StreamEventKind::PlacementMade,
            StreamEvent::PlacementRejected { .. } => StreamEventKind::PlacementRejected,
            StreamEvent::ResourceFailed { .. } => StreamEventKind::ResourceFailed,
            StreamEvent::Warning { .. } => StreamEventKind::Warning,
        }
    }
}

/// Discriminant of [`StreamEvent`], used by sinks to opt out of expensive events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamEventKind {
    TickStarted,
    TickFinished,
    ChunkLoaded,
    ChunkUnloaded,
    PlacementMade,
    PlacementRejected,
    ResourceFailed,
    Warning,
}

/// A generic event sink that accepts [`StreamEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: StreamEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: StreamEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = StreamEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: StreamEvent) {}

    #[inline]
    fn wants(&self, _kind: StreamEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(StreamEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(StreamEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(StreamEvent),
{
    #[inline]
    fn send(&mut self, event: StreamEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<StreamEvent>,
    only: Option<Vec<StreamEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    /// Collects only the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = StreamEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<StreamEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[StreamEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: StreamEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: StreamEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: StreamEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: StreamEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: StreamEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> StreamEvent {
        StreamEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(StreamEventKind::Warning), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn vec_sink_filters_kinds() {
        let mut sink = VecSink::only([StreamEventKind::ChunkLoaded]);
        assert!(!sink.wants(StreamEventKind::Warning));
        sink.send(warning("ignored"));
        sink.send(StreamEvent::ChunkLoaded {
            coord: ChunkCoord::new(0, 0),
            tiles: 4,
            decorations: 1,
            reused_records: false,
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].kind(), StreamEventKind::ChunkLoaded);
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(StreamEventKind::TickFinished));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
        matches!(multi.sinks[0].as_slice()[0], StreamEvent::Warning { .. })
            .then_some(())
            .expect("event captured");
    }

    #[test]
    fn multi_sink_wants_union_of_sinks() {
        let multi = MultiSink::with_sinks(vec![
            VecSink::only([StreamEventKind::Warning]),
            VecSink::only([StreamEventKind::ChunkUnloaded]),
        ]);
        assert!(multi.wants(StreamEventKind::ChunkUnloaded));
        assert!(!multi.wants(StreamEventKind::PlacementMade));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        drop(sink);
        assert_eq!(count, 1);
    }
}
