//! Event types and sinks for observing tiling runs.
//!
//! This module defines [`TilingEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing [`crate::pipeline::TilingRunner`] or
//! [`crate::pipeline::run_tiling`].
use crate::grid::TileWindow;
use crate::pipeline::config::TilingConfig;
use crate::pipeline::runner::{AcceptedTile, TilingResult};

/// Describes events emitted by tiling runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum TilingEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// The configuration used.
        config: TilingConfig,
        /// Number of planes to process (1 for a single image).
        plane_count: usize,
        /// Number of tiles per plane.
        tiles_per_plane: usize,
    },

    /// Emitted when the whole run finishes.
    RunFinished {
        /// Aggregated result over all planes.
        result: TilingResult,
    },

    /// Emitted when a plane of a stack starts processing.
    PlaneStarted {
        /// Index of the plane along the stack axis.
        plane: usize,
    },

    /// Emitted after a tile was tested against the threshold.
    TileEvaluated {
        /// Plane of the tile, if the run covers a stack.
        plane: Option<usize>,
        /// The tile window.
        window: TileWindow,
        /// Whether the tile passed.
        accepted: bool,
    },

    /// Emitted when a tile is accepted.
    TileAccepted {
        /// The accepted tile and its ROIs.
        tile: AcceptedTile,
    },

    /// Non-fatal warning generated during a run.
    Warning {
        /// Context string (e.g. plane index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`TilingEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingEventKind {
    RunStarted,
    RunFinished,
    PlaneStarted,
    TileEvaluated,
    TileAccepted,
    Warning,
}

impl TilingEvent {
    pub fn kind(&self) -> TilingEventKind {
        match self {
            TilingEvent::RunStarted { .. } => TilingEventKind::RunStarted,
            TilingEvent::RunFinished { .. } => TilingEventKind::RunFinished,
            TilingEvent::PlaneStarted { .. } => TilingEventKind::PlaneStarted,
            TilingEvent::TileEvaluated { .. } => TilingEventKind::TileEvaluated,
            TilingEvent::TileAccepted { .. } => TilingEventKind::TileAccepted,
            TilingEvent::Warning { .. } => TilingEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`TilingEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: TilingEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: TilingEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = TilingEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: TilingEvent) {}

    #[inline]
    fn wants(&self, _kind: TilingEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(TilingEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(TilingEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(TilingEvent),
{
    #[inline]
    fn send(&mut self, event: TilingEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<TilingEvent>,
    only: Option<Vec<TilingEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collects only events of the listed kinds.
    pub fn only(kinds: impl Into<Vec<TilingEventKind>>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into()),
        }
    }

    pub fn into_inner(self) -> Vec<TilingEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[TilingEvent] {
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
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: TilingEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: TilingEventKind) -> bool {
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
    fn send(&mut self, event: TilingEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: TilingEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> TilingEvent {
        TilingEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(TilingEventKind::Warning));
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn vec_sink_filters_by_kind() {
        let mut sink = VecSink::only([TilingEventKind::PlaneStarted]);
        assert!(!sink.wants(TilingEventKind::Warning));
        sink.send(warning("a"));
        sink.send(TilingEvent::PlaneStarted { plane: 3 });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].kind(), TilingEventKind::PlaneStarted);
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
        matches!(multi.sinks[0].as_slice()[0], TilingEvent::Warning { .. })
            .then_some(())
            .expect("event captured");
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send_many([warning("a"), warning("b")]);
        assert_eq!(count, 2);
    }
}
