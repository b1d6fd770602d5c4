//! Trace points emitted during merging and extraction.
//!
//! The engine reports progress to an [`ExtractionObserver`] instead of
//! printing. [`TracingObserver`] forwards events to `tracing`;
//! [`RecordingObserver`] keeps them for inspection in tests.

use tracing::{debug, trace};

/// How an assembly loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// A stop word was found; the word (or its line) is included.
    StopWordHit,
    /// No further line below the marching coordinate.
    NoMoreLines,
    /// No further word to the right.
    NoCandidate,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::StopWordHit => "stop_word_hit",
            Termination::NoMoreLines => "no_more_lines",
            Termination::NoCandidate => "no_candidate",
        }
    }
}

/// Event emitted at a defined trace point.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    AnchorFound {
        index: usize,
        text: String,
    },
    AnchorNotFound {
        reason: String,
    },
    LineAssembled {
        indices: Vec<usize>,
    },
    ClusterMerged {
        members: Vec<usize>,
        text: String,
    },
    Terminated {
        reason: Termination,
        words: usize,
    },
}

/// Receives trace events. Implementations must not influence the result.
pub trait ExtractionObserver {
    fn on_event(&mut self, event: TraceEvent);
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::AnchorFound { index, text } => {
                debug!(index, text = %text, "anchor found");
            }
            TraceEvent::AnchorNotFound { reason } => {
                debug!(reason = %reason, "anchor not found");
            }
            TraceEvent::LineAssembled { indices } => {
                trace!(?indices, "line assembled");
            }
            TraceEvent::ClusterMerged { members, text } => {
                debug!(?members, text = %text, "cluster merged");
            }
            TraceEvent::Terminated { reason, words } => {
                debug!(reason = reason.as_str(), words, "scan terminated");
            }
        }
    }
}

/// Collects every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<TraceEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines reported through `LineAssembled`, as index lists.
    pub fn lines(&self) -> Vec<&[usize]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::LineAssembled { indices } => Some(indices.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl ExtractionObserver for RecordingObserver {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
