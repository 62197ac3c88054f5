//! Events drained by the orchestrator.
//!
//! Events arrive either from the orchestrator itself or from a serialized
//! stream. Any kind outside the four known ones decodes to
//! [`Event::Unknown`], which the orchestrator logs and drops.

use crate::types::{Hotspot, Pulse, StepMetrics, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged union of everything the loop reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    /// Inject these pulses into the field.
    Pulse { pulses: Vec<Pulse> },
    /// Advance the habitat one step.
    Tick { step: Tick },
    /// Hotspots found after a tick, with the step metrics that produced them.
    Feedback {
        hotspots: Vec<Hotspot>,
        metrics: StepMetrics,
    },
    /// Evaporate the associative graph at `rate`.
    Decay { rate: f64 },
    /// Unrecognized kind from a decoded stream.
    #[serde(other)]
    Unknown,
}

/// Discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pulse,
    Tick,
    Feedback,
    Decay,
    Unknown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Pulse => "pulse",
            EventKind::Tick => "tick",
            EventKind::Feedback => "feedback",
            EventKind::Decay => "decay",
            EventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    pub fn pulse(pulses: Vec<Pulse>) -> Self {
        Event::Pulse { pulses }
    }

    pub fn tick(step: Tick) -> Self {
        Event::Tick { step }
    }

    pub fn feedback(hotspots: Vec<Hotspot>, metrics: StepMetrics) -> Self {
        Event::Feedback { hotspots, metrics }
    }

    pub fn decay(rate: f64) -> Self {
        Event::Decay { rate }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Pulse { .. } => EventKind::Pulse,
            Event::Tick { .. } => EventKind::Tick,
            Event::Feedback { .. } => EventKind::Feedback,
            Event::Decay { .. } => EventKind::Decay,
            Event::Unknown => EventKind::Unknown,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Pulse { pulses } => write!(f, "pulse:{}", pulses.len()),
            Event::Tick { step } => write!(f, "tick:{step}"),
            Event::Feedback { hotspots, .. } => write!(f, "feedback:{} hotspots", hotspots.len()),
            Event::Decay { rate } => write!(f, "decay:{rate}"),
            Event::Unknown => f.write_str("unknown"),
        }
    }
}

/// Events of one kind, in their original order.
pub fn iter_by_kind<'a, I>(events: I, kind: EventKind) -> impl Iterator<Item = &'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events.into_iter().filter(move |e| e.kind() == kind)
}
