//! Cortex - the generation side of the loop, seen from the orchestrator.
//!
//! A cortex owns the associative graph and the neuromodulator state. The
//! orchestrator borrows it exclusively for a run and is the only writer
//! while it does.

use crate::graph::AssociativeGraph;
use crate::neuromod::NeuromodulatorState;
use crate::types::{FieldShape, Hotspot, Pulse, TokenId};

/// The aggregate the orchestrator reinforces and harvests from.
pub trait Cortex {
    /// Map text to field pulses. Must be deterministic for a given state.
    fn text_to_pulses(&self, text: &str, shape: FieldShape) -> Vec<Pulse>;

    fn graph(&self) -> &AssociativeGraph;

    fn graph_mut(&mut self) -> &mut AssociativeGraph;

    fn neuromod(&self) -> &NeuromodulatorState;

    fn neuromod_mut(&mut self) -> &mut NeuromodulatorState;

    /// Remember a reinforced token sequence for later consolidation.
    fn record_replay(&mut self, sequence: &[TokenId]);

    /// Turn hotspots into sentences, strongest hotspot first.
    fn synthesize_thoughts(&mut self, hotspots: &[Hotspot], max_sentences: usize) -> Vec<String>;
}
