//! Bridge from text to field pulses.

use crate::biocortex::BioCortex;
use symbio_core::types::{FieldShape, Pulse};

/// Concepts of `text` as pulses, amplified by their pheromone.
///
/// Amplitude is multiplied by `1 + pheromone` and spread is floored at 1.0.
pub fn text_to_pulses(cortex: &BioCortex, text: &str, shape: FieldShape) -> Vec<Pulse> {
    let concepts = cortex.extract_concepts(text);
    let mut pulses = cortex.concepts_to_pulses(&concepts, shape);
    for (concept, pulse) in concepts.iter().zip(pulses.iter_mut()) {
        pulse.amplitude *= 1.0 + concept.pheromone;
        pulse.spread = pulse.spread.max(1.0);
    }
    pulses
}
