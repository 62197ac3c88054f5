//! BioCortex - the default cortex: a word vocabulary over the associative graph.
//!
//! Fitting wires consecutive words of each text with an STDP update and
//! remembers the sequence for replay. Concepts are the distinct known words
//! of a text, weighted by frequency and by the pheromone of their strongest
//! outgoing edge. Generation follows the graph: each new word is sampled
//! from the strongest successors of the previous one, biased by dopamine.

use crate::autopoiesis;
use crate::bridge;
use crate::config::CortexConfig;
use crate::replay::ReplayBuffer;
use crate::vocab::Vocabulary;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use symbio_core::cortex::Cortex;
use symbio_core::graph::{AssociativeGraph, GraphConfig};
use symbio_core::neuromod::NeuromodulatorState;
use symbio_core::types::*;
use tracing::{debug, info};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash of a concept name.
pub fn concept_hash(name: &str) -> u64 {
    name.bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
}

#[derive(Debug, Clone)]
pub struct BioCortex {
    config: CortexConfig,
    vocab: Vocabulary,
    graph: AssociativeGraph,
    neuromod: NeuromodulatorState,
    replay: ReplayBuffer,
    rng: ChaCha8Rng,
}

impl BioCortex {
    pub fn new(config: CortexConfig, graph_config: GraphConfig) -> Self {
        Self::from_parts(
            config,
            Vocabulary::new(),
            AssociativeGraph::with_config(graph_config),
            NeuromodulatorState::default(),
        )
    }

    /// Assemble a cortex from restored state. The replay buffer starts empty.
    pub fn from_parts(
        config: CortexConfig,
        vocab: Vocabulary,
        graph: AssociativeGraph,
        neuromod: NeuromodulatorState,
    ) -> Self {
        Self {
            replay: ReplayBuffer::new(config.replay_capacity),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            vocab,
            graph,
            neuromod,
        }
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    /// Grow the vocabulary and wire every text into the graph.
    ///
    /// Returns the number of non-empty sequences learned.
    pub fn fit<S: AsRef<str>>(&mut self, texts: &[S]) -> usize {
        let new_words = self.vocab.fit(texts);
        let mut learned = 0;
        for text in texts {
            let sequence = self.vocab.encode(text.as_ref());
            if sequence.is_empty() {
                continue;
            }
            for pair in sequence.windows(2) {
                self.graph.update_edge(Edge::new(pair[0], pair[1]), 1.0, 1.0);
            }
            self.replay.add(&sequence);
            learned += 1;
        }
        info!(
            sequences = learned,
            new_words,
            vocab = self.vocab.len(),
            edges = self.graph.edge_count(),
            "Cortex fitted"
        );
        learned
    }

    /// Replay buffered sequences through the graph. Returns edge updates applied.
    pub fn consolidate(&mut self, n: usize) -> usize {
        self.replay.consolidate(&mut self.graph, n)
    }

    /// Distinct known words of `text`, strongest first, at most `concept_top_k`.
    ///
    /// Equal strengths keep token id order.
    pub fn extract_concepts(&self, text: &str) -> Vec<Concept> {
        let tokens = self.vocab.encode(text);
        let total = tokens.len().max(1) as f64;
        let mut counts: BTreeMap<TokenId, usize> = BTreeMap::new();
        for &t in &tokens {
            *counts.entry(t).or_insert(0) += 1;
        }

        let mut concepts: Vec<Concept> = counts
            .into_iter()
            .map(|(token, count)| {
                let pheromone = match self.graph.top_k_successors(token, 1).first() {
                    Some(&succ) => self.graph.pheromone(Edge::new(token, succ)),
                    None => self.graph.pheromone(Edge::new(token, token)),
                };
                let name = match self.vocab.word(token) {
                    Some(word) => word.to_string(),
                    None => format!("tok{token}"),
                };
                Concept {
                    name,
                    strength: count as f64 / total,
                    pheromone,
                }
            })
            .collect();

        concepts.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        concepts.truncate(self.config.concept_top_k);
        concepts
    }

    /// Place each concept at a hash-derived cell.
    pub fn concepts_to_pulses(&self, concepts: &[Concept], shape: FieldShape) -> Vec<Pulse> {
        let h = shape.height.max(1) as u64;
        let w = shape.width.max(1) as u64;
        concepts
            .iter()
            .map(|concept| {
                let hash = concept_hash(&concept.name);
                let y = hash % h;
                let x = (hash / h) % w;
                Pulse::new(
                    (y as i64, x as i64),
                    0.5 + concept.strength * (1.0 + concept.pheromone),
                    1.5 + concept.pheromone,
                    concept.name.clone(),
                )
            })
            .collect()
    }

    /// Continue `prompt` by sampling graph successors.
    ///
    /// Candidates are the `sampler_top_k` strongest successors of the last
    /// word, scored by `(weight + pheromone) · dopamine` and passed through a
    /// temperature softmax. Stops early at a word without successors. A
    /// prompt with no known words is returned trimmed.
    pub fn generate(&mut self, prompt: &str, max_new_tokens: usize) -> String {
        let mut generated = self.vocab.encode(prompt);
        let prompt_len = generated.len();
        if generated.is_empty() {
            return prompt.trim().to_string();
        }

        for _ in 0..max_new_tokens {
            let Some(&last) = generated.last() else {
                break;
            };
            let candidates = self.graph.top_k_successors(last, self.config.sampler_top_k);
            let Some(&fallback) = candidates.last() else {
                break;
            };
            let scores: Vec<f64> = candidates
                .iter()
                .map(|&b| {
                    self.graph
                        .synapse(Edge::new(last, b))
                        .map_or(0.0, |s| s.strength())
                        * self.neuromod.dopamine
                })
                .collect();
            let probs = softmax(&scores, self.config.temperature);

            let pick = self.rng.gen::<f64>();
            let mut cumulative = 0.0;
            let mut next = fallback;
            for (&candidate, p) in candidates.iter().zip(&probs) {
                cumulative += p;
                if pick <= cumulative {
                    next = candidate;
                    break;
                }
            }
            generated.push(next);
        }

        debug!(
            prompt,
            new_tokens = generated.len() - prompt_len,
            "Generated continuation"
        );
        self.vocab.decode(&generated)
    }
}

fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    let t = temperature.max(1e-6);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| ((s - max) / t).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Cortex for BioCortex {
    fn text_to_pulses(&self, text: &str, shape: FieldShape) -> Vec<Pulse> {
        bridge::text_to_pulses(self, text, shape)
    }

    fn graph(&self) -> &AssociativeGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut AssociativeGraph {
        &mut self.graph
    }

    fn neuromod(&self) -> &NeuromodulatorState {
        &self.neuromod
    }

    fn neuromod_mut(&mut self) -> &mut NeuromodulatorState {
        &mut self.neuromod
    }

    fn record_replay(&mut self, sequence: &[TokenId]) {
        self.replay.add(sequence);
    }

    fn synthesize_thoughts(&mut self, hotspots: &[Hotspot], max_sentences: usize) -> Vec<String> {
        let top_k_tags = self.config.top_k_tags;
        let max_new_tokens = self.config.max_new_tokens;
        autopoiesis::synthesize_thoughts(hotspots, max_sentences, top_k_tags, |prompt| {
            self.generate(prompt, max_new_tokens)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cortex() -> BioCortex {
        BioCortex::new(CortexConfig::default(), GraphConfig::default())
    }

    #[test]
    fn fit_wires_consecutive_words() {
        let mut c = cortex();
        assert_eq!(c.fit(&["the field hums", "", "the swarm"]), 2);
        let the = c.vocab().id("the").unwrap();
        let field = c.vocab().id("field").unwrap();
        let swarm = c.vocab().id("swarm").unwrap();
        assert_eq!(c.graph().pheromone(Edge::new(the, field)), 1.0);
        assert_eq!(c.graph().pheromone(Edge::new(the, swarm)), 1.0);
        assert_eq!(c.replay().len(), 2);
    }

    #[test]
    fn concepts_rank_by_frequency() {
        let mut c = cortex();
        c.fit(&["pulse field pulse swarm"]);
        let concepts = c.extract_concepts("pulse field pulse swarm");
        assert_eq!(concepts[0].name, "pulse");
        assert!((concepts[0].strength - 0.5).abs() < 1e-12);
        assert!(concepts[0].pheromone >= 1.0);
        let names: Vec<&str> = concepts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["pulse", "field", "swarm"]);
        // swarm has no successor and no self edge
        assert_eq!(concepts[2].pheromone, 0.0);
    }

    #[test]
    fn concept_count_is_capped() {
        let config = CortexConfig {
            concept_top_k: 2,
            ..Default::default()
        };
        let mut c = BioCortex::new(config, GraphConfig::default());
        c.fit(&["a b c d e"]);
        assert_eq!(c.extract_concepts("a b c d e").len(), 2);
        assert!(c.extract_concepts("unseen words only").is_empty());
    }

    #[test]
    fn pulse_positions_are_stable_and_on_grid() {
        let c = cortex();
        let shape = FieldShape::new(12, 9);
        let concept = Concept {
            name: "architektur".into(),
            strength: 0.5,
            pheromone: 1.0,
        };
        let a = c.concepts_to_pulses(&[concept.clone()], shape);
        let b = c.concepts_to_pulses(&[concept], shape);
        assert_eq!(a, b);
        assert!(shape.contains(a[0].position));
        assert!((a[0].amplitude - 1.5).abs() < 1e-12);
        assert!((a[0].spread - 2.5).abs() < 1e-12);
        assert_eq!(concept_hash(""), FNV_OFFSET);
    }

    #[test]
    fn generation_follows_the_graph() {
        let mut c = cortex();
        c.fit(&["alpha beta gamma"]);
        assert_eq!(c.generate("alpha", 5), "alpha beta gamma");
        assert_eq!(c.generate("  Unknown prompt ", 5), "Unknown prompt");
    }

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0], 0.5);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }
}
