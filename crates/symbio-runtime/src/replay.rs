//! Replay buffer - recent token sequences kept for consolidation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use symbio_core::graph::AssociativeGraph;
use symbio_core::types::{Edge, TokenId};

/// Seed of the sampling generator. Every call to `sample` starts from it.
const SAMPLE_SEED: u64 = 42;

/// Bounded FIFO of token sequences. The oldest entry is evicted when full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayBuffer {
    capacity: usize,
    buffer: VecDeque<Vec<TokenId>>,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[TokenId]> {
        self.buffer.iter().map(Vec::as_slice)
    }

    pub fn add(&mut self, sequence: &[TokenId]) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sequence.to_vec());
    }

    /// Draw `min(n, len)` sequences with replacement.
    pub fn sample(&self, n: usize) -> Vec<Vec<TokenId>> {
        if self.buffer.is_empty() {
            return vec![];
        }
        let mut rng = ChaCha8Rng::seed_from_u64(SAMPLE_SEED);
        (0..n.min(self.buffer.len()))
            .map(|_| self.buffer[rng.gen_range(0..self.buffer.len())].clone())
            .collect()
    }

    /// Replay up to `n` sampled sequences through the graph's STDP update.
    ///
    /// Returns the number of edge updates applied.
    pub fn consolidate(&self, graph: &mut AssociativeGraph, n: usize) -> usize {
        let mut updates = 0;
        for sequence in self.sample(n) {
            for pair in sequence.windows(2) {
                graph.update_edge(Edge::new(pair[0], pair[1]), 1.0, 1.0);
                updates += 1;
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_sequence_is_evicted() {
        let mut replay = ReplayBuffer::new(2);
        replay.add(&[1, 2]);
        replay.add(&[3, 4]);
        replay.add(&[5, 6]);
        let kept: Vec<&[TokenId]> = replay.iter().collect();
        let expected: Vec<&[TokenId]> = vec![&[3, 4], &[5, 6]];
        assert_eq!(kept, expected);
    }

    #[test]
    fn sampling_is_bounded_and_reproducible() {
        let mut replay = ReplayBuffer::new(8);
        assert!(replay.sample(3).is_empty());
        for i in 0..4 {
            replay.add(&[i, i + 1]);
        }
        assert_eq!(replay.sample(10).len(), 4);
        assert_eq!(replay.sample(3), replay.sample(3));
    }

    #[test]
    fn consolidation_strengthens_replayed_edges() {
        let mut replay = ReplayBuffer::new(4);
        replay.add(&[1, 2, 3]);
        let mut graph = AssociativeGraph::new();
        let updates = replay.consolidate(&mut graph, 2);
        assert_eq!(updates, 2);
        assert!(graph.weight(Edge::new(1, 2)) > 0.0);
        assert_eq!(graph.pheromone(Edge::new(2, 3)), 1.0);
    }
}
