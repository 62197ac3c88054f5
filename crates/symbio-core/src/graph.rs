//! Associative graph - directed token graph with Hebbian weights and pheromone trails.
//!
//! Every edge carries two parallel quantities. `weight` follows an STDP-like
//! rule (potentiation from co-activation, a constant depression term) and is
//! clamped at zero on the update path. `pheromone` accumulates the
//! post-synaptic activity and is what the random walk and the feedback path
//! follow.
//!
//! Edges are stored in a petgraph `DiGraph` in insertion order. Evaporation
//! rebuilds the graph from the surviving edges so that iteration order stays
//! the insertion order of the survivors. Rankings break ties on that order.

use crate::error::{GraphError, Result};
use crate::types::{Edge, TokenId};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Values below this are treated as evaporated.
pub const EDGE_EPSILON: f64 = 1e-6;

/// Learning constants of the associative graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Potentiation gain.
    #[serde(default = "default_a_plus")]
    pub a_plus: f64,
    /// Depression gain.
    #[serde(default = "default_a_minus")]
    pub a_minus: f64,
    /// Constant depression factor applied on every update.
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Base seed of the random walk.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

fn default_a_plus() -> f64 {
    0.1
}
fn default_a_minus() -> f64 {
    0.05
}
fn default_decay() -> f64 {
    0.01
}
fn default_rng_seed() -> u64 {
    7
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            a_plus: default_a_plus(),
            a_minus: default_a_minus(),
            decay: default_decay(),
            rng_seed: default_rng_seed(),
        }
    }
}

/// Edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Synapse {
    pub weight: f64,
    pub pheromone: f64,
}

impl Synapse {
    /// Combined ranking score.
    pub fn strength(&self) -> f64 {
        self.weight + self.pheromone
    }
}

/// Persisted form: `{"weights": {"a,b": w}, "pheromones": {"a,b": p}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub weights: IndexMap<String, f64>,
    #[serde(default)]
    pub pheromones: IndexMap<String, f64>,
}

/// Directed weighted graph over token ids.
#[derive(Debug, Clone)]
pub struct AssociativeGraph {
    graph: DiGraph<TokenId, Synapse>,
    node_index: HashMap<TokenId, NodeIndex>,
    config: GraphConfig,
}

impl AssociativeGraph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn ensure_node(&mut self, id: TokenId) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&id) {
            idx
        } else {
            let idx = self.graph.add_node(id);
            self.node_index.insert(id, idx);
            idx
        }
    }

    fn find(&self, edge: Edge) -> Option<EdgeIndex> {
        let a = *self.node_index.get(&edge.a)?;
        let b = *self.node_index.get(&edge.b)?;
        self.graph.find_edge(a, b)
    }

    fn entry(&mut self, edge: Edge) -> &mut Synapse {
        let a = self.ensure_node(edge.a);
        let b = self.ensure_node(edge.b);
        let idx = match self.graph.find_edge(a, b) {
            Some(idx) => idx,
            None => self.graph.add_edge(a, b, Synapse::default()),
        };
        &mut self.graph[idx]
    }

    /// STDP-like update of one edge, creating it if absent.
    ///
    /// `weight += a_plus·pre·post − a_minus·decay` and `pheromone += post`,
    /// both clamped at zero.
    pub fn update_edge(&mut self, edge: Edge, pre: f64, post: f64) {
        let delta = self.config.a_plus * pre * post - self.config.a_minus * self.config.decay;
        let synapse = self.entry(edge);
        synapse.weight = (synapse.weight + delta).max(0.0);
        synapse.pheromone = (synapse.pheromone + post).max(0.0);
    }

    /// Add `amount` to weight and pheromone of every consecutive pair of `path`.
    ///
    /// Returns the number of edges touched. A negative or non-finite amount is
    /// rejected before anything is written.
    pub fn reinforce(&mut self, path: &[TokenId], amount: f64) -> Result<usize> {
        if !amount.is_finite() || amount < 0.0 {
            warn!(amount, "Rejected reinforcement");
            return Err(GraphError::InvalidReinforcement(amount).into());
        }
        let mut touched = 0;
        for pair in path.windows(2) {
            let synapse = self.entry(Edge::new(pair[0], pair[1]));
            synapse.weight += amount;
            synapse.pheromone += amount;
            touched += 1;
        }
        Ok(touched)
    }

    /// Scale both quantities by `max(0, 1 - rate)` and drop edges where either
    /// falls below the epsilon. Returns the number of pruned edges.
    ///
    /// Weight and pheromone share one stored edge, so pruning removes both:
    /// an edge whose weight was clamped to zero loses its pheromone trail at
    /// the next evaporation and can no longer be picked by feedback.
    pub fn evaporate(&mut self, rate: f64) -> usize {
        let factor = (1.0 - rate).max(0.0);
        let mut pruned = 0;
        for synapse in self.graph.edge_weights_mut() {
            synapse.weight *= factor;
            synapse.pheromone *= factor;
            if synapse.weight < EDGE_EPSILON || synapse.pheromone < EDGE_EPSILON {
                pruned += 1;
            }
        }
        if pruned > 0 {
            self.compact();
            debug!(pruned, remaining = self.edge_count(), "Graph evaporated");
        }
        pruned
    }

    /// Rebuild the graph from surviving edges, keeping nodes and edge order.
    fn compact(&mut self) {
        let mut rebuilt: DiGraph<TokenId, Synapse> =
            DiGraph::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for idx in self.graph.node_indices() {
            rebuilt.add_node(self.graph[idx]);
        }
        for e in self.graph.edge_references() {
            let s = e.weight();
            if s.weight >= EDGE_EPSILON && s.pheromone >= EDGE_EPSILON {
                rebuilt.add_edge(e.source(), e.target(), *s);
            }
        }
        self.graph = rebuilt;
    }

    /// Outgoing edges of `node` in storage order.
    fn outgoing(&self, node: TokenId) -> Vec<(TokenId, Synapse)> {
        let Some(&idx) = self.node_index.get(&node) else {
            return vec![];
        };
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| (self.graph[e.target()], *e.weight()))
            .collect()
    }

    /// Successors of `node` with their synapses, in storage order.
    pub fn successors(&self, node: TokenId) -> Vec<(TokenId, Synapse)> {
        self.outgoing(node)
    }

    /// Up to `k` successors ranked by `weight + pheromone`, descending.
    ///
    /// Equal scores keep storage order.
    pub fn top_k_successors(&self, node: TokenId, k: usize) -> Vec<TokenId> {
        let mut ranked = self.outgoing(node);
        ranked.sort_by(|a, b| {
            b.1.strength()
                .partial_cmp(&a.1.strength())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.into_iter().take(k).map(|(b, _)| b).collect()
    }

    /// All edges in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, Synapse)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                Edge::new(self.graph[e.source()], self.graph[e.target()]),
                *e.weight(),
            )
        })
    }

    /// The edge with the highest pheromone; the first stored wins ties.
    pub fn strongest_pheromone_edge(&self) -> Option<Edge> {
        let mut best: Option<(Edge, f64)> = None;
        for (edge, synapse) in self.edges() {
            if best.map_or(true, |(_, p)| synapse.pheromone > p) {
                best = Some((edge, synapse.pheromone));
            }
        }
        best.map(|(edge, _)| edge)
    }

    pub fn synapse(&self, edge: Edge) -> Option<Synapse> {
        self.find(edge).map(|idx| self.graph[idx])
    }

    /// Weight of an edge, 0.0 when absent.
    pub fn weight(&self, edge: Edge) -> f64 {
        self.synapse(edge).map_or(0.0, |s| s.weight)
    }

    /// Pheromone of an edge, 0.0 when absent.
    pub fn pheromone(&self, edge: Edge) -> f64 {
        self.synapse(edge).map_or(0.0, |s| s.pheromone)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Pheromone-biased random walk.
    ///
    /// The generator is seeded with `rng_seed + seed`. The start node is drawn
    /// uniformly from the distinct edge sources, then each step moves to a
    /// successor with probability proportional to `pheromone^pher_bias + 1e-6`.
    /// Stops early at a node without successors.
    pub fn random_walk(&self, seed: u64, steps: usize, pher_bias: f64) -> Vec<TokenId> {
        if self.is_empty() {
            return vec![];
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed.wrapping_add(seed));

        let mut sources: Vec<TokenId> = Vec::new();
        for (edge, _) in self.edges() {
            if !sources.contains(&edge.a) {
                sources.push(edge.a);
            }
        }
        let mut current = sources[rng.gen_range(0..sources.len())];
        let mut path = vec![current];

        for _ in 0..steps {
            let options = self.outgoing(current);
            let Some(&(fallback, _)) = options.last() else {
                break;
            };
            let scores: Vec<f64> = options
                .iter()
                .map(|(_, s)| s.pheromone.powf(pher_bias) + 1e-6)
                .collect();
            let total: f64 = scores.iter().sum();
            let pick = rng.gen::<f64>();

            let mut cumulative = 0.0;
            let mut next = fallback;
            for ((option, _), score) in options.iter().zip(&scores) {
                cumulative += score / total;
                if pick <= cumulative {
                    next = *option;
                    break;
                }
            }
            current = next;
            path.push(current);
        }
        path
    }

    /// Scan for negative quantities.
    pub fn validate(&self) -> Result<()> {
        for (edge, synapse) in self.edges() {
            if synapse.weight < 0.0 || synapse.weight.is_nan() {
                return Err(GraphError::NegativeValue {
                    edge,
                    quantity: "weight",
                    value: synapse.weight,
                }
                .into());
            }
            if synapse.pheromone < 0.0 || synapse.pheromone.is_nan() {
                return Err(GraphError::NegativeValue {
                    edge,
                    quantity: "pheromone",
                    value: synapse.pheromone,
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::default();
        for (edge, synapse) in self.edges() {
            snapshot.weights.insert(edge.to_string(), synapse.weight);
            snapshot.pheromones.insert(edge.to_string(), synapse.pheromone);
        }
        snapshot
    }

    /// Restore from a snapshot. Keys present in only one map get 0.0 for the
    /// other quantity. The result is validated.
    pub fn from_snapshot(snapshot: &GraphSnapshot, config: GraphConfig) -> Result<Self> {
        let mut graph = Self::with_config(config);
        for key in snapshot.weights.keys().chain(snapshot.pheromones.keys()) {
            let edge: Edge = key.parse()?;
            if graph.find(edge).is_some() {
                continue;
            }
            let synapse = graph.entry(edge);
            synapse.weight = snapshot.weights.get(key).copied().unwrap_or(0.0);
            synapse.pheromone = snapshot.pheromones.get(key).copied().unwrap_or(0.0);
        }
        graph.validate()?;
        Ok(graph)
    }
}

impl Default for AssociativeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbioError;
    use proptest::prelude::*;

    #[test]
    fn update_creates_edge_and_accumulates_pheromone() {
        let mut g = AssociativeGraph::new();
        g.update_edge(Edge::new(1, 2), 1.0, 1.0);
        let s = g.synapse(Edge::new(1, 2)).unwrap();
        assert!((s.weight - (0.1 - 0.05 * 0.01)).abs() < 1e-12);
        assert_eq!(s.pheromone, 1.0);
        assert_eq!(g.weight(Edge::new(2, 1)), 0.0);
    }

    #[test]
    fn depression_only_update_clamps_at_zero() {
        let mut g = AssociativeGraph::new();
        g.update_edge(Edge::new(1, 2), 0.0, 0.0);
        let s = g.synapse(Edge::new(1, 2)).unwrap();
        assert_eq!(s.weight, 0.0);
        assert_eq!(s.pheromone, 0.0);
    }

    #[test]
    fn reinforce_walks_consecutive_pairs() {
        let mut g = AssociativeGraph::new();
        let touched = g.reinforce(&[1, 2, 3], 0.5).unwrap();
        assert_eq!(touched, 2);
        assert_eq!(g.weight(Edge::new(1, 2)), 0.5);
        assert_eq!(g.pheromone(Edge::new(2, 3)), 0.5);
        assert_eq!(g.reinforce(&[4], 1.0).unwrap(), 0);
    }

    #[test]
    fn negative_reinforcement_is_an_invariant_violation() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[1, 2], 1.0).unwrap();
        let err = g.reinforce(&[1, 2], -2.0).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(g.weight(Edge::new(1, 2)), 1.0);
        assert!(g.reinforce(&[1, 2], f64::NAN).is_err());
    }

    #[test]
    fn zero_weight_edge_loses_its_trail_on_evaporation() {
        let mut g = AssociativeGraph::new();
        // pre = 0 leaves only the depression term, so weight clamps to zero
        g.update_edge(Edge::new(1, 2), 0.0, 1.0);
        assert_eq!(g.weight(Edge::new(1, 2)), 0.0);
        assert_eq!(g.pheromone(Edge::new(1, 2)), 1.0);
        assert_eq!(g.strongest_pheromone_edge(), Some(Edge::new(1, 2)));

        assert_eq!(g.evaporate(0.0), 1);
        assert!(g.synapse(Edge::new(1, 2)).is_none());
        assert_eq!(g.strongest_pheromone_edge(), None);
    }

    #[test]
    fn evaporation_prunes_and_keeps_order() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[1, 2], 1.0).unwrap();
        g.reinforce(&[1, 3], 1e-6).unwrap();
        g.reinforce(&[1, 4], 1.0).unwrap();
        let pruned = g.evaporate(0.5);
        assert_eq!(pruned, 1);
        let edges: Vec<Edge> = g.edges().map(|(e, _)| e).collect();
        assert_eq!(edges, vec![Edge::new(1, 2), Edge::new(1, 4)]);
        assert_eq!(g.weight(Edge::new(1, 2)), 0.5);
    }

    #[test]
    fn full_evaporation_empties_the_graph() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[1, 2, 3, 1], 2.0).unwrap();
        g.evaporate(1.0);
        assert!(g.is_empty());
        assert!(g.random_walk(0, 5, 1.0).is_empty());
    }

    #[test]
    fn top_k_ranks_by_combined_strength_with_stable_ties() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[0, 1], 1.0).unwrap();
        g.reinforce(&[0, 2], 3.0).unwrap();
        g.reinforce(&[0, 3], 1.0).unwrap();
        g.reinforce(&[0, 4], 2.0).unwrap();
        assert_eq!(g.top_k_successors(0, 3), vec![2, 4, 1]);
        assert_eq!(g.top_k_successors(0, 10), vec![2, 4, 1, 3]);
        assert!(g.top_k_successors(9, 3).is_empty());
    }

    #[test]
    fn strongest_pheromone_edge_prefers_first_on_ties() {
        let mut g = AssociativeGraph::new();
        assert_eq!(g.strongest_pheromone_edge(), None);
        g.reinforce(&[5, 6], 2.0).unwrap();
        g.reinforce(&[1, 2], 2.0).unwrap();
        assert_eq!(g.strongest_pheromone_edge(), Some(Edge::new(5, 6)));
        g.update_edge(Edge::new(1, 2), 0.0, 0.5);
        assert_eq!(g.strongest_pheromone_edge(), Some(Edge::new(1, 2)));
    }

    #[test]
    fn random_walk_is_seed_reproducible_and_follows_edges() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[1, 2, 3, 1, 4, 2], 1.0).unwrap();
        let a = g.random_walk(3, 10, 1.0);
        let b = g.random_walk(3, 10, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 11);
        for pair in a.windows(2) {
            assert!(g.synapse(Edge::new(pair[0], pair[1])).is_some());
        }
    }

    #[test]
    fn random_walk_stops_at_sinks() {
        let mut g = AssociativeGraph::new();
        g.reinforce(&[1, 2], 1.0).unwrap();
        assert_eq!(g.random_walk(0, 8, 1.0), vec![1, 2]);
    }

    #[test]
    fn snapshot_round_trip_preserves_edges() {
        let mut g = AssociativeGraph::new();
        g.update_edge(Edge::new(3, 1), 1.0, 1.0);
        g.reinforce(&[1, 2], 0.25).unwrap();
        let json = serde_json::to_string(&g.to_snapshot()).unwrap();
        assert!(json.contains("\"3,1\""));
        let snapshot: GraphSnapshot = serde_json::from_str(&json).unwrap();
        let restored = AssociativeGraph::from_snapshot(&snapshot, GraphConfig::default()).unwrap();
        assert_eq!(restored.edge_count(), 2);
        for ((e1, s1), (e2, s2)) in g.edges().zip(restored.edges()) {
            assert_eq!(e1, e2);
            assert!((s1.weight - s2.weight).abs() < 1e-12);
            assert!((s1.pheromone - s2.pheromone).abs() < 1e-12);
        }
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let mut snapshot = GraphSnapshot::default();
        snapshot.weights.insert("1,2".into(), -0.5);
        snapshot.pheromones.insert("1,2".into(), 1.0);
        let err = AssociativeGraph::from_snapshot(&snapshot, GraphConfig::default()).unwrap_err();
        assert!(err.is_invariant_violation());

        let mut snapshot = GraphSnapshot::default();
        snapshot.weights.insert("1-2".into(), 0.5);
        let err = AssociativeGraph::from_snapshot(&snapshot, GraphConfig::default()).unwrap_err();
        assert!(matches!(err, SymbioError::Graph(GraphError::MalformedEdgeKey(_))));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: GraphConfig = serde_json::from_str(r#"{"a_plus": 0.2}"#).unwrap();
        assert_eq!(config.a_plus, 0.2);
        assert_eq!(config.a_minus, 0.05);
        assert_eq!(config.rng_seed, 7);
    }

    proptest! {
        #[test]
        fn clamped_updates_never_go_negative(
            updates in prop::collection::vec((0u32..6, 0u32..6, -2.0f64..2.0, -2.0f64..2.0), 1..64)
        ) {
            let mut g = AssociativeGraph::new();
            for (a, b, pre, post) in updates {
                g.update_edge(Edge::new(a, b), pre, post);
            }
            for (_, s) in g.edges() {
                prop_assert!(s.weight >= 0.0);
                prop_assert!(s.pheromone >= 0.0);
            }
            prop_assert!(g.validate().is_ok());
        }

        #[test]
        fn top_k_is_a_sorted_prefix(
            amounts in prop::collection::vec(0.0f64..5.0, 1..12),
            k in 0usize..16,
        ) {
            let mut g = AssociativeGraph::new();
            for (i, amount) in amounts.iter().enumerate() {
                g.reinforce(&[0, i as u32 + 1], *amount).unwrap();
            }
            let top = g.top_k_successors(0, k);
            prop_assert!(top.len() <= k);
            prop_assert_eq!(top.len(), k.min(amounts.len()));
            let scores: Vec<f64> = top
                .iter()
                .map(|&b| g.synapse(Edge::new(0, b)).unwrap().strength())
                .collect();
            for w in scores.windows(2) {
                prop_assert!(w[0] >= w[1]);
            }
        }
    }
}
