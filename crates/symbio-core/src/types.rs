//! Shared types used across the field, the graph, the swarm and the event loop.

use crate::error::{ConfigError, GraphError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a token in the vocabulary. Nodes of the associative graph.
pub type TokenId = u32;

/// Step counter of the event loop.
pub type Tick = u64;

/// Integer grid coordinate as `(row, column)`.
pub type Coord = (i64, i64);

/// Continuous position as `(row, column)`.
pub type Point = (f64, f64);

/// Per-cell decomposition of activation by contributing source tag.
pub type TagMap = BTreeMap<String, f64>;

/// Grid dimensions of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldShape {
    pub height: usize,
    pub width: usize,
}

impl FieldShape {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.height * self.width
    }

    /// Whether a signed coordinate lies on the grid.
    pub fn contains(&self, (y, x): Coord) -> bool {
        y >= 0 && x >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// A localized gaussian perturbation injected into the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub position: Coord,
    pub amplitude: f64,
    pub spread: f64,
    /// Semantic source of the pulse (a concept name or `agent:<role>`).
    pub tag: String,
}

impl Pulse {
    pub fn new(position: Coord, amplitude: f64, spread: f64, tag: impl Into<String>) -> Self {
        Self {
            position,
            amplitude,
            spread,
            tag: tag.into(),
        }
    }
}

/// A field cell whose activation reached a threshold, with its tag breakdown.
///
/// Snapshot taken at one instant; never written back to the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub position: Coord,
    pub value: f64,
    pub tags: TagMap,
}

impl Hotspot {
    /// The `k` strongest tags, descending by contribution.
    ///
    /// Equal contributions keep lexical tag order.
    pub fn top_tags(&self, k: usize) -> Vec<(&str, f64)> {
        let mut tags: Vec<(&str, f64)> = self.tags.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        tags.truncate(k);
        tags
    }

    /// Serializable view with only the `top_k` strongest tags.
    pub fn snapshot(&self, top_k: usize) -> HotspotSnapshot {
        HotspotSnapshot {
            position: self.position,
            value: self.value,
            tags: self
                .top_tags(top_k)
                .into_iter()
                .map(|(t, v)| (t.to_string(), v))
                .collect(),
        }
    }
}

/// Serializable hotspot summary returned by the autopoietic cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotSnapshot {
    pub position: Coord,
    pub value: f64,
    pub tags: Vec<(String, f64)>,
}

/// Directed edge key `(a, b)` of the associative graph.
///
/// Renders and parses as `"a,b"`, the key format of persisted graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub a: TokenId,
    pub b: TokenId,
}

impl Edge {
    pub fn new(a: TokenId, b: TokenId) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.a, self.b)
    }
}

impl FromStr for Edge {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GraphError::MalformedEdgeKey(s.to_string());
        let (a, b) = s.split_once(',').ok_or_else(malformed)?;
        let a = a.trim().parse().map_err(|_| malformed())?;
        let b = b.trim().parse().map_err(|_| malformed())?;
        Ok(Edge { a, b })
    }
}

/// An abstract concept extracted from text, before it becomes a pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    /// Relative frequency in the source text.
    pub strength: f64,
    /// Pheromone on the concept's strongest outgoing edge.
    pub pheromone: f64,
}

/// Behavioural role of a swarm agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Generalist,
    Scout,
    Harvester,
}

impl Role {
    /// Round-robin assignment order.
    pub const ALL: [Role; 3] = [Role::Generalist, Role::Scout, Role::Harvester];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Generalist => "generalist",
            Role::Scout => "scout",
            Role::Harvester => "harvester",
        }
    }

    /// Tag used for this role's field deposits.
    pub fn tag(&self) -> String {
        format!("agent:{}", self.as_str())
    }

    /// Force coefficients fixed by the role.
    pub fn params(&self) -> RoleParams {
        match self {
            Role::Generalist => RoleParams::new(0.6, 0.4, 0.3, 2.5),
            Role::Scout => RoleParams::new(0.9, 0.2, 0.2, 1.5),
            Role::Harvester => RoleParams::new(0.3, 0.6, 0.4, 3.0),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Force coefficients of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleParams {
    pub curiosity: f64,
    pub cohesion: f64,
    pub avoidance: f64,
    pub deposit_sigma: f64,
}

impl RoleParams {
    pub fn new(curiosity: f64, cohesion: f64, avoidance: f64, deposit_sigma: f64) -> Self {
        Self {
            curiosity,
            cohesion,
            avoidance,
            deposit_sigma,
        }
    }
}

/// How agent positions are brought back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Fold across the near or far edge.
    #[default]
    Reflect,
    /// Wrap around (torus).
    Periodic,
    /// Hard clamp to `[0, extent - 1]`.
    Clamp,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Reflect => "reflect",
            BoundaryPolicy::Periodic => "periodic",
            BoundaryPolicy::Clamp => "clamp",
        }
    }

    /// Map a continuous position back onto a grid of the given shape.
    ///
    /// `Reflect` folds once: a coordinate at `extent` lands on `extent - 2`.
    pub fn wrap(&self, (y, x): Point, shape: FieldShape) -> Point {
        let h = shape.height as f64;
        let w = shape.width as f64;
        match self {
            BoundaryPolicy::Reflect => (reflect(y, h), reflect(x, w)),
            BoundaryPolicy::Periodic => (y.rem_euclid(h), x.rem_euclid(w)),
            BoundaryPolicy::Clamp => (y.clamp(0.0, h - 1.0), x.clamp(0.0, w - 1.0)),
        }
    }
}

fn reflect(mut c: f64, extent: f64) -> f64 {
    if c < 0.0 {
        c = -c;
    }
    if c >= extent {
        c = 2.0 * (extent - 1.0) - c;
    }
    c
}

impl FromStr for BoundaryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflect" => Ok(BoundaryPolicy::Reflect),
            "periodic" => Ok(BoundaryPolicy::Periodic),
            "clamp" => Ok(BoundaryPolicy::Clamp),
            _ => Err(ConfigError::UnknownBoundary(s.to_string())),
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent's position after a swarm step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub position: Point,
    pub role: Role,
}

/// Per-step swarm metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwarmMetrics {
    pub trails: Vec<Trail>,
    pub centroid: Point,
    pub mean_battery: f64,
}

/// Swarm metrics plus the best activation observed so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    pub swarm: SwarmMetrics,
    pub best_pos: Option<Coord>,
    pub best_val: f64,
}
