//! Swarm - role-parameterized agents climbing the field gradient.
//!
//! Each step an agent is pushed by three forces: curiosity along the local
//! gradient, cohesion toward the population centroid, and avoidance of
//! close neighbours. After moving it deposits a gaussian back into the
//! field, so the swarm both reads and writes the shared activation.
//!
//! All randomness is derived from one swarm seed. Placement draws from a
//! single generator; the jitter of agent `i` is drawn from a generator
//! seeded with `seed + i`, re-created every step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use symbio_core::error::{Result, SymbioError};
use symbio_core::field::ScalarField;
use symbio_core::types::*;
use tracing::debug;

/// Velocity carried over between steps.
const MOMENTUM: f64 = 0.5;

/// Squared distance under which agents push each other apart.
const AVOIDANCE_RADIUS2: f64 = 4.0;

/// Half-width of the per-axis jitter.
const JITTER: f64 = 0.05;

/// One swarm member.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Point,
    pub velocity: Point,
    pub role: Role,
    pub battery: f64,
    pub params: RoleParams,
}

impl Agent {
    pub fn new(position: Point, role: Role) -> Self {
        Self {
            position,
            velocity: (0.0, 0.0),
            role,
            battery: 1.0,
            params: role.params(),
        }
    }

    fn drain(&mut self, amount: f64) {
        self.battery = (self.battery - amount).max(0.0);
    }
}

/// Fixed population of agents over a field of a given shape.
#[derive(Debug, Clone)]
pub struct Swarm {
    agents: Vec<Agent>,
    shape: FieldShape,
    boundary: BoundaryPolicy,
    seed: u64,
    battery_drain: f64,
}

impl Swarm {
    /// Place `n_agents` uniformly in `[0, h-1) × [0, w-1)`, roles round-robin.
    pub fn new(shape: FieldShape, n_agents: usize, boundary: BoundaryPolicy, seed: u64) -> Result<Self> {
        if shape.height == 0 || shape.width == 0 {
            return Err(SymbioError::invalid_config(
                "field.shape",
                shape,
                "dimensions must be positive",
            ));
        }
        if n_agents == 0 {
            return Err(SymbioError::invalid_config(
                "swarm.n_agents",
                n_agents,
                "must be positive",
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let h = (shape.height - 1) as f64;
        let w = (shape.width - 1) as f64;
        let agents = (0..n_agents)
            .map(|i| {
                let y = rng.gen::<f64>() * h;
                let x = rng.gen::<f64>() * w;
                Agent::new((y, x), Role::ALL[i % Role::ALL.len()])
            })
            .collect();

        Ok(Self {
            agents,
            shape,
            boundary,
            seed,
            battery_drain: 0.01,
        })
    }

    /// Battery lost per step.
    pub fn with_battery_drain(mut self, drain: f64) -> Self {
        self.battery_drain = drain;
        self
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn centroid(&self) -> Point {
        let n = self.agents.len() as f64;
        let (sy, sx) = self
            .agents
            .iter()
            .fold((0.0, 0.0), |(sy, sx), a| (sy + a.position.0, sx + a.position.1));
        (sy / n, sx / n)
    }

    /// Field value at a continuous position by bilinear interpolation.
    ///
    /// The lower corner is clamped onto the grid; the upper corner is clamped
    /// to the last row and column.
    pub fn bilinear_sample(field: &ScalarField, (y, x): Point) -> f64 {
        let shape = field.shape();
        let y0 = (y.floor() as i64).clamp(0, shape.height as i64 - 1) as usize;
        let x0 = (x.floor() as i64).clamp(0, shape.width as i64 - 1) as usize;
        let y1 = (y0 + 1).min(shape.height - 1);
        let x1 = (x0 + 1).min(shape.width - 1);
        let dy = y - y0 as f64;
        let dx = x - x0 as f64;
        field.value(y0, x0) * (1.0 - dy) * (1.0 - dx)
            + field.value(y1, x0) * dy * (1.0 - dx)
            + field.value(y0, x1) * (1.0 - dy) * dx
            + field.value(y1, x1) * dy * dx
    }

    /// Forward finite difference with unit offset, offsets wrapped by the boundary.
    pub fn gradient(&self, field: &ScalarField, position: Point) -> Point {
        let base = Self::bilinear_sample(field, position);
        let gy = Self::bilinear_sample(
            field,
            self.boundary.wrap((position.0 + 1.0, position.1), self.shape),
        );
        let gx = Self::bilinear_sample(
            field,
            self.boundary.wrap((position.0, position.1 + 1.0), self.shape),
        );
        (gy - base, gx - base)
    }

    /// Advance every agent once and deposit its trail into `field`.
    ///
    /// Agents move in order and each deposit lands before the next agent
    /// samples the field. The centroid is taken once, before anyone moves.
    pub fn step(&mut self, field: &mut ScalarField, dt: f64) -> SwarmMetrics {
        let centroid = self.centroid();
        let mut trails = Vec::with_capacity(self.agents.len());

        for idx in 0..self.agents.len() {
            let agent = &self.agents[idx];
            let params = agent.params;
            let (py, px) = agent.position;

            let grad = self.gradient(field, agent.position);
            let curiosity = (grad.0 * params.curiosity, grad.1 * params.curiosity);
            let cohesion = (
                (centroid.0 - py) * params.cohesion,
                (centroid.1 - px) * params.cohesion,
            );

            let mut avoidance = (0.0, 0.0);
            for (j, other) in self.agents.iter().enumerate() {
                if j == idx {
                    continue;
                }
                let delta = (py - other.position.0, px - other.position.1);
                let dist2 = delta.0 * delta.0 + delta.1 * delta.1;
                if dist2 < AVOIDANCE_RADIUS2 {
                    let scale = params.avoidance / dist2.max(1e-3);
                    avoidance.0 += delta.0 * scale;
                    avoidance.1 += delta.1 * scale;
                }
            }

            let mut jitter_rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(idx as u64));
            let jitter = (
                jitter_rng.gen_range(-JITTER..JITTER),
                jitter_rng.gen_range(-JITTER..JITTER),
            );

            let agent = &mut self.agents[idx];
            agent.velocity = (
                MOMENTUM * agent.velocity.0 + curiosity.0 + cohesion.0 + avoidance.0 + jitter.0,
                MOMENTUM * agent.velocity.1 + curiosity.1 + cohesion.1 + avoidance.1 + jitter.1,
            );
            agent.position = self.boundary.wrap(
                (py + agent.velocity.0 * dt, px + agent.velocity.1 * dt),
                self.shape,
            );
            agent.drain(self.battery_drain);

            let deposit = Pulse::new(
                (agent.position.0 as i64, agent.position.1 as i64),
                agent.battery,
                params.deposit_sigma,
                agent.role.tag(),
            );
            field.inject_gaussian(&deposit);
            trails.push(Trail {
                position: agent.position,
                role: agent.role,
            });
        }

        let mean_battery =
            self.agents.iter().map(|a| a.battery).sum::<f64>() / self.agents.len() as f64;
        debug!(agents = self.agents.len(), mean_battery, "Swarm stepped");

        SwarmMetrics {
            trails,
            centroid,
            mean_battery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(h: usize, w: usize) -> ScalarField {
        ScalarField::new(FieldShape::new(h, w)).unwrap()
    }

    #[test]
    fn zero_agents_is_a_config_error() {
        let err = Swarm::new(FieldShape::new(8, 8), 0, BoundaryPolicy::Reflect, 1).unwrap_err();
        assert!(matches!(err, SymbioError::Config(_)));
    }

    #[test]
    fn placement_is_seeded_and_roles_round_robin() {
        let shape = FieldShape::new(10, 10);
        let a = Swarm::new(shape, 5, BoundaryPolicy::Reflect, 3).unwrap();
        let b = Swarm::new(shape, 5, BoundaryPolicy::Reflect, 3).unwrap();
        assert_eq!(a.agents(), b.agents());
        let roles: Vec<Role> = a.agents().iter().map(|ag| ag.role).collect();
        assert_eq!(
            roles,
            vec![Role::Generalist, Role::Scout, Role::Harvester, Role::Generalist, Role::Scout]
        );
        for agent in a.agents() {
            assert!(agent.position.0 >= 0.0 && agent.position.0 < 9.0);
            assert!(agent.position.1 >= 0.0 && agent.position.1 < 9.0);
            assert_eq!(agent.battery, 1.0);
            assert_eq!(agent.velocity, (0.0, 0.0));
        }
    }

    #[test]
    fn bilinear_sample_interpolates_between_cells() {
        let mut f = field(2, 2);
        f.add(0, 1, 1.0);
        f.add(1, 1, 1.0);
        assert!((Swarm::bilinear_sample(&f, (0.5, 0.5)) - 0.5).abs() < 1e-12);
        assert_eq!(Swarm::bilinear_sample(&f, (0.0, 1.0)), 1.0);
    }

    #[test]
    fn gradient_points_uphill() {
        let mut f = field(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                f.add(y, x, x as f64);
            }
        }
        let swarm = Swarm::new(FieldShape::new(5, 5), 1, BoundaryPolicy::Clamp, 0).unwrap();
        let (gy, gx) = swarm.gradient(&f, (2.0, 2.0));
        assert_eq!(gy, 0.0);
        assert_eq!(gx, 1.0);
    }

    #[test]
    fn step_drains_battery_and_deposits() {
        let shape = FieldShape::new(12, 12);
        let mut f = field(12, 12);
        let mut swarm = Swarm::new(shape, 3, BoundaryPolicy::Periodic, 2).unwrap();
        let metrics = swarm.step(&mut f, 1.0);
        assert_eq!(metrics.trails.len(), 3);
        assert!((metrics.mean_battery - 0.99).abs() < 1e-12);
        assert!(f.total_energy() > 0.0);
        for trail in &metrics.trails {
            assert!(trail.position.0 >= 0.0 && trail.position.0 <= 12.0);
            assert!(trail.position.1 >= 0.0 && trail.position.1 <= 12.0);
        }
        let tagged = (0..12)
            .flat_map(|y| (0..12).map(move |x| (y, x)))
            .any(|(y, x)| f.tags(y, x).contains_key("agent:scout"));
        assert!(tagged);
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let shape = FieldShape::new(16, 16);
        let run = || {
            let mut f = field(16, 16);
            f.inject_gaussian(&Pulse::new((8, 8), 2.0, 3.0, "seed"));
            let mut swarm = Swarm::new(shape, 4, BoundaryPolicy::Reflect, 11).unwrap();
            for _ in 0..5 {
                swarm.step(&mut f, 1.0);
            }
            (swarm.agents().to_vec(), f.values().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn battery_never_goes_negative() {
        let shape = FieldShape::new(6, 6);
        let mut f = field(6, 6);
        let mut swarm = Swarm::new(shape, 2, BoundaryPolicy::Clamp, 5)
            .unwrap()
            .with_battery_drain(0.4);
        for _ in 0..4 {
            swarm.step(&mut f, 1.0);
        }
        assert!(swarm.agents().iter().all(|a| a.battery == 0.0));
    }
}
