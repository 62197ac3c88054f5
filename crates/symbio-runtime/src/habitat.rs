//! Habitat - the field and the swarm that lives on it.
//!
//! The habitat exclusively owns both halves and remembers the strongest
//! activation it has ever seen. That best value only grows.

use crate::config::{FieldConfig, SwarmConfig};
use crate::swarm::Swarm;
use symbio_core::error::Result;
use symbio_core::field::ScalarField;
use symbio_core::types::*;
use tracing::trace;

/// Fraction of the best cell's value added around it by [`Habitat::polish`].
const POLISH_GAIN: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct Habitat {
    field: ScalarField,
    swarm: Swarm,
    config: FieldConfig,
    best_pos: Option<Coord>,
    best_val: f64,
}

impl Habitat {
    pub fn new(field_config: FieldConfig, swarm_config: &SwarmConfig) -> Result<Self> {
        field_config.validate()?;
        swarm_config.validate()?;
        let shape = field_config.shape();
        let field = ScalarField::new(shape)?;
        let swarm = Swarm::new(shape, swarm_config.n_agents, swarm_config.boundary, swarm_config.seed)?
            .with_battery_drain(swarm_config.battery_drain);
        Ok(Self {
            field,
            swarm,
            config: field_config,
            best_pos: None,
            best_val: f64::NEG_INFINITY,
        })
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn shape(&self) -> FieldShape {
        self.field.shape()
    }

    pub fn best_pos(&self) -> Option<Coord> {
        self.best_pos
    }

    /// Best activation observed after any step, `-inf` before the first.
    pub fn best_val(&self) -> f64 {
        self.best_val
    }

    pub fn inject_pulses(&mut self, pulses: &[Pulse]) {
        for pulse in pulses {
            self.field.inject_gaussian(pulse);
        }
    }

    /// Step the swarm, then update the best activation from the whole field.
    pub fn step(&mut self) -> StepMetrics {
        let swarm = self.swarm.step(&mut self.field, 1.0);
        if let Some((pos, val)) = self.field.max_cell() {
            if val > self.best_val {
                trace!(?pos, val, "New best activation");
                self.best_pos = Some(pos);
                self.best_val = val;
            }
        }
        StepMetrics {
            swarm,
            best_pos: self.best_pos,
            best_val: self.best_val,
        }
    }

    pub fn relax_and_evaporate(&mut self) {
        self.field.relax(self.config.relax_alpha);
        self.field.evaporate(self.config.evaporate_rate);
    }

    pub fn hotspots(&self, threshold: f64) -> Vec<Hotspot> {
        self.field.hotspots(threshold)
    }

    /// Raise the square neighbourhood of the best cell by 5 % of its current value.
    ///
    /// No-op before the first step.
    pub fn polish(&mut self, radius: usize) {
        let Some((y, x)) = self.best_pos else {
            return;
        };
        let FieldShape { height, width } = self.field.shape();
        let (y, x) = (y as usize, x as usize);
        let boost = self.field.value(y, x) * POLISH_GAIN;
        for yy in y.saturating_sub(radius)..(y + radius + 1).min(height) {
            for xx in x.saturating_sub(radius)..(x + radius + 1).min(width) {
                self.field.add(yy, xx, boost);
            }
        }
    }
}
