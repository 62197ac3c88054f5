//! Run configuration.
//!
//! Every section deserializes with per-field defaults, so a partial TOML or
//! JSON document fills in the rest. `validate` rejects values the loop
//! cannot run with; nothing is clamped silently.

use serde::{Deserialize, Serialize};
use symbio_core::error::{ConfigError, Result, SymbioError};
use symbio_core::graph::GraphConfig;
use symbio_core::types::{BoundaryPolicy, FieldShape};

/// Complete configuration of one loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbioConfig {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub swarm: SwarmConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub cortex: CortexConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_width")]
    pub width: usize,
    /// Diffusion rate per tick.
    #[serde(default = "default_relax_alpha")]
    pub relax_alpha: f64,
    /// Evaporation rate per tick.
    #[serde(default = "default_evaporate_rate")]
    pub evaporate_rate: f64,
    /// Activation at which a cell counts as a hotspot after a tick.
    #[serde(default = "default_hotspot_threshold")]
    pub hotspot_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    #[serde(default = "default_n_agents")]
    pub n_agents: usize,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    /// Seeds placement and per-agent jitter.
    #[serde(default = "default_swarm_seed")]
    pub seed: u64,
    #[serde(default = "default_battery_drain")]
    pub battery_drain: f64,
}

/// Settings of the default cortex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CortexConfig {
    #[serde(default = "default_replay_capacity")]
    pub replay_capacity: usize,
    /// Concepts kept per text.
    #[serde(default = "default_concept_top_k")]
    pub concept_top_k: usize,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,
    /// Hotspot tags that make up a synthesis prompt.
    #[serde(default = "default_top_k_tags")]
    pub top_k_tags: usize,
    /// Successors considered per sampling step.
    #[serde(default = "default_sampler_top_k")]
    pub sampler_top_k: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_cortex_seed")]
    pub seed: u64,
}

/// Tick schedule and feedback gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// A decay event joins every tick whose step is a multiple of this.
    #[serde(default = "default_decay_every")]
    pub decay_every: u64,
    /// Graph evaporation rate of scheduled decay events.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Neuromodulator decay rate applied with every decay event.
    #[serde(default = "default_neuromod_decay")]
    pub neuromod_decay: f64,
    /// Reward per unit of hotspot value.
    #[serde(default = "default_reward_gain")]
    pub reward_gain: f64,
}

// Default value functions
fn default_height() -> usize { 64 }
fn default_width() -> usize { 64 }
fn default_relax_alpha() -> f64 { 0.1 }
fn default_evaporate_rate() -> f64 { 0.01 }
fn default_hotspot_threshold() -> f64 { 0.6 }
fn default_n_agents() -> usize { 16 }
fn default_swarm_seed() -> u64 { 13 }
fn default_battery_drain() -> f64 { 0.01 }
fn default_replay_capacity() -> usize { 64 }
fn default_concept_top_k() -> usize { 8 }
fn default_max_new_tokens() -> usize { 48 }
fn default_top_k_tags() -> usize { 3 }
fn default_sampler_top_k() -> usize { 5 }
fn default_temperature() -> f64 { 1.0 }
fn default_cortex_seed() -> u64 { 1234 }
fn default_decay_every() -> u64 { 10 }
fn default_decay_rate() -> f64 { 0.05 }
fn default_neuromod_decay() -> f64 { 0.01 }
fn default_reward_gain() -> f64 { 0.1 }

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            width: default_width(),
            relax_alpha: default_relax_alpha(),
            evaporate_rate: default_evaporate_rate(),
            hotspot_threshold: default_hotspot_threshold(),
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            n_agents: default_n_agents(),
            boundary: BoundaryPolicy::default(),
            seed: default_swarm_seed(),
            battery_drain: default_battery_drain(),
        }
    }
}

impl Default for CortexConfig {
    fn default() -> Self {
        Self {
            replay_capacity: default_replay_capacity(),
            concept_top_k: default_concept_top_k(),
            max_new_tokens: default_max_new_tokens(),
            top_k_tags: default_top_k_tags(),
            sampler_top_k: default_sampler_top_k(),
            temperature: default_temperature(),
            seed: default_cortex_seed(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            decay_every: default_decay_every(),
            decay_rate: default_decay_rate(),
            neuromod_decay: default_neuromod_decay(),
            reward_gain: default_reward_gain(),
        }
    }
}

impl FieldConfig {
    pub fn shape(&self) -> FieldShape {
        FieldShape::new(self.height, self.width)
    }

    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(SymbioError::invalid_config(
                "field.shape",
                self.shape(),
                "dimensions must be positive",
            ));
        }
        unit_interval("field.relax_alpha", self.relax_alpha)?;
        unit_interval("field.evaporate_rate", self.evaporate_rate)?;
        non_negative("field.hotspot_threshold", self.hotspot_threshold)
    }
}

impl SwarmConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_agents == 0 {
            return Err(SymbioError::invalid_config(
                "swarm.n_agents",
                self.n_agents,
                "must be positive",
            ));
        }
        unit_interval("swarm.battery_drain", self.battery_drain)
    }
}

impl CortexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.replay_capacity == 0 {
            return Err(SymbioError::invalid_config(
                "cortex.replay_capacity",
                self.replay_capacity,
                "must be positive",
            ));
        }
        if !(self.temperature > 0.0) {
            return Err(SymbioError::invalid_config(
                "cortex.temperature",
                self.temperature,
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.decay_every == 0 {
            return Err(SymbioError::invalid_config(
                "schedule.decay_every",
                self.decay_every,
                "must be positive",
            ));
        }
        unit_interval("schedule.decay_rate", self.decay_rate)?;
        unit_interval("schedule.neuromod_decay", self.neuromod_decay)?;
        non_negative("schedule.reward_gain", self.reward_gain)
    }
}

impl SymbioConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;
        self.swarm.validate()?;
        self.cortex.validate()?;
        self.schedule.validate()?;
        for (name, value) in [
            ("graph.a_plus", self.graph.a_plus),
            ("graph.a_minus", self.graph.a_minus),
            ("graph.decay", self.graph.decay),
        ] {
            non_negative(name, value)?;
        }
        Ok(())
    }
}

fn unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SymbioError::out_of_range(field, 0.0, 1.0, value))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must not be negative".to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SymbioConfig::default();
        assert_eq!(config.field.shape(), FieldShape::new(64, 64));
        assert_eq!(config.field.hotspot_threshold, 0.6);
        assert_eq!(config.swarm.n_agents, 16);
        assert_eq!(config.swarm.boundary, BoundaryPolicy::Reflect);
        assert_eq!(config.swarm.seed, 13);
        assert_eq!(config.graph.rng_seed, 7);
        assert_eq!(config.schedule.decay_every, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config: SymbioConfig = serde_json::from_str(
            r#"{"field": {"height": 12, "width": 12}, "swarm": {"boundary": "periodic"}}"#,
        )
        .unwrap();
        assert_eq!(config.field.shape(), FieldShape::new(12, 12));
        assert_eq!(config.field.relax_alpha, 0.1);
        assert_eq!(config.swarm.boundary, BoundaryPolicy::Periodic);
        assert_eq!(config.swarm.n_agents, 16);
    }

    #[test]
    fn unknown_boundary_fails_to_decode() {
        let result: std::result::Result<SwarmConfig, _> =
            serde_json::from_str(r#"{"boundary": "torus"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = SymbioConfig::default();
        config.swarm.n_agents = 0;
        assert!(matches!(config.validate(), Err(SymbioError::Config(_))));

        let mut config = SymbioConfig::default();
        config.field.width = 0;
        assert!(config.validate().is_err());

        let mut config = SymbioConfig::default();
        config.field.evaporate_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(SymbioError::Config(ConfigError::OutOfRange { .. }))
        ));

        let mut config = SymbioConfig::default();
        config.schedule.decay_every = 0;
        assert!(config.validate().is_err());
    }
}
