//! Neuromodulator state - global scalar biases that decay toward baseline.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Baseline every modulator relaxes toward.
pub const BASELINE: f64 = 1.0;

/// Lower bound for reward and surprise updates.
pub const MIN_LEVEL: f64 = 0.1;

/// Upper bound for reward and surprise updates.
pub const MAX_LEVEL: f64 = 5.0;

/// Reward-, surprise- and attention-like biases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuromodulatorState {
    pub dopamine: f64,
    pub serotonin: f64,
    pub acetylcholine: f64,
}

impl Default for NeuromodulatorState {
    fn default() -> Self {
        Self {
            dopamine: BASELINE,
            serotonin: BASELINE,
            acetylcholine: BASELINE,
        }
    }
}

impl NeuromodulatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift dopamine by a reward, clamped to `[0.1, 5.0]`.
    pub fn apply_reward(&mut self, value: f64) {
        self.dopamine = (self.dopamine + value).clamp(MIN_LEVEL, MAX_LEVEL);
        debug!(dopamine = self.dopamine, "Dopamine updated");
    }

    /// Shift serotonin by a surprise signal, clamped to `[0.1, 5.0]`.
    pub fn apply_surprise(&mut self, value: f64) {
        self.serotonin = (self.serotonin + value).clamp(MIN_LEVEL, MAX_LEVEL);
        debug!(serotonin = self.serotonin, "Serotonin updated");
    }

    /// Move all three modulators toward baseline by `rate`.
    pub fn decay(&mut self, rate: f64) {
        for level in [
            &mut self.dopamine,
            &mut self.serotonin,
            &mut self.acetylcholine,
        ] {
            *level += (BASELINE - *level) * rate;
        }
        debug!(
            dopamine = self.dopamine,
            serotonin = self.serotonin,
            acetylcholine = self.acetylcholine,
            "Neuromodulators decayed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_baseline() {
        let state = NeuromodulatorState::new();
        assert_eq!(state.dopamine, 1.0);
        assert_eq!(state.serotonin, 1.0);
        assert_eq!(state.acetylcholine, 1.0);
    }

    #[test]
    fn reward_and_surprise_are_clamped() {
        let mut state = NeuromodulatorState::new();
        state.apply_reward(10.0);
        assert_eq!(state.dopamine, 5.0);
        state.apply_reward(-10.0);
        assert_eq!(state.dopamine, 0.1);
        state.apply_surprise(-3.0);
        assert_eq!(state.serotonin, 0.1);
        assert_eq!(state.acetylcholine, 1.0);
    }

    #[test]
    fn full_decay_returns_to_baseline() {
        let mut state = NeuromodulatorState::new();
        state.apply_reward(2.0);
        state.apply_surprise(-0.5);
        state.decay(1.0);
        assert_eq!(state, NeuromodulatorState::default());
    }

    #[test]
    fn partial_decay_moves_toward_baseline() {
        let mut state = NeuromodulatorState::new();
        state.apply_reward(1.0);
        state.decay(0.5);
        assert!((state.dopamine - 1.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn zero_rate_decay_is_idempotent(reward in -6.0f64..6.0, surprise in -6.0f64..6.0) {
            let mut state = NeuromodulatorState::new();
            state.apply_reward(reward);
            state.apply_surprise(surprise);
            let before = state;
            state.decay(0.0);
            prop_assert_eq!(state, before);
        }
    }
}
