//! Feedback from the field to the cortex.
//!
//! Each hotspot reinforces the graph's single highest-pheromone edge, so
//! strong field activity deepens the trail that is already strongest.

use serde::{Deserialize, Serialize};
use symbio_core::cortex::Cortex;
use symbio_core::error::Result;
use symbio_core::field::ScalarField;
use symbio_core::types::{Edge, Hotspot};
use tracing::{debug, warn};

/// Reinforcements applied for one batch of hotspots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub reinforcements: Vec<(Edge, f64)>,
}

impl FeedbackReport {
    pub fn count(&self) -> usize {
        self.reinforcements.len()
    }
}

pub fn detect_hotspots(field: &ScalarField, threshold: f64) -> Vec<Hotspot> {
    field.hotspots(threshold)
}

/// Reinforce, replay and reward once per hotspot, in order.
///
/// The strongest edge is re-ranked before every hotspot. Amount is
/// `value · (1 + dopamine)`; reward is `value · reward_gain`. Hotspots are
/// skipped while the graph has no edges, and a hotspot whose amount is
/// negative or non-finite is skipped without touching graph, replay or
/// neuromodulators.
pub fn apply_feedback<C>(cortex: &mut C, hotspots: &[Hotspot], reward_gain: f64) -> Result<FeedbackReport>
where
    C: Cortex + ?Sized,
{
    let mut report = FeedbackReport::default();
    for hotspot in hotspots {
        let Some(edge) = cortex.graph().strongest_pheromone_edge() else {
            continue;
        };
        let amount = hotspot.value * (1.0 + cortex.neuromod().dopamine);
        if !amount.is_finite() || amount < 0.0 {
            warn!(position = ?hotspot.position, amount, "Skipping hotspot with invalid reinforcement");
            continue;
        }
        cortex.graph_mut().reinforce(&[edge.a, edge.b], amount)?;
        cortex.record_replay(&[edge.a, edge.b]);
        cortex.neuromod_mut().apply_reward(hotspot.value * reward_gain);
        report.reinforcements.push((edge, amount));
    }
    debug!(count = report.count(), "Feedback applied");
    Ok(report)
}
