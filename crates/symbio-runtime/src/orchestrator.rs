//! Orchestrator - the discrete-event loop coupling habitat and cortex.
//!
//! Each external tick:
//! 1. A `Tick` event (and, every `decay_every` steps, a `Decay` event) is queued
//! 2. The queue is drained front to back; events emitted while dispatching
//!    are appended to the back
//! 3. The next tick is queued only once the queue is empty
//!
//! The orchestrator owns the habitat and borrows the cortex exclusively for
//! its lifetime, so every mutation of field, graph and neuromodulators goes
//! through `dispatch`. It draws no random numbers itself.

use crate::config::{ScheduleConfig, SymbioConfig};
use crate::feedback::apply_feedback;
use crate::habitat::Habitat;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use symbio_core::cortex::Cortex;
use symbio_core::error::Result;
use symbio_core::event::Event;
use symbio_core::types::{Coord, HotspotSnapshot, Tick};
use tracing::{debug, info, warn};

/// Tags kept per hotspot in a cycle report.
const SNAPSHOT_TAGS: usize = 5;

/// Outcome of [`Orchestrator::run_episode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Events dispatched during this episode.
    pub events: usize,
    pub best_pos: Option<Coord>,
    pub best_val: f64,
    /// Graph edges reinforced by feedback during this episode.
    pub reinforcements: usize,
}

/// Outcome of [`Orchestrator::autopoietic_cycle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub sentences: Vec<String>,
    pub hotspots: Vec<HotspotSnapshot>,
}

pub struct Orchestrator<'c, C: Cortex + ?Sized> {
    cortex: &'c mut C,
    habitat: Habitat,
    schedule: ScheduleConfig,
    event_log: Vec<Event>,
    reinforcements: usize,
}

impl<'c, C: Cortex + ?Sized> Orchestrator<'c, C> {
    pub fn new(cortex: &'c mut C, habitat: Habitat, schedule: ScheduleConfig) -> Self {
        Self {
            cortex,
            habitat,
            schedule,
            event_log: Vec::new(),
            reinforcements: 0,
        }
    }

    /// Validate `config` and build a fresh habitat from it.
    pub fn from_config(cortex: &'c mut C, config: &SymbioConfig) -> Result<Self> {
        config.validate()?;
        let habitat = Habitat::new(config.field.clone(), &config.swarm)?;
        Ok(Self::new(cortex, habitat, config.schedule.clone()))
    }

    pub fn habitat(&self) -> &Habitat {
        &self.habitat
    }

    pub fn habitat_mut(&mut self) -> &mut Habitat {
        &mut self.habitat
    }

    pub fn cortex(&self) -> &C {
        &*self.cortex
    }

    /// Every event dispatched so far, in dispatch order.
    pub fn event_log(&self) -> &[Event] {
        &self.event_log
    }

    /// Total feedback reinforcements applied so far.
    pub fn reinforcements(&self) -> usize {
        self.reinforcements
    }

    /// Handle one event and return the events it produces.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Event>> {
        debug!(event = %event, "Dispatching event");
        let emitted = match &event {
            Event::Pulse { pulses } => {
                self.habitat.inject_pulses(pulses);
                vec![]
            }
            Event::Tick { .. } => {
                let metrics = self.habitat.step();
                self.habitat.relax_and_evaporate();
                let hotspots = self.habitat.hotspots(self.habitat.config().hotspot_threshold);
                if hotspots.is_empty() {
                    vec![]
                } else {
                    vec![Event::feedback(hotspots, metrics)]
                }
            }
            Event::Feedback { hotspots, .. } => {
                match apply_feedback(&mut *self.cortex, hotspots, self.schedule.reward_gain) {
                    Ok(report) => self.reinforcements += report.count(),
                    Err(e) => warn!(error = %e, "Feedback failed, dropping"),
                }
                vec![]
            }
            Event::Decay { rate } => {
                self.cortex.graph_mut().evaporate(*rate);
                self.cortex.neuromod_mut().decay(self.schedule.neuromod_decay);
                vec![]
            }
            Event::Unknown => {
                warn!("Unknown event kind, dropping");
                vec![]
            }
        };
        self.event_log.push(event);
        Ok(emitted)
    }

    /// Dispatch until the queue is empty. Returns the number of events handled.
    fn drain(&mut self, queue: &mut VecDeque<Event>) -> Result<usize> {
        let mut handled = 0;
        while let Some(event) = queue.pop_front() {
            queue.extend(self.dispatch(event)?);
            handled += 1;
        }
        Ok(handled)
    }

    /// Queue the tick schedule for `steps` steps, draining after each.
    fn run_schedule(&mut self, mut queue: VecDeque<Event>, steps: Tick) -> Result<usize> {
        let mut handled = 0;
        for step in 0..steps {
            queue.push_back(Event::tick(step));
            if self.schedule.decay_every > 0 && step % self.schedule.decay_every == 0 {
                queue.push_back(Event::decay(self.schedule.decay_rate));
            }
            handled += self.drain(&mut queue)?;
        }
        // seeded events when steps == 0
        handled += self.drain(&mut queue)?;
        Ok(handled)
    }

    /// Inject `prompt` and run `steps` ticks.
    pub fn run_episode(&mut self, prompt: &str, steps: Tick) -> Result<EpisodeSummary> {
        let reinforced_before = self.reinforcements;
        let pulses = self.cortex.text_to_pulses(prompt, self.habitat.shape());
        let queue = VecDeque::from([Event::pulse(pulses)]);
        let events = self.run_schedule(queue, steps)?;

        let summary = EpisodeSummary {
            events,
            best_pos: self.habitat.best_pos(),
            best_val: self.habitat.best_val(),
            reinforcements: self.reinforcements - reinforced_before,
        };
        info!(
            events = summary.events,
            best_val = summary.best_val,
            reinforcements = summary.reinforcements,
            "Episode complete"
        );
        Ok(summary)
    }

    /// Inject every non-blank text, run `steps` ticks, then harvest sentences
    /// from the hotspots at or above `threshold`.
    pub fn autopoietic_cycle<S: AsRef<str>>(
        &mut self,
        texts: &[S],
        steps: Tick,
        threshold: f64,
        max_sentences: usize,
    ) -> Result<CycleReport> {
        let shape = self.habitat.shape();
        let mut queue = VecDeque::new();
        for text in texts {
            let text = text.as_ref();
            if !text.trim().is_empty() {
                queue.push_back(Event::pulse(self.cortex.text_to_pulses(text, shape)));
            }
        }
        self.run_schedule(queue, steps)?;

        let hotspots = self.habitat.hotspots(threshold);
        let sentences = self.cortex.synthesize_thoughts(&hotspots, max_sentences);
        info!(
            hotspots = hotspots.len(),
            sentences = sentences.len(),
            "Autopoietic cycle complete"
        );
        Ok(CycleReport {
            sentences,
            hotspots: hotspots.iter().map(|h| h.snapshot(SNAPSHOT_TAGS)).collect(),
        })
    }
}
