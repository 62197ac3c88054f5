//! # Symbio Runtime
//!
//! The moving parts of the symbiotic event loop.
//!
//! The runtime owns the habitat (a scalar field plus the swarm living on it)
//! and drives it with an event-driven orchestrator. A cortex is borrowed for
//! the length of a run: hotspots reinforce its associative graph and reward
//! its neuromodulators, and at the end of a cycle the strongest hotspots are
//! harvested back into text.
//!
//! `BioCortex` is the default cortex: a word vocabulary over the associative
//! graph, with a replay buffer and a graph-following sampler.

pub mod config;
pub mod swarm;
pub mod habitat;
pub mod feedback;
pub mod orchestrator;
pub mod replay;
pub mod vocab;
pub mod biocortex;
pub mod bridge;
pub mod autopoiesis;
pub mod session;
pub mod prelude;
