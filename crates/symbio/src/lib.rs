//! # Symbio
//!
//! A symbiotic event loop: text becomes pulses in a diffusing field, a swarm
//! explores the field, and the hotspots it finds reinforce the token graph
//! that produced the text.
//!
//! ## Quick Start
//!
//! ```rust
//! use symbio::prelude::*;
//!
//! let config = SymbioConfig {
//!     field: FieldConfig { height: 12, width: 12, ..Default::default() },
//!     swarm: SwarmConfig { n_agents: 3, seed: 2, ..Default::default() },
//!     ..Default::default()
//! };
//!
//! // Teach the default cortex a little text
//! let mut cortex = BioCortex::new(config.cortex.clone(), config.graph.clone());
//! cortex.fit(&["the mycelium links roots to roots"]);
//!
//! // Run an episode over a prompt
//! let mut orchestrator = Orchestrator::from_config(&mut cortex, &config).unwrap();
//! let summary = orchestrator.run_episode("mycelium roots", 15).unwrap();
//! assert!(summary.events > 0);
//! ```
//!
//! ## Architecture
//!
//! Symbio is organized into two library crates:
//!
//! - [`symbio_core`] - Field, associative graph, neuromodulators, events, the `Cortex` trait
//! - [`symbio_runtime`] - Swarm, habitat, orchestrator, default cortex, persistence
//!
//! ## The Loop
//!
//! | Event | Effect | Emits |
//! |-------|--------|-------|
//! | Pulse | Inject gaussians into the field | nothing |
//! | Tick | Swarm step, relax, evaporate, scan hotspots | one Feedback if any hotspot |
//! | Feedback | Reinforce the strongest pheromone edge per hotspot | nothing |
//! | Decay | Evaporate the graph, relax neuromodulators | nothing |
//!
//! Every tick is drained to quiescence before the next one is queued, and
//! every random draw comes from an explicit seed, so runs are reproducible.
//!
//! ## Session Persistence
//!
//! ```rust,ignore
//! use symbio::prelude::*;
//! use std::path::Path;
//!
//! save_cortex(&cortex, Path::new(".symbio/model")).unwrap();
//! let cortex = load_cortex(Path::new(".symbio/model"), CortexConfig::default(), GraphConfig::default()).unwrap();
//! ```

// Re-export all subcrates
pub use symbio_core as core;
pub use symbio_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use symbio::prelude::*;
/// ```
pub mod prelude {
    pub use symbio_runtime::prelude::*;
}
