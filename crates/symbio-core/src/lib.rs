//! # Symbio Core
//!
//! State holders and shared types for the symbiotic event loop.
//!
//! The loop couples a generative token model to a spatial simulation.
//! This crate defines the pieces that carry state between ticks:
//!
//! - **ScalarField** - 2-D activation grid with per-cell source tags (diffusion, decay, pulses)
//! - **AssociativeGraph** - directed token graph with Hebbian weights and pheromone trails
//! - **NeuromodulatorState** - reward-, surprise- and attention-like global biases
//! - **Event** - the tagged union drained by the orchestrator every tick
//! - **Cortex** - the seam to the generation side (bridge, feedback, harvest)
//!
//! The swarm, the field facade and the orchestrator live in `symbio-runtime`.
//!
//! ## Quick Start
//!
//! ```rust
//! use symbio_core::prelude::*;
//!
//! let mut field = ScalarField::new(FieldShape::new(8, 8)).unwrap();
//! field.inject_gaussian(&Pulse::new((4, 4), 1.0, 1.5, "seed"));
//! assert!(!field.hotspots(0.5).is_empty());
//! ```

pub mod types;
pub mod error;
pub mod field;
pub mod graph;
pub mod neuromod;
pub mod event;
pub mod cortex;
pub mod prelude;
