//! Symbio Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use symbio_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    TokenId, Tick, Coord, Point, TagMap,
    FieldShape, Pulse, Hotspot, HotspotSnapshot,
    Edge, Concept,
    Role, RoleParams, BoundaryPolicy,
    Trail, SwarmMetrics, StepMetrics,
};

// Re-export the state holders
pub use crate::field::ScalarField;
pub use crate::graph::{AssociativeGraph, GraphConfig, GraphSnapshot, Synapse};
pub use crate::neuromod::NeuromodulatorState;
pub use crate::event::{Event, EventKind};

// Re-export the Cortex trait
pub use crate::cortex::Cortex;

// Re-export error types
pub use crate::error::{ConfigError, GraphError, Result, SymbioError};
