//! Symbio Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use symbio_runtime::prelude::*;
//! ```

// Re-export configuration
pub use crate::config::{CortexConfig, FieldConfig, ScheduleConfig, SwarmConfig, SymbioConfig};

// Re-export the habitat
pub use crate::swarm::{Agent, Swarm};
pub use crate::habitat::Habitat;

// Re-export the loop
pub use crate::orchestrator::{CycleReport, EpisodeSummary, Orchestrator};
pub use crate::feedback::{apply_feedback, detect_hotspots, FeedbackReport};

// Re-export the default cortex
pub use crate::biocortex::BioCortex;
pub use crate::replay::ReplayBuffer;
pub use crate::vocab::Vocabulary;
pub use crate::bridge::text_to_pulses;
pub use crate::autopoiesis::{aggregate_prompts, compose_prompt, synthesize_thoughts};

// Re-export session
pub use crate::session::{
    RunRecord, CortexState, SessionMetadata,
    save_cortex, load_cortex, cortex_exists, save_run, load_run,
};

// Re-export core
pub use symbio_core::prelude::*;
