//! Error types for Symbio operations.
//!
//! Configuration problems are rejected at construction time. Invariant
//! violations surface from the associative graph. Unknown events are
//! tolerated by the orchestrator and only reported here for callers that
//! decode event streams themselves.

use crate::types::Edge;
use thiserror::Error;

/// Result type for Symbio operations.
pub type Result<T> = std::result::Result<T, SymbioError>;

/// Errors that can occur during Symbio operations.
#[derive(Debug, Error)]
pub enum SymbioError {
    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Associative graph invariant broken.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    /// An event kind outside the four known kinds.
    #[error("Unknown event kind: {0}")]
    UnknownEvent(String),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    /// Boundary policy name not recognized.
    #[error("Unknown boundary policy: {0} (expected reflect, periodic or clamp)")]
    UnknownBoundary(String),
}

/// Associative graph errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A stored quantity went negative outside the clamped update path.
    #[error("Negative {quantity} on edge {edge}: {value}")]
    NegativeValue {
        edge: Edge,
        quantity: &'static str,
        value: f64,
    },
    /// Reinforcement with a negative or non-finite amount.
    #[error("Invalid reinforcement amount: {0}")]
    InvalidReinforcement(f64),
    /// Edge key that does not parse as `a,b`.
    #[error("Malformed edge key: {0}")]
    MalformedEdgeKey(String),
}

// Convenience constructors
impl SymbioError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SymbioError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        SymbioError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    /// Whether this error is an invariant violation of the associative graph.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SymbioError::Graph(GraphError::NegativeValue { .. })
                | SymbioError::Graph(GraphError::InvalidReinforcement(_))
        )
    }
}
