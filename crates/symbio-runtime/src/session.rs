//! Session persistence - save/load a cortex and record finished runs.
//!
//! A cortex directory holds three JSON files:
//! - `vocab.json` - the word list, ids implied by position
//! - `graph.json` - `{"weights": {"a,b": w}, "pheromones": {"a,b": p}}`
//! - `cortex.json` - neuromodulator levels and save metadata
//!
//! Loaded graphs are validated; a snapshot with negative values is refused.

use crate::biocortex::BioCortex;
use crate::config::{CortexConfig, SymbioConfig};
use crate::orchestrator::{CycleReport, EpisodeSummary};
use crate::vocab::Vocabulary;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use symbio_core::cortex::Cortex;
use symbio_core::error::Result;
use symbio_core::graph::{AssociativeGraph, GraphConfig, GraphSnapshot};
use symbio_core::neuromod::NeuromodulatorState;
use tracing::info;

pub const VOCAB_FILE: &str = "vocab.json";
pub const GRAPH_FILE: &str = "graph.json";
pub const CORTEX_FILE: &str = "cortex.json";

/// Non-graph cortex state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CortexState {
    #[serde(default)]
    pub neuromod: NeuromodulatorState,
    pub metadata: SessionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub vocab_size: usize,
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(default)]
    pub replay_len: usize,
}

/// A finished run as written by [`save_run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub config: SymbioConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleReport>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write vocabulary, graph and neuromodulator state into `dir`, creating it if needed.
pub fn save_cortex(cortex: &BioCortex, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_json(&dir.join(VOCAB_FILE), cortex.vocab())?;
    write_json(&dir.join(GRAPH_FILE), &cortex.graph().to_snapshot())?;
    let state = CortexState {
        neuromod: *cortex.neuromod(),
        metadata: SessionMetadata {
            vocab_size: cortex.vocab().len(),
            node_count: cortex.graph().node_count(),
            edge_count: cortex.graph().edge_count(),
            replay_len: cortex.replay().len(),
        },
    };
    write_json(&dir.join(CORTEX_FILE), &state)?;
    info!(
        dir = %dir.display(),
        vocab = state.metadata.vocab_size,
        edges = state.metadata.edge_count,
        "Cortex saved"
    );
    Ok(())
}

/// Restore a cortex saved by [`save_cortex`].
///
/// `cortex.json` is optional; without it the neuromodulators start at baseline.
pub fn load_cortex(dir: &Path, config: CortexConfig, graph_config: GraphConfig) -> Result<BioCortex> {
    let vocab: Vocabulary = read_json(&dir.join(VOCAB_FILE))?;
    let snapshot: GraphSnapshot = read_json(&dir.join(GRAPH_FILE))?;
    let graph = AssociativeGraph::from_snapshot(&snapshot, graph_config)?;

    let state_path = dir.join(CORTEX_FILE);
    let neuromod = if state_path.exists() {
        read_json::<CortexState>(&state_path)?.neuromod
    } else {
        NeuromodulatorState::default()
    };

    info!(
        dir = %dir.display(),
        vocab = vocab.len(),
        edges = graph.edge_count(),
        "Cortex loaded"
    );
    Ok(BioCortex::from_parts(config, vocab, graph, neuromod))
}

/// Whether `dir` holds a saved cortex.
pub fn cortex_exists(dir: &Path) -> bool {
    dir.join(VOCAB_FILE).exists() && dir.join(GRAPH_FILE).exists()
}

pub fn save_run(path: &Path, record: &RunRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_json(path, record)
}

pub fn load_run(path: &Path) -> Result<RunRecord> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbio_core::error::SymbioError;
    use symbio_core::types::Edge;

    fn trained() -> BioCortex {
        let mut cortex = BioCortex::new(CortexConfig::default(), GraphConfig::default());
        cortex.fit(&["roots reach water", "water feeds roots"]);
        cortex.neuromod_mut().apply_reward(0.5);
        cortex
    }

    #[test]
    fn cortex_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let original = trained();
        save_cortex(&original, tmp.path()).unwrap();
        assert!(cortex_exists(tmp.path()));

        let loaded = load_cortex(tmp.path(), CortexConfig::default(), GraphConfig::default()).unwrap();
        assert_eq!(loaded.vocab(), original.vocab());
        assert_eq!(loaded.graph().edge_count(), original.graph().edge_count());
        assert_eq!(loaded.neuromod().dopamine, 1.5);
        let roots = loaded.vocab().id("roots").unwrap();
        let reach = loaded.vocab().id("reach").unwrap();
        assert_eq!(loaded.graph().pheromone(Edge::new(roots, reach)), 1.0);
    }

    #[test]
    fn graph_file_uses_string_edge_keys() {
        let tmp = tempfile::tempdir().unwrap();
        save_cortex(&trained(), tmp.path()).unwrap();
        let raw = std::fs::read_to_string(tmp.path().join(GRAPH_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["weights"]["0,1"].is_number());
        assert!(value["pheromones"]["0,1"].is_number());
    }

    #[test]
    fn negative_snapshot_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        save_cortex(&trained(), tmp.path()).unwrap();
        std::fs::write(
            tmp.path().join(GRAPH_FILE),
            r#"{"weights": {"0,1": -1.0}, "pheromones": {"0,1": 1.0}}"#,
        )
        .unwrap();
        let err = load_cortex(tmp.path(), CortexConfig::default(), GraphConfig::default()).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_cortex(&tmp.path().join("absent"), CortexConfig::default(), GraphConfig::default())
            .unwrap_err();
        assert!(matches!(err, SymbioError::Io(_)));
    }

    #[test]
    fn run_record_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("runs").join("episode.json");
        let record = RunRecord {
            config: SymbioConfig::default(),
            episode: Some(EpisodeSummary {
                events: 12,
                best_pos: Some((3, 4)),
                best_val: 1.25,
                reinforcements: 2,
            }),
            cycle: None,
        };
        save_run(&path, &record).unwrap();
        assert_eq!(load_run(&path).unwrap(), record);
    }
}
