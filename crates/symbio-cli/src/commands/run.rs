//! Run one episode over a prompt.

use anyhow::Result;
use colored::Colorize;
use symbio::prelude::*;
use tracing::info;

use super::load_trained;
use crate::config::{runs_dir, Config};

pub fn run(prompt: &str, steps: u64) -> Result<()> {
    let config = Config::load()?;
    let mut cortex = load_trained(&config)?;
    let edges_before = cortex.graph().edge_count();

    println!("{} Running {} ticks...", "→".blue(), steps.to_string().cyan());
    let summary = {
        let mut orchestrator = Orchestrator::from_config(&mut cortex, &config.symbio)?;
        orchestrator.run_episode(prompt, steps)?
    };
    let continuation = cortex.generate(prompt, config.symbio.cortex.max_new_tokens);

    save_cortex(&cortex, &config.model_path()?)?;
    let record_path = runs_dir()?.join("episode.json");
    save_run(
        &record_path,
        &RunRecord {
            config: config.symbio.clone(),
            episode: Some(summary.clone()),
            cycle: None,
        },
    )?;
    info!(path = %record_path.display(), "Episode record saved");

    println!();
    println!("{} Episode complete!", "✓".green().bold());
    println!("  Events: {}", summary.events.to_string().cyan());
    match summary.best_pos {
        Some((i, j)) => println!(
            "  Best: {} at ({}, {})",
            format!("{:.4}", summary.best_val).cyan(),
            i,
            j
        ),
        None => println!("  Best: {}", "none".yellow()),
    }
    println!("  Reinforcements: {}", summary.reinforcements.to_string().cyan());
    println!(
        "  Edges: {} → {}",
        edges_before.to_string().yellow(),
        cortex.graph().edge_count().to_string().green()
    );
    println!();
    println!("{}", continuation.bold());

    Ok(())
}
