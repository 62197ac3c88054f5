//! Random walk over the learned graph.

use anyhow::Result;
use colored::Colorize;
use symbio::prelude::*;

use super::load_trained;
use crate::config::Config;

pub fn run(seed: u64, steps: usize, bias: f64) -> Result<()> {
    let config = Config::load()?;
    let cortex = load_trained(&config)?;

    let path = cortex.graph().random_walk(seed, steps, bias);
    if path.is_empty() {
        println!("{} Graph has no edges to walk", "•".yellow());
        return Ok(());
    }

    println!();
    println!("{}", cortex.vocab().decode(&path).bold());
    println!("  {} nodes visited", path.len().to_string().cyan());

    Ok(())
}
