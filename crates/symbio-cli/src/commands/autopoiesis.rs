//! Inject seed texts, run the loop and harvest sentences from hotspots.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use symbio::prelude::*;
use tracing::info;

use super::{load_trained, read_texts};
use crate::config::Config;

pub fn run(
    data: &str,
    steps: u64,
    threshold: f64,
    max_sentences: usize,
    save: Option<&str>,
) -> Result<()> {
    let config = Config::load()?;
    let mut cortex = load_trained(&config)?;
    let texts = read_texts(data, "txt,md")?;

    println!(
        "{} Seeding {} texts, running {} ticks...",
        "→".blue(),
        texts.len().to_string().cyan(),
        steps.to_string().cyan()
    );
    let report = {
        let mut orchestrator = Orchestrator::from_config(&mut cortex, &config.symbio)?;
        orchestrator.autopoietic_cycle(&texts, steps, threshold, max_sentences)?
    };

    save_cortex(&cortex, &config.model_path()?)?;
    if let Some(path) = save {
        let record = RunRecord {
            config: config.symbio.clone(),
            episode: None,
            cycle: Some(report.clone()),
        };
        save_run(Path::new(path), &record).with_context(|| format!("Failed to write {}", path))?;
        info!(path, "Cycle report saved");
        println!("  {} Saved {}", "✓".green(), path);
    }

    println!();
    println!(
        "{} {} hotspots at or above {}",
        "✓".green().bold(),
        report.hotspots.len().to_string().cyan(),
        threshold
    );
    for hotspot in report.hotspots.iter().take(5) {
        let tags: Vec<&str> = hotspot.tags.iter().map(|(tag, _)| tag.as_str()).collect();
        println!(
            "  ({:>3}, {:>3}) {:.3}  {}",
            hotspot.position.0,
            hotspot.position.1,
            hotspot.value,
            tags.join(", ").dimmed()
        );
    }

    println!();
    if report.sentences.is_empty() {
        println!("{} No sentences emerged", "•".yellow());
    }
    for (i, sentence) in report.sentences.iter().enumerate() {
        println!("{} {}", format!("{}.", i + 1).blue(), sentence);
    }

    Ok(())
}
