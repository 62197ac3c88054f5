//! Train the cortex on text files.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::ProgressBar;
use symbio::prelude::*;
use tracing::info;

use super::{read_texts, tick_bar};
use crate::config::Config;

pub fn run(data: &str, extensions: &str, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let model = config.model_path()?;

    // Continue from an existing cortex when there is one
    let mut cortex = if cortex_exists(&model) {
        println!("{} Loading existing cortex...", "→".blue());
        load_cortex(&model, config.symbio.cortex.clone(), config.symbio.graph.clone())
            .with_context(|| format!("Failed to load cortex: {}", model.display()))?
    } else {
        BioCortex::new(config.symbio.cortex.clone(), config.symbio.graph.clone())
    };

    let texts = read_texts(data, extensions)?;
    println!(
        "{} Training on {} files...",
        "→".blue(),
        texts.len().to_string().cyan()
    );

    let pb = tick_bar(texts.len() as u64)?;
    let new_words = learn(&mut cortex, &texts, &pb, verbose);
    pb.finish_with_message("done");

    let consolidated = cortex.consolidate(config.symbio.cortex.replay_capacity);

    save_cortex(&cortex, &model)
        .with_context(|| format!("Failed to save cortex: {}", model.display()))?;
    info!(files = texts.len(), new_words, consolidated, "Training saved");

    println!();
    println!("{} Training complete!", "✓".green().bold());
    println!("  Words: {} ({} new)", cortex.vocab().len().to_string().cyan(), new_words);
    println!("  Edges: {}", cortex.graph().edge_count().to_string().cyan());
    println!("  Replayed: {}", consolidated.to_string().cyan());

    Ok(())
}

/// Fit every text in order. Returns how many words the vocabulary gained.
fn learn(cortex: &mut BioCortex, texts: &[String], pb: &ProgressBar, verbose: bool) -> usize {
    let words_before = cortex.vocab().len();
    for text in texts {
        cortex.fit(&[text]);
        if verbose {
            pb.set_message(format!("{} words", cortex.vocab().len()));
        }
        pb.inc(1);
    }
    cortex.vocab().len() - words_before
}
