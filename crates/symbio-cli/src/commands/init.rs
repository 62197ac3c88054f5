//! Initialize a new Symbio project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Symbio project...", "→".blue());

    // Create .symbio directory
    let symbio_dir = base_path.join(".symbio");
    std::fs::create_dir_all(&symbio_dir)
        .with_context(|| format!("Failed to create {}", symbio_dir.display()))?;
    println!("  {} Created {}", "✓".green(), symbio_dir.display());

    let runs_dir = symbio_dir.join("runs");
    std::fs::create_dir_all(&runs_dir)
        .with_context(|| format!("Failed to create {}", runs_dir.display()))?;
    println!("  {} Created {}", "✓".green(), runs_dir.display());

    // Create default config
    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    let gitignore_path = symbio_dir.join(".gitignore");
    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, "model/\nruns/\n")?;
        println!("  {} Created {}", "✓".green(), gitignore_path.display());
    }

    println!();
    println!("{} Symbio project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} symbio train --data <texts>", "1.".blue());
    println!("  {} symbio run --prompt \"your prompt\"", "2.".blue());
    println!("  {} symbio autopoiesis --data <texts>", "3.".blue());

    Ok(())
}
