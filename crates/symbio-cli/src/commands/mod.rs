//! CLI command implementations.

pub mod autopoiesis;
pub mod init;
pub mod run;
pub mod train;
pub mod walk;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use symbio::prelude::*;
use tracing::info;

use crate::config::Config;

/// Load the trained cortex, or fail with a hint to train first.
pub(crate) fn load_trained(config: &Config) -> Result<BioCortex> {
    let model = config.model_path()?;
    if !cortex_exists(&model) {
        bail!("No trained cortex found. Run {} first.", "symbio train".cyan());
    }
    println!("{} Loading cortex...", "→".blue());
    let cortex = load_cortex(&model, config.symbio.cortex.clone(), config.symbio.graph.clone())
        .with_context(|| format!("Failed to load cortex: {}", model.display()))?;
    info!(model = %model.display(), "Trained cortex loaded");
    println!(
        "  Loaded: {} words, {} edges",
        cortex.vocab().len().to_string().cyan(),
        cortex.graph().edge_count().to_string().cyan()
    );
    Ok(cortex)
}

/// Read every matching file under `path` into memory.
pub(crate) fn read_texts(path: &str, extensions: &str) -> Result<Vec<String>> {
    let path = Path::new(path);
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    let ext_list: Vec<&str> = extensions.split(',').map(str::trim).collect();
    let files = collect_files(path, &ext_list)?;
    if files.is_empty() {
        bail!("No files found with extensions: {}", extensions);
    }
    files
        .iter()
        .map(|file| {
            std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read: {}", file.display()))
        })
        .collect()
}

pub(crate) fn tick_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn collect_files(path: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in walkdir(path)? {
            let ext = entry.extension().and_then(|e| e.to_str()).unwrap_or("");
            if extensions.contains(&ext) {
                files.push(entry);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn walkdir(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(walkdir(&path)?);
        } else {
            files.push(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_texts_filters_by_extension_in_path_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.txt"), "second").unwrap();
        std::fs::write(tmp.path().join("a.txt"), "first").unwrap();
        std::fs::write(tmp.path().join("skip.rs"), "fn main() {}").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested").join("c.md"), "third").unwrap();

        let texts = read_texts(tmp.path().to_str().unwrap(), "txt,md").unwrap();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn read_texts_rejects_missing_path() {
        assert!(read_texts("/definitely/not/here", "txt").is_err());
    }
}
