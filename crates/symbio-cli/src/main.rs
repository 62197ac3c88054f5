//! Symbio CLI - drive the symbiotic event loop from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "symbio")]
#[command(author, version, about = "Symbio - Text, field and swarm in one feedback loop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Symbio project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Train the cortex on text files
    Train {
        /// File or directory to learn from
        #[arg(short, long)]
        data: String,

        /// File extensions to include (e.g., "txt,md")
        #[arg(short, long, default_value = "txt,md")]
        extensions: String,
    },

    /// Run one episode over a prompt
    Run {
        /// Prompt injected into the field
        #[arg(short, long)]
        prompt: String,

        /// Number of ticks
        #[arg(short, long, default_value = "60")]
        steps: u64,
    },

    /// Inject texts, run the loop, and harvest sentences from hotspots
    Autopoiesis {
        /// File or directory of seed texts
        #[arg(short, long)]
        data: String,

        /// Number of ticks
        #[arg(short, long, default_value = "60")]
        steps: u64,

        /// Minimum hotspot value
        #[arg(short, long, default_value = "0.6")]
        threshold: f64,

        /// Maximum sentences to produce
        #[arg(short, long, default_value = "3")]
        max_sentences: usize,

        /// Write the cycle report to this JSON file
        #[arg(long)]
        save: Option<String>,
    },

    /// Random walk over the learned graph
    Walk {
        /// Walk seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Maximum number of steps
        #[arg(short, long, default_value = "12")]
        steps: usize,

        /// Pheromone bias exponent
        #[arg(short, long, default_value = "1.0")]
        bias: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "symbio=debug" } else { "symbio=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Train { data, extensions } => commands::train::run(&data, &extensions, cli.verbose),
        Commands::Run { prompt, steps } => commands::run::run(&prompt, steps),
        Commands::Autopoiesis {
            data,
            steps,
            threshold,
            max_sentences,
            save,
        } => commands::autopoiesis::run(&data, steps, threshold, max_sentences, save.as_deref()),
        Commands::Walk { seed, steps, bias } => commands::walk::run(seed, steps, bias),
    }
}
