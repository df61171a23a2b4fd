//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scour: declarative cleaning rules for messy tabular data
#[derive(Parser)]
#[command(name = "scour")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print shape, types, missing values and consistency checks for a CSV file
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "CSV")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate cleaning rules from a sample of a CSV file
    Generate(GenerateArgs),

    /// Apply a rule file to a CSV file and write the cleaned data and log
    Apply(ApplyArgs),

    /// Check a rule file's structure and compile its patterns
    Validate {
        /// Path to the rule file
        #[arg(value_name = "RULES")]
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "CSV")]
    pub file: PathBuf,

    /// Use the offline heuristic generator instead of the OpenAI API
    #[arg(long)]
    pub mock: bool,

    /// OpenAI API key (or set OPENAI_API_KEY in .env)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model to use (e.g., "gpt-4.1", "gpt-4o")
    #[arg(long)]
    pub model: Option<String>,

    /// Temperature for generation
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Number of rows to sample for rule generation
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Seed for the row sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dataset description passed to the generator
    #[arg(short, long)]
    pub description: Option<String>,

    /// Output directory for the rule file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "CSV")]
    pub file: PathBuf,

    /// Rule file (default: <output-dir>/cleaning_rules.json)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output directory for cleaned data and log
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File name for the cleaned data
    #[arg(long)]
    pub output_filename: Option<String>,

    /// File name for the cleaning log
    #[arg(long)]
    pub log_filename: Option<String>,

    /// Print the applied rules and flag counts
    #[arg(long)]
    pub show_summary: bool,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
