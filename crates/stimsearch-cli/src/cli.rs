//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "stimsearch",
    version,
    about = "Classify free-text records against the CDC and Bettano criteria rule sets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate the single-level CDC rule set, adding a `signal` column.
    Cdc(CdcArgs),

    /// Evaluate the three-level Bettano rule set, adding `level1..levelN`.
    Bettano(BettanoArgs),
}

#[derive(Parser)]
pub struct CdcArgs {
    /// CSV file with the records to classify.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Name of the free-text column to search.
    #[arg(long, default_value = "text")]
    pub text_col: String,

    /// Materialize per-term diagnostics (slow, memory heavy).
    #[arg(long)]
    pub tracing: bool,

    /// Directory containing the pattern files.
    #[arg(long, value_name = "DIR", default_value = "patterns")]
    pub patterns: PathBuf,

    /// Write the full result table to a CSV file instead of printing it.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct BettanoArgs {
    /// CSV file with the records to classify.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Name of the free-text column to search.
    #[arg(long, default_value = "text")]
    pub text_col: String,

    /// Name of the integer age column (required for --depth > 1).
    #[arg(long)]
    pub age_col: Option<String>,

    /// How many dependent levels to evaluate.
    #[arg(long, default_value_t = 3)]
    pub depth: usize,

    /// Materialize per-term diagnostics (slow, memory heavy).
    #[arg(long)]
    pub tracing: bool,

    /// Directory containing the pattern files.
    #[arg(long, value_name = "DIR", default_value = "patterns")]
    pub patterns: PathBuf,

    /// Write the full result table to a CSV file instead of printing it.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
