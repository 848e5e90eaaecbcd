//! Command-line argument definition.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

/// Default catalog path when none is given.
pub const DEFAULT_INPUT: &str = "Localizable.xcstrings";

/// xcstrings-translate - Fill missing translations in a string catalog using an LLM
#[derive(Parser, Debug, Clone)]
#[command(name = "xcstrings-translate")]
#[command(version)]
#[command(about = "Fill missing translations in an .xcstrings catalog using an LLM provider", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Catalog to translate
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Translation provider (openai, anthropic, gemini)
    #[arg(long, visible_alias = "model", default_value = "openai")]
    pub provider: String,

    /// Override the provider's model id
    #[arg(long)]
    pub model_id: Option<String>,

    /// Number of entries sent per request
    #[arg(long, visible_alias = "batch-size", default_value = "10")]
    pub chunk_size: NonZeroUsize,

    /// Translate a single entry and print the result without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the result back to the input file
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,

    /// Output path (default: <input>_translated_<timestamp>.xcstrings)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File listing the required language codes, one per line
    #[arg(long, default_value = crate::config::LANGUAGES_FILE)]
    pub languages_file: PathBuf,

    /// Optional prompt template; `{{LANGUAGES}}` is replaced with the language list
    #[arg(long, default_value = crate::config::PROMPT_FILE)]
    pub prompt_file: PathBuf,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Also append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output (equivalent to --log-level debug, plus a progress bar)
    #[arg(short, long)]
    pub verbose: bool,
}
