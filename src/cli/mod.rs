use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::translate::translator::Tone;

#[derive(Parser)]
#[command(name = "honyaku")]
#[command(author, version, about = "Glossary-driven English to Japanese markdown translator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a text snippet or a single markdown file
    Translate(TranslateArgs),

    /// Translate every matching file under a directory
    Batch(BatchArgs),

    /// Show the loaded glossary
    Glossary(GlossaryArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Text to translate
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Input file and optional output file (defaults to <stem>.ja.<ext>)
    #[arg(short, long, num_args = 1..=2, value_names = ["INPUT", "OUTPUT"])]
    pub file: Option<Vec<PathBuf>>,

    /// Target tone
    #[arg(short, long, value_enum)]
    pub tone: Option<Tone>,

    /// Skip glossary substitution
    #[arg(long, default_value_t = false)]
    pub no_glossary: bool,

    /// Glossary file (TOML or JSON)
    #[arg(short, long)]
    pub glossary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Source directory
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File patterns, comma separated (e.g. "*.md,*.mdx")
    #[arg(short, long, value_delimiter = ',')]
    pub patterns: Option<Vec<String>>,

    /// Number of files translated at once
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Overwrite existing translations
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Do not back up files before overwriting them
    #[arg(long, default_value_t = false)]
    pub no_backup: bool,

    /// Target tone
    #[arg(short, long, value_enum)]
    pub tone: Option<Tone>,

    /// Batch config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a default batch config to this path and exit
    #[arg(long, value_name = "PATH")]
    pub create_config: Option<PathBuf>,

    /// Glossary file (TOML or JSON)
    #[arg(short, long)]
    pub glossary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct GlossaryArgs {
    /// Glossary file (TOML or JSON)
    #[arg(short, long)]
    pub glossary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., translation.tone)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show config file path
    Path,

    /// Edit config file with default editor
    Edit,
}
