//! CLI entry point for Parley.

pub mod render;
pub mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parley CLI
#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Parley: LLM agent loop in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with a model (one-shot with a prompt, interactive without)
    Chat(ChatArgs),
    /// List known providers and their endpoints
    Providers,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Provider (openai, anthropic, google, aipipe)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model name (defaults to the provider's default model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum request rounds per message
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_rounds: Option<usize>,

    /// Settings file (defaults to ~/.parley/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Send error turns back to the model
    #[arg(long, default_value = "false")]
    pub include_errors: bool,

    /// User prompt (positional)
    pub prompt: Option<String>,
}
