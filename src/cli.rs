//! Command-line interface definition for Mdchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and one-shot image work.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mdchat - terminal chat client for generative AI
///
/// Converse with a Gemini-style backend, attach images, and generate or
/// edit images from prompts.
#[derive(Parser, Debug, Clone)]
#[command(name = "mdchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// API key for the gateway (overrides config file)
    #[arg(long, env = "MDCHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Mdchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Assistant persona to chat with (blue, red, green, purple)
        #[arg(short, long)]
        persona: Option<String>,
    },

    /// Generate an image from a prompt and save it to disk
    Image {
        /// Image description
        prompt: String,

        /// Output file path (default: mdchat-<timestamp>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Edit a local image according to a prompt
    Edit {
        /// Path to the source image
        image: PathBuf,

        /// Edit instruction
        prompt: String,

        /// Output file path (default: mdchat-<timestamp>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            api_key: None,
            verbose: false,
            command: Commands::Chat { persona: None },
        }
    }
}
