//! Mdchat - terminal chat client for generative AI
//!
//! Main entry point for the Mdchat application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mdchat::cli::{Cli, Commands};
use mdchat::commands;
use mdchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.clone();
    let config_path = config_path.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { persona } => {
            tracing::info!("Starting interactive chat session");
            if let Some(p) = &persona {
                tracing::debug!("Using persona override: {}", p);
            }
            commands::run_chat(config, persona).await?;
            Ok(())
        }
        Commands::Image { prompt, output } => {
            tracing::info!("Starting one-shot image generation");
            commands::run_image(config, prompt, output).await?;
            Ok(())
        }
        Commands::Edit {
            image,
            prompt,
            output,
        } => {
            tracing::info!("Starting one-shot image edit: {}", image.display());
            commands::run_edit(config, image, prompt, output).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mdchat=debug" } else { "mdchat=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
