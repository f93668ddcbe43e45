use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minr::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minr=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            minr::cli::serve(args).await?;
        }
        Commands::Keygen {
            name,
            output,
            force,
        } => {
            minr::cli::keygen(name, output, force).await?;
        }
        Commands::Pull {
            model,
            revision,
            output,
        } => {
            minr::cli::pull(model, revision, output).await?;
        }
        Commands::Info { model, keyfile } => {
            minr::cli::info(model, keyfile).await?;
        }
    }

    Ok(())
}
