mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gantry", about = "Build, package, and ship service bundles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the service, bundle it, and ship it
    Deploy {
        /// Build a container image locally instead of uploading the bundle
        #[arg(long)]
        image: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { image } => commands::deploy(image).await?,
    }

    Ok(())
}
