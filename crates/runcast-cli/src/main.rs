mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runcast_cloud::DeployError;

#[derive(Parser)]
#[command(
    name = "runcast",
    about = "Compile a deployment config into `gcloud run deploy` and run it"
)]
#[command(version)]
struct Cli {
    /// Print the gcloud commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the build output to Cloud Run
    Deploy {
        /// Config file (defaults to ./runcast.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
    /// Print the version tag derived from the project manifest
    Tag {
        /// Config file (defaults to ./runcast.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
    /// Write a runcast.toml template to the current directory
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Deploy { config } => commands::deploy(config.as_deref(), cli.dry_run).await,
        Commands::Tag { config } => commands::tag(config.as_deref()),
        Commands::Init => commands::init_project(),
    };

    // gcloud's own exit status becomes ours.
    if let Err(err) = &result {
        if let Some(code) = err.downcast_ref::<DeployError>().and_then(DeployError::exit_code) {
            eprintln!("Error: {err:#}");
            std::process::exit(code);
        }
    }

    result
}
