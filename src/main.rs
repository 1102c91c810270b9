//! Serving Gateway - Main Server
//!
//! HTTP gateway bridging a web chat frontend to a hosted model-serving endpoint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serving_gateway::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Chat gateway for a hosted model-serving endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable serving the frontend static files (API-only mode)
        #[arg(long)]
        no_frontend: bool,

        /// Path to the frontend build directory (overrides config)
        #[arg(long)]
        frontend_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,serving_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve {
            port,
            no_frontend,
            frontend_path,
        } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            if no_frontend {
                config.serve_frontend = false;
            }
            if let Some(path) = frontend_path {
                config.frontend_path = path;
            }
            serving_gateway::start_server(config).await
        }
    }
}
