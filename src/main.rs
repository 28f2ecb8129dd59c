use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewd::config::Settings;
use reviewd::server::{ServerConfig, start_server};

#[derive(Parser)]
#[command(name = "reviewd")]
#[command(version, about = "AI-powered code review backend")]
struct Cli {
    /// Address to bind the HTTP server on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to serve on
    #[arg(short, long, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the variables directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    start_server(ServerConfig {
        host: cli.host,
        port: cli.port,
        settings,
    })
    .await
}
