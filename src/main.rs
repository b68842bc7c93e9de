use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// A simulated-trading and portfolio-tracking backend.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Refresh the ledger's cached prices from the quote provider and exit.
    RefreshPrices,
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the bind host from the configuration file.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port from the configuration file.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets (DATABASE_URL, provider API key) come from the environment; a
    // missing .env file is fine in containerized deployments.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = configuration::load_config()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let host = args.host.unwrap_or_else(|| settings.server.host.clone());
            let port = args.port.unwrap_or(settings.server.port);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            web_server::run_server(&settings, addr).await?;
        }
        Commands::RefreshPrices => {
            let state = web_server::bootstrap(&settings).await?;
            let report = state.refresher.refresh_all_prices().await?;
            println!(
                "Refreshed {} symbol(s), {} failure(s).",
                report.updated.len(),
                report.failed.len()
            );
            for failure in &report.failed {
                eprintln!("  {}: {}", failure.symbol, failure.error);
            }
        }
    }

    Ok(())
}
