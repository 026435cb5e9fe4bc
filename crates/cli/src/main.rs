//! Command Line Interface for the LP position stats service.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use lp_stats_api::{ApiServer, ServerConfig, connect_state};
use lp_stats_data::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser)]
#[command(name = "lp-stats")]
#[command(about = "Liquidity position stats service", long_about = None)]
struct Cli {
    /// Chain to serve or query (overrides NETWORK)
    #[arg(short, long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Host to bind (overrides API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the position stats of an account
    Stats {
        /// Account name
        #[arg(short, long)]
        account: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create the ledger and pool tables if they do not exist
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env().context("loading configuration")?;
    if let Some(network) = cli.network {
        config.network = network;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let server = ApiServer::connect(config)
                .await
                .context("connecting to stores")?;
            server.run().await?;
        }
        Commands::Stats { account, json } => {
            let state = connect_state(&config)
                .await
                .context("connecting to stores")?;
            let entries = state
                .stats
                .account_report(state.network.name(), &account)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Positions of {account} on {}:", state.network);
                output::stats_table(&entries).printstd();
            }
        }
        Commands::Migrate => {
            let database = Database::connect(&config.database_url, 1)
                .await
                .context("connecting to database")?;
            database.migrate().await?;
            info!("Schema is up to date");
        }
    }

    Ok(())
}
