//! Quote CLI
//!
//! Fetches the current quote from the quote server and records its bid.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use quotes_client::{QuotesClient, save_bid};

#[derive(Parser)]
#[command(name = "quote-client")]
#[command(author, version, about = "Records the current USD-BRL bid", long_about = None)]
struct Cli {
    /// Base URL of the quote server
    #[arg(long, env = "QUOTES_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Seconds allowed for the whole round trip
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,

    /// File that receives the bid line
    #[arg(long, env = "QUOTES_OUTPUT", default_value = "exchange.txt")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the quote and write the bid file (default)
    Save,
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client =
        QuotesClient::new(&cli.api_url).with_timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command.unwrap_or(Commands::Save) {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Save => {
            let quote = match client.fetch_bid().await {
                Ok(quote) => quote,
                Err(e) => {
                    eprintln!("Error fetching exchange rate: {}", e);
                    std::process::exit(1);
                }
            };

            // The round trip succeeded; a failed write is reported but not fatal.
            match save_bid(&cli.output, &quote.bid).await {
                Ok(()) => println!("Exchange rate saved successfully."),
                Err(e) => eprintln!("Error saving exchange rate: {}", e),
            }
        }
    }

    Ok(())
}
