//! ean-pricer - Enrich EAN lists with live PriceRunner offers

use anyhow::Result;
use clap::{Parser, Subcommand};
use ean_pricer::commands::{EnrichCommand, LookupCommand};
use ean_pricer::config::{Config, OutputFormat};
use ean_pricer::format::Formatter;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ean-pricer",
    version,
    about = "Enrich EAN lists with live PriceRunner offers",
    long_about = "Reads a CSV with an EAN column, looks every EAN up on PriceRunner, and writes the merchants and prices of in-stock offers to a new CSV."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PriceRunner market code (e.g. se)
    #[arg(short, long, global = true)]
    market: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PRICER_PROXY")]
    proxy: Option<String>,

    /// Output format for summaries and lookups
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a CSV of EANs with current offers (default)
    #[command(alias = "e")]
    Enrich {
        /// Input CSV (must have an EAN column)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum pause between rows in seconds
        #[arg(long)]
        delay_min: Option<u64>,

        /// Maximum pause between rows in seconds
        #[arg(long)]
        delay_max: Option<u64>,
    },

    /// Look up the offers for a single EAN
    #[command(alias = "l")]
    Lookup {
        /// EAN barcode
        ean: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(market) = cli.market {
        config.market = market;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let command = cli.command.unwrap_or(Commands::Enrich {
        input: None,
        output: None,
        delay_min: None,
        delay_max: None,
    });

    match command {
        Commands::Enrich { input, output, delay_min, delay_max } => {
            if let Some(input) = input {
                config.input = input;
            }
            if let Some(output) = output {
                config.output = output;
            }
            if let Some(min) = delay_min {
                config.delay_min_secs = min;
            }
            if let Some(max) = delay_max {
                config.delay_max_secs = max;
            }

            let formatter = Formatter::new(config.format);
            let summary = EnrichCommand::new(config).execute().await?;
            println!("{}", formatter.format_summary(&summary));
        }

        Commands::Lookup { ean } => {
            let output = LookupCommand::new(config).execute(&ean).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
