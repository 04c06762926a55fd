mod cli;
mod collector;
mod command;
mod config;
mod error;
mod logging;
mod parse;
mod registry;
mod server;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    match &cli.command {
        Some(cli::Commands::Version) => {
            println!("hostpulse v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(cli::Commands::Validate { config }) => {
            let path = config.as_ref().unwrap_or(&cli.config);
            match config::load(path) {
                Ok(_) => {
                    println!("Configuration OK: {}", path.display());
                    return Ok(());
                }
                Err(e) => {
                    eprintln!("Configuration invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => {}
    }

    logging::init(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting hostpulse");

    let config = config::load(&cli.config)?;

    if let Some(cli::Commands::Scrape) = &cli.command {
        return scrape_once(&config).await;
    }

    server::run(config).await
}

/// One-off collection cycle for ad-hoc inspection: print the snapshot and
/// exit non-zero if either source fails.
async fn scrape_once(config: &config::Config) -> Result<()> {
    let registry = Mutex::new(registry::MetricRegistry::new()?);
    let collector = collector::Collector::new(&config.sources);

    match collector.scrape(&registry).await {
        Ok(()) => {
            print!("{}", registry.lock().await.render()?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Scrape failed: {}", e);
            std::process::exit(1);
        }
    }
}
