//! ledgerweb main entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ledgerweb_api::start_server;
use ledgerweb_config::{Config, ConfigError, StoreBackend};
use ledgerweb_core::{Ledger, MemoryStore, StoreRef};
use ledgerweb_store::SqliteStore;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "ledgerweb")]
#[command(version = "0.1.0")]
#[command(about = "A small household ledger web application", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Storage backend, overriding `store.backend` (memory or sqlite)
    #[arg(long)]
    store: Option<StoreBackend>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (mut config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }
    if let Some(backend) = args.store {
        log::info!("Store backend overridden to {}", backend);
        config.store.backend = backend;
    }

    let store = open_store(&config)?;
    let ledger = Arc::new(Ledger::from_config(&config, store));
    log::info!(
        "Ledger '{}' ready: {} payers, {} input lines",
        config.ledger.name,
        ledger.payers().len(),
        ledger.input_lines()
    );

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, ledger))
        .context("Server error")?;

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<StoreRef> {
    match config.store.backend {
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; entries are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.store.path)
                .with_context(|| format!("Failed to open {}", config.store.path.display()))?;
            Ok(Arc::new(store))
        }
    }
}
