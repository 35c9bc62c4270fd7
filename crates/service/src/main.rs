//! Handheld companion daemon (handheldd)

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use handheld_companion_service::{Cli, Command, CompanionService, ServiceConfig, init_logging, list_devices};
use openhandheld_hid_common::hidapi_backend::HidApiPort;
use openhandheld_targets::NullBus;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command() {
        Command::PrintDefaultConfig => {
            println!("{}", ServiceConfig::default().to_json()?);
            Ok(())
        }
        Command::CheckConfig => {
            let path = config_path(&cli)?;
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                bail!("Config file not found: {}", path.display());
            }
            let config = load_config(&cli, &path).await?;
            config.validate().with_context(|| format!("Invalid config file: {}", path.display()))?;
            println!("{}: ok", path.display());
            Ok(())
        }
        Command::ListDevices => {
            let port = HidApiPort::new().context("Failed to initialize HID")?;
            let listings = list_devices(&port).await?;
            if listings.is_empty() {
                println!("No HID devices found");
            }
            for listing in listings {
                println!("{listing}");
            }
            Ok(())
        }
        Command::Run => run(&cli).await,
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let path = config_path(cli)?;
    let config = load_config(cli, &path).await?;
    init_logging(&config.log_level);

    info!("Starting handheldd v{}", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", path.display());

    let service = CompanionService::new(config)?;
    let port = HidApiPort::new().context("Failed to initialize HID")?;
    // No bus driver is linked in; the virtual pad reports go nowhere.
    let bus = Box::new(NullBus::new());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C, running until the peer stops us: {}", e);
            std::future::pending::<()>().await;
        }
    };
    service.run_with(&port, bus, shutdown).await?;

    info!("Service stopped");
    Ok(())
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => ServiceConfig::default_config_path(),
    }
}

async fn load_config(cli: &Cli, path: &Path) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::load_from_path(path).await?;
    cli.apply(&mut config);
    Ok(config)
}
