//! Rancher Host Provider
//!
//! Runs a single `rancher_host` lifecycle operation. The state record is read
//! as JSON from `--state` (or stdin), and the resulting record is written to
//! stdout. Logs go to stderr; set `RUST_LOG` to change the level.
//!
//! Connection settings come from `RANCHER_URL`, `RANCHER_ACCESS_KEY` and
//! `RANCHER_SECRET_KEY`, falling back to the Rancher CLI config file.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use rancher_provider::{Config, HostResource, ResourceData};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut data = if cli.command.needs_state() {
        cli::load_state(cli.state.as_deref())?
    } else {
        ResourceData::default()
    };

    let config = Config::from_env().context("Failed to configure the Rancher provider")?;
    let resource = HostResource::new(Arc::new(config));

    info!("Running {:?}", cli.command);
    cli.command.run(&resource, &mut data).await?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
