//! Command line interface and state record I/O

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rancher_provider::{Resource, ResourceData};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Manage a Rancher host declaratively
#[derive(Debug, Parser)]
#[command(name = "rancher-host")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run one rancher_host lifecycle operation", long_about = None)]
pub struct Cli {
    /// JSON state record to operate on (stdin when omitted)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Wait for the host to register, then apply the configuration
    Create,
    /// Refresh the state record from Rancher
    Read,
    /// Push name, description and labels to the host
    Update,
    /// Deactivate and remove the host
    Delete,
    /// Start tracking an existing host
    Import {
        /// Import ID of the form <environment_id>/<host_id>
        id: String,
    },
}

impl Command {
    /// Whether the command starts from an existing state record
    pub fn needs_state(&self) -> bool {
        !matches!(self, Command::Import { .. })
    }

    pub async fn run(&self, resource: &dyn Resource, data: &mut ResourceData) -> Result<()> {
        match self {
            Command::Create => resource.create(data).await?,
            Command::Read => resource.read(data).await?,
            Command::Update => resource.update(data).await?,
            Command::Delete => resource.delete(data).await?,
            Command::Import { id } => resource.import(id, data).await?,
        }
        Ok(())
    }
}

/// Parse a state record from `path`, or from stdin when no path is given
pub fn load_state(path: Option<&Path>) -> Result<ResourceData> {
    let contents = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state from {}", path.display()))?,
        None => {
            let mut contents = String::new();
            std::io::stdin()
                .read_to_string(&mut contents)
                .context("Failed to read state from stdin")?;
            contents
        }
    };
    parse_state(&contents)
}

pub fn parse_state(contents: &str) -> Result<ResourceData> {
    if contents.trim().is_empty() {
        return Ok(ResourceData::default());
    }
    serde_json::from_str(contents).context("State is not a valid rancher_host record")
}
