//! Rancher host provider
//!
//! Declarative lifecycle management of Rancher 1.x hosts. A host record
//! (name, description, hostname, labels, environment) is reconciled against
//! the Rancher `v2-beta` API:
//!
//! - **Create** waits for the agent to register a host with the configured
//!   hostname, then applies the configured attributes
//! - **Read** refreshes the record, forgetting hosts that are gone or removed
//! - **Update** pushes name, description and labels
//! - **Delete** deactivates and removes the host, waiting for each step
//! - **Import** starts tracking an existing host by `<environment>/<host>` ID
//!
//! Labels the Rancher agent owns (`io.rancher.host.*` machine facts) are
//! hidden from the record and carried over on every update.
//!
//! # Example
//!
//! ```no_run
//! use rancher_provider::{Config, HostResource, Resource, ResourceData};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let hosts = HostResource::new(Arc::new(config));
//!
//! let mut data = ResourceData {
//!     name: "worker-1".to_string(),
//!     environment_id: "1a5".to_string(),
//!     hostname: "node-1".to_string(),
//!     ..Default::default()
//! };
//! hosts.create(&mut data).await?;
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod config;
pub mod error;
pub mod host;
pub mod labels;
pub mod resource;
pub mod schema;
pub mod state;
pub mod wait;

#[cfg(test)]
mod test_utils;

pub use config::{Config, EnvironmentClients, ProviderSettings};
pub use error::ProviderError;
pub use host::{HostResource, HostTimeouts};
pub use resource::Resource;
pub use schema::{host_schema, ResourceSchema};
pub use state::ResourceData;
pub use wait::{StateChangeConf, WaitError};
