//! Rancher REST API Client
//!
//! A Rust client library for the Rancher `v2-beta` REST API.
//! Provides type-safe models and methods for the host and project
//! (environment) collections used to manage host lifecycles.
//!
//! # Example
//!
//! ```no_run
//! use rancher_client::{ListOpts, RancherClient, RancherClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an environment-scoped client
//! let client = RancherClient::new(
//!     "http://rancher:8080/v2-beta/projects/1a5".to_string(),
//!     "access-key".to_string(),
//!     "secret-key".to_string(),
//! )?;
//!
//! // List every host in the environment
//! let hosts = client.list_hosts(&ListOpts::all()).await?;
//!
//! // Look a host up by ID (None when it does not exist)
//! let host = client.get_host("1h5").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Hosts**: list, get, update, deactivate and delete
//! - **Projects**: resolve an environment ID to its scoped API URL
//! - **Pagination**: follows `pagination.next` links across collection pages
//! - **Mocking**: `MockRancherClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod rancher_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::RancherClient;
pub use common::HttpClient;
pub use error::RancherError;
pub use models::*;
pub use rancher_trait::RancherClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockRancherClient;
