//! RancherClient trait for mocking
//!
//! This trait abstracts the RancherClient to enable mocking in unit tests.
//! The concrete RancherClient implements this trait, and tests can use mock implementations.

use crate::error::RancherError;
use crate::models::*;

/// Trait for Rancher API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait RancherClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    // Projects (environments)
    async fn get_project(&self, id: &str) -> Result<Option<Project>, RancherError>;

    // Hosts
    async fn list_hosts(&self, opts: &ListOpts) -> Result<Vec<Host>, RancherError>;
    async fn get_host(&self, id: &str) -> Result<Option<Host>, RancherError>;
    async fn update_host(&self, id: &str, update: &HostUpdate) -> Result<Host, RancherError>;
    async fn deactivate_host(&self, id: &str) -> Result<Host, RancherError>;
    async fn delete_host(&self, id: &str) -> Result<(), RancherError>;
}
