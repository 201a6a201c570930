//! Rancher API client
//!
//! Implements the Rancher `v2-beta` REST API client for host lifecycle operations.
//! Based on the Rancher API structure: `/projects/{id}` and `/projects/{id}/hosts/{id}`.

use crate::common::HttpClient;
use crate::error::RancherError;
use crate::models::*;
use crate::rancher_trait::RancherClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Rancher API client
///
/// The same type serves both the global API (`.../v2-beta`) and an
/// environment-scoped API (`.../v2-beta/projects/{id}`); only the base URL differs.
#[derive(Debug, Clone)]
pub struct RancherClient {
    http: HttpClient,
}

impl RancherClient {
    /// Create a new Rancher client
    ///
    /// # Arguments
    /// * `base_url` - Rancher API URL (e.g., "http://rancher:8080/v2-beta")
    /// * `access_key` - API access key (empty for an unauthenticated server)
    /// * `secret_key` - API secret key
    pub fn new(base_url: String, access_key: String, secret_key: String) -> Result<Self, RancherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http: HttpClient::new(client, base_url, access_key, secret_key),
        })
    }

    /// Create a client for another base URL sharing this client's credentials
    /// and connection pool
    pub fn with_base_url(&self, base_url: String) -> Self {
        Self {
            http: self.http.rebased(base_url),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Get a project (environment) by ID
    ///
    /// # Returns
    /// * `Ok(Some(Project))` - The project object
    /// * `Ok(None)` - If no project has that ID
    /// * `Err(RancherError)` - If the request fails
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, RancherError> {
        debug!("Fetching project {} from Rancher", id);
        self.http.get_optional(&format!("/projects/{}", urlencoding::encode(id))).await
    }

    /// List hosts
    ///
    /// # Arguments
    /// * `opts` - Collection query options; `ListOpts::all()` fetches every host
    ///
    /// # Returns
    /// * `Ok(Vec<Host>)` - Hosts across all pages
    /// * `Err(RancherError)` - If the request fails
    pub async fn list_hosts(&self, opts: &ListOpts) -> Result<Vec<Host>, RancherError> {
        let mut url = self.http.build_url("/hosts");
        if !opts.filters.is_empty() {
            url = format!("{}?{}", url, self.http.build_query_string(&opts.filters));
        }

        debug!("Listing hosts with filters: {:?}", opts.filters);
        self.http.fetch_all_pages(url).await
    }

    /// Get a host by ID
    ///
    /// # Returns
    /// * `Ok(Some(Host))` - The host object
    /// * `Ok(None)` - If no host has that ID
    /// * `Err(RancherError)` - If the request fails
    pub async fn get_host(&self, id: &str) -> Result<Option<Host>, RancherError> {
        debug!("Fetching host {} from Rancher", id);
        self.http.get_optional(&host_path(id)).await
    }

    /// Update a host's name, description and labels
    pub async fn update_host(&self, id: &str, update: &HostUpdate) -> Result<Host, RancherError> {
        debug!("Updating host {}", id);
        let body = serde_json::to_value(update)?;
        self.http.put(&host_path(id), &body).await
    }

    /// Run the `deactivate` action on a host
    pub async fn deactivate_host(&self, id: &str) -> Result<Host, RancherError> {
        debug!("Deactivating host {}", id);
        let path = format!("{}?action=deactivate", host_path(id));
        self.http.post(&path, &serde_json::json!({})).await
    }

    /// Delete a host
    pub async fn delete_host(&self, id: &str) -> Result<(), RancherError> {
        debug!("Deleting host {}", id);
        self.http.delete(&host_path(id)).await
    }
}

fn host_path(id: &str) -> String {
    format!("/hosts/{}", urlencoding::encode(id))
}

#[async_trait::async_trait]
impl RancherClientTrait for RancherClient {
    fn base_url(&self) -> &str {
        RancherClient::base_url(self)
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>, RancherError> {
        RancherClient::get_project(self, id).await
    }

    async fn list_hosts(&self, opts: &ListOpts) -> Result<Vec<Host>, RancherError> {
        RancherClient::list_hosts(self, opts).await
    }

    async fn get_host(&self, id: &str) -> Result<Option<Host>, RancherError> {
        RancherClient::get_host(self, id).await
    }

    async fn update_host(&self, id: &str, update: &HostUpdate) -> Result<Host, RancherError> {
        RancherClient::update_host(self, id, update).await
    }

    async fn deactivate_host(&self, id: &str) -> Result<Host, RancherError> {
        RancherClient::deactivate_host(self, id).await
    }

    async fn delete_host(&self, id: &str) -> Result<(), RancherError> {
        RancherClient::delete_host(self, id).await
    }
}
