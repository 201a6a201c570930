//! Test utilities for unit testing the host resource
//!
//! This module provides an in-memory [`EnvironmentClients`] backed by
//! `MockRancherClient` and helpers for building state records.

use crate::config::EnvironmentClients;
use crate::error::ProviderError;
use crate::host::HostResource;
use crate::state::ResourceData;
use async_trait::async_trait;
use rancher_client::{MockRancherClient, RancherClientTrait};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const TEST_ENVIRONMENT: &str = "1a5";

/// Environment clients served from a fixed map of mocks
#[derive(Debug, Default)]
pub struct MockEnvironments {
    clients: HashMap<String, MockRancherClient>,
}

impl MockEnvironments {
    pub fn with(mut self, environment_id: &str, client: MockRancherClient) -> Self {
        self.clients.insert(environment_id.to_string(), client);
        self
    }
}

#[async_trait]
impl EnvironmentClients for MockEnvironments {
    async fn environment_client(
        &self,
        environment_id: &str,
    ) -> Result<Arc<dyn RancherClientTrait>, ProviderError> {
        if environment_id.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "environment_id must not be empty".to_string(),
            ));
        }
        self.clients
            .get(environment_id)
            .map(|client| Arc::new(client.clone()) as Arc<dyn RancherClientTrait>)
            .ok_or_else(|| ProviderError::EnvironmentNotFound(environment_id.to_string()))
    }
}

/// Mock client for [`TEST_ENVIRONMENT`]
pub fn mock_client() -> MockRancherClient {
    MockRancherClient::new(format!(
        "http://rancher.test/v2-beta/projects/{}",
        TEST_ENVIRONMENT
    ))
}

/// Host resource whose only environment is [`TEST_ENVIRONMENT`], served by `client`
pub fn host_resource(client: &MockRancherClient) -> HostResource {
    let environments = MockEnvironments::default().with(TEST_ENVIRONMENT, client.clone());
    HostResource::new(Arc::new(environments))
}

/// Configured (not yet created) host record
pub fn host_data(hostname: &str, labels: &[(&str, &str)]) -> ResourceData {
    ResourceData {
        id: None,
        name: format!("{}-name", hostname),
        description: Some(format!("{} description", hostname)),
        environment_id: TEST_ENVIRONMENT.to_string(),
        hostname: hostname.to_string(),
        labels: label_map(labels),
    }
}

pub fn label_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
