//! The `rancher_host` resource.
//!
//! Hosts are not created through the API: a machine runs the Rancher agent,
//! which registers it. Create therefore waits for a host with the configured
//! hostname to show up and become active, then applies the configured name,
//! description and labels to it. Delete deactivates the host first, because
//! Rancher only removes inactive hosts.

pub mod refresh;


use crate::config::EnvironmentClients;
use crate::error::ProviderError;
use crate::labels;
use crate::resource::Resource;
use crate::schema::{host_schema, ResourceSchema};
use crate::state::ResourceData;
use crate::wait::{StateChangeConf, WaitError, NOT_FOUND_STATE};
use async_trait::async_trait;
use rancher_client::{
    HostUpdate, RancherClientTrait, RancherError, STATE_ACTIVATING, STATE_ACTIVE, STATE_DEACTIVATING,
    STATE_DISCONNECTED, STATE_INACTIVE, STATE_REGISTERING, STATE_REMOVED, STATE_REMOVING,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Consecutive refreshes a host may be missing while waiting for it to register
const REGISTRATION_NOT_FOUND_CHECKS: u32 = 50;

/// Timing of the host state waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostTimeouts {
    /// Bound on waiting for a new host to register and become active
    pub create: Duration,
    /// Bound on each of the deactivate and remove waits
    pub delete: Duration,
    /// Sleep before the first refresh of every wait
    pub delay: Duration,
    /// Minimum sleep between refreshes
    pub min_timeout: Duration,
}

impl Default for HostTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(10 * 60),
            delete: Duration::from_secs(10 * 60),
            delay: Duration::from_secs(1),
            min_timeout: Duration::from_secs(3),
        }
    }
}

/// Manages Rancher hosts
pub struct HostResource {
    clients: Arc<dyn EnvironmentClients>,
    timeouts: HostTimeouts,
}

impl std::fmt::Debug for HostResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostResource")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl HostResource {
    pub fn new(clients: Arc<dyn EnvironmentClients>) -> Self {
        Self {
            clients,
            timeouts: HostTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: HostTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    fn validate(&self, data: &ResourceData) -> Result<(), ProviderError> {
        let config = serde_json::to_value(data)
            .map_err(|e| ProviderError::Validation(vec![e.to_string()]))?;
        self.schema().validate(&config)
    }

    fn wait_conf(&self, pending: &[&str], target: &[&str], timeout: Duration) -> StateChangeConf {
        StateChangeConf::new(pending, target)
            .timeout(timeout)
            .delay(self.timeouts.delay)
            .min_timeout(self.timeouts.min_timeout)
    }

    /// Push name, description and labels to the host, keeping the
    /// read-only labels it already carries, then refresh the record.
    async fn apply(
        &self,
        client: &dyn RancherClientTrait,
        id: &str,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let Some(current) = client.get_host(id).await? else {
            warn!("Host {} disappeared before it could be updated, removing from state", id);
            data.clear_id();
            return Ok(());
        };

        let update = HostUpdate {
            name: data.name.clone(),
            description: data.description.clone(),
            labels: labels::merge_read_only(data.labels.clone(), &current.labels),
        };
        debug!("Updating host {} with {:?}", id, update);
        client.update_host(id, &update).await?;

        self.read_host(client, id, data).await
    }

    /// Copy the remote host into the record, or forget it when it is gone
    async fn read_host(
        &self,
        client: &dyn RancherClientTrait,
        id: &str,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let Some(host) = client.get_host(id).await? else {
            info!("Host {} not found, removing from state", id);
            data.clear_id();
            return Ok(());
        };

        if host.is_removed() {
            match host.removed {
                Some(removed) => info!("Host {} was removed on {}, removing from state", id, removed),
                None => info!("Host {} is {}, removing from state", id, host.state),
            }
            data.clear_id();
            return Ok(());
        }

        data.name = host.name.unwrap_or_default();
        data.description = host.description;
        data.hostname = host.hostname;
        data.labels = labels::user_labels(&host.labels);
        Ok(())
    }

    async fn deactivate(&self, client: &dyn RancherClientTrait, id: &str) -> Result<(), ProviderError> {
        info!("Deactivating host {}", id);
        client
            .deactivate_host(id)
            .await
            .map_err(|e| ProviderError::Action(format!("Error deactivating Host: {}", e)))?;

        self.wait_conf(
            &[STATE_ACTIVE, STATE_INACTIVE, STATE_DEACTIVATING],
            &[STATE_INACTIVE],
            self.timeouts.delete,
        )
        .wait_for_state(|| refresh::host_state_refresh(client, id))
        .await
        .map_err(|source| wait_error(format!("Error waiting for host ({}) to be deactivated", id), source))?;
        Ok(())
    }

    async fn remove(&self, client: &dyn RancherClientTrait, id: &str) -> Result<(), ProviderError> {
        info!("Removing host {}", id);
        client
            .delete_host(id)
            .await
            .map_err(|e| ProviderError::Action(format!("Error deleting Host: {}", e)))?;

        self.wait_conf(
            &[STATE_INACTIVE, STATE_REMOVED, STATE_REMOVING],
            &[STATE_REMOVED],
            self.timeouts.delete,
        )
        .wait_for_state(|| refresh::host_removal_refresh(client, id))
        .await
        .map_err(|source| wait_error(format!("Error waiting for host ({}) to be removed", id), source))?;
        Ok(())
    }
}

fn wait_error(context: String, source: WaitError<RancherError>) -> ProviderError {
    ProviderError::Wait { context, source }
}

#[async_trait]
impl Resource for HostResource {
    fn schema(&self) -> ResourceSchema {
        host_schema()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<(), ProviderError> {
        self.validate(data)?;
        info!(
            "Waiting for host {} to register in environment {}",
            data.hostname, data.environment_id
        );

        let client = self.clients.environment_client(&data.environment_id).await?;
        let hostname = data.hostname.clone();

        let host = self
            .wait_conf(
                &[
                    STATE_ACTIVE,
                    STATE_REMOVED,
                    STATE_REMOVING,
                    NOT_FOUND_STATE,
                    STATE_REGISTERING,
                    STATE_ACTIVATING,
                ],
                &[STATE_ACTIVE, STATE_DISCONNECTED],
                self.timeouts.create,
            )
            .not_found_checks(REGISTRATION_NOT_FOUND_CHECKS)
            .wait_for_state(|| refresh::find_host(client.as_ref(), &hostname))
            .await
            .map_err(|source| {
                wait_error(format!("Error waiting for host ({}) to be found", hostname), source)
            })?;

        info!("Host {} registered as {} ({})", hostname, host.id, host.state);
        data.set_id(host.id.clone());

        self.apply(client.as_ref(), &host.id, data).await
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), ProviderError> {
        let Some(id) = data.id().map(str::to_string) else {
            debug!("Host {} has no ID, nothing to read", data.hostname);
            return Ok(());
        };

        let client = self.clients.environment_client(&data.environment_id).await?;
        self.read_host(client.as_ref(), &id, data).await
    }

    async fn update(&self, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.require_id("update")?.to_string();
        self.validate(data)?;
        info!("Updating host {}", id);

        let client = self.clients.environment_client(&data.environment_id).await?;
        self.apply(client.as_ref(), &id, data).await
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.require_id("delete")?.to_string();
        let client = self.clients.environment_client(&data.environment_id).await?;

        let Some(host) = client.get_host(&id).await? else {
            info!("Host {} already gone", id);
            data.clear_id();
            return Ok(());
        };

        if host.is_removed() {
            info!("Host {} already {}", id, host.state);
            data.clear_id();
            return Ok(());
        }

        if host.state != STATE_INACTIVE {
            self.deactivate(client.as_ref(), &id).await?;
        }
        self.remove(client.as_ref(), &id).await?;

        info!("Host {} removed", id);
        data.clear_id();
        Ok(())
    }

    async fn import(&self, import_id: &str, data: &mut ResourceData) -> Result<(), ProviderError> {
        let (environment_id, host_id) = import_id
            .split_once('/')
            .filter(|(env, host)| !env.is_empty() && !host.is_empty() && !host.contains('/'))
            .ok_or_else(|| ProviderError::InvalidImportId(import_id.to_string()))?;

        info!("Importing host {} from environment {}", host_id, environment_id);
        data.environment_id = environment_id.to_string();
        data.set_id(host_id);

        self.read(data).await?;
        if data.id().is_none() {
            return Err(ProviderError::ImportNotFound(import_id.to_string()));
        }
        Ok(())
    }
}
