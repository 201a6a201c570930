//! Mock RancherClient for unit testing
//!
//! This module provides a mock implementation of RancherClientTrait that can be used
//! in unit tests without requiring a running Rancher server.
//!
//! The mock is organized into modules:
//! - `hosts.rs` - Host operations (list, get, update, deactivate, delete)
//! - `helpers.rs` - Helper functions for building test models
//!
//! Host actions do not complete instantly: `deactivate_host` leaves the host
//! `deactivating` and `delete_host` leaves it `removing`. Every later
//! observation of the host (`get_host` or `list_hosts`) advances it one step
//! through its queued states, which lets tests exercise the polling paths.

mod helpers;
mod hosts;

pub use helpers::{test_host, test_project};

use crate::error::RancherError;
use crate::models::*;
use crate::rancher_trait::RancherClientTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock RancherClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Clone, Debug)]
pub struct MockRancherClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) hosts: Arc<Mutex<HashMap<String, Host>>>,
    pub(crate) projects: Arc<Mutex<HashMap<String, Project>>>,
    // Hosts that appear only after a number of observations
    pub(crate) pending_hosts: Arc<Mutex<Vec<(Host, usize)>>>,
    // States each host steps through, one per observation
    pub(crate) queued_states: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    // Observations a host stays in an intermediate action state
    pub(crate) transition_steps: Arc<Mutex<usize>>,
    // Hosts dropped from the store after a number of observations
    pub(crate) vanishing: Arc<Mutex<HashMap<String, usize>>>,
    // Operation name -> error message returned instead of success
    pub(crate) failures: Arc<Mutex<HashMap<String, String>>>,
    // Log of calls in order, e.g. "deactivate_host:1h1"
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl MockRancherClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            hosts: Arc::new(Mutex::new(HashMap::new())),
            projects: Arc::new(Mutex::new(HashMap::new())),
            pending_hosts: Arc::new(Mutex::new(Vec::new())),
            queued_states: Arc::new(Mutex::new(HashMap::new())),
            transition_steps: Arc::new(Mutex::new(0)),
            vanishing: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a host to the mock store (for test setup)
    pub fn add_host(&self, host: Host) {
        self.hosts.lock().unwrap().insert(host.id.clone(), host);
    }

    /// Add a host that stays invisible for `hidden_observations` list/get calls
    pub fn add_host_after(&self, host: Host, hidden_observations: usize) {
        self.pending_hosts.lock().unwrap().push((host, hidden_observations));
    }

    /// Add a project to the mock store (for test setup)
    pub fn add_project(&self, project: Project) {
        self.projects.lock().unwrap().insert(project.id.clone(), project);
    }

    /// Remove a host from the store, as if it was deleted out of band
    pub fn remove_host(&self, id: &str) {
        self.hosts.lock().unwrap().remove(id);
    }

    /// Drop a host from the store on its `observations`-th list/get call,
    /// as if Rancher purged it while it was being watched
    pub fn remove_host_after(&self, id: &str, observations: usize) {
        self.vanishing
            .lock()
            .unwrap()
            .insert(id.to_string(), observations.max(1));
    }

    /// Queue states the host moves through, one per observation
    pub fn queue_host_states(&self, id: &str, states: &[&str]) {
        self.queued_states
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .extend(states.iter().map(|s| s.to_string()));
    }

    /// Number of observations a deactivate or delete stays in its
    /// intermediate state before completing (default 0)
    pub fn set_transition_steps(&self, steps: usize) {
        *self.transition_steps.lock().unwrap() = steps;
    }

    /// Make `operation` (e.g. "deactivate_host") fail with an API error
    pub fn fail_on(&self, operation: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), message.to_string());
    }

    /// Snapshot of a stored host without advancing its queued states
    pub fn host(&self, id: &str) -> Option<Host> {
        self.hosts.lock().unwrap().get(id).cloned()
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Record a call and return the configured failure for it, if any
    pub(crate) fn record(&self, operation: &str, target: &str) -> Result<(), RancherError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, target));
        match self.failures.lock().unwrap().get(operation) {
            Some(message) => Err(RancherError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RancherClientTrait for MockRancherClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>, RancherError> {
        self.record("get_project", id)?;
        Ok(self.projects.lock().unwrap().get(id).cloned())
    }

    // Host operations - delegated to hosts module
    async fn list_hosts(&self, opts: &ListOpts) -> Result<Vec<Host>, RancherError> {
        hosts::list_hosts(self, opts).await
    }

    async fn get_host(&self, id: &str) -> Result<Option<Host>, RancherError> {
        hosts::get_host(self, id).await
    }

    async fn update_host(&self, id: &str, update: &HostUpdate) -> Result<Host, RancherError> {
        hosts::update_host(self, id, update).await
    }

    async fn deactivate_host(&self, id: &str) -> Result<Host, RancherError> {
        hosts::deactivate_host(self, id).await
    }

    async fn delete_host(&self, id: &str) -> Result<(), RancherError> {
        hosts::delete_host(self, id).await
    }
}
