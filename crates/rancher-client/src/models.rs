//! Rancher API models
//!
//! These models match the Rancher `v2-beta` resource schemas for the
//! `host` and `project` types. Only the fields the host lifecycle needs are
//! modeled; unknown fields are ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Host state reported while the agent is registering
pub const STATE_REGISTERING: &str = "registering";
/// Host state reported while the host is being activated
pub const STATE_ACTIVATING: &str = "activating";
/// Host state for a healthy, schedulable host
pub const STATE_ACTIVE: &str = "active";
/// Host state for a host whose agent stopped reporting
pub const STATE_DISCONNECTED: &str = "disconnected";
/// Host state while a deactivation is in progress
pub const STATE_DEACTIVATING: &str = "deactivating";
/// Host state once deactivated
pub const STATE_INACTIVE: &str = "inactive";
/// Host state while a removal is in progress
pub const STATE_REMOVING: &str = "removing";
/// Host state once removed
pub const STATE_REMOVED: &str = "removed";
/// Host state while a removed host is being purged
pub const STATE_PURGING: &str = "purging";
/// Host state once purged
pub const STATE_PURGED: &str = "purged";

/// Collection response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination block of a collection response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub partial: bool,
}

/// Host model matching the Rancher `host` schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub agent_state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub removed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: HashMap<String, String>,
}

impl Host {
    /// Whether the host is in one of the removed-like states
    /// (`removed`, `purging`, `purged`).
    pub fn is_removed(&self) -> bool {
        is_removed_state(&self.state)
    }
}

/// Whether a state string denotes a removed (or being purged) resource
pub fn is_removed_state(state: &str) -> bool {
    state == STATE_REMOVED || state == STATE_PURGING || state == STATE_PURGED
}

/// Project (environment) model matching the Rancher `project` schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: HashMap<String, String>,
}

/// Request body for updating a host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUpdate {
    pub name: String,
    pub description: Option<String>,
    pub labels: BTreeMap<String, String>,
}

/// Collection query options
///
/// Rancher pages collections; a `limit` of `-2` asks for every item at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOpts {
    pub filters: Vec<(String, String)>,
}

impl ListOpts {
    /// Options that request the whole collection (`limit=-2`)
    pub fn all() -> Self {
        Self {
            filters: vec![("limit".to_string(), "-2".to_string())],
        }
    }

    /// Add a filter, e.g. `("hostname", "node-1")`
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
