//! Local state record of a managed host.
//!
//! Mirrors the resource schema. The record is what the configuration tool
//! persists between runs; an empty ID means the host is not tracked.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration and observed state of one `rancher_host` resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Rancher host ID (computed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Host name shown in Rancher
    #[serde(default)]
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Environment (Rancher project) the host belongs to
    #[serde(default)]
    pub environment_id: String,

    /// Hostname the agent registers with; used to find the host
    #[serde(default)]
    pub hostname: String,

    /// User-managed labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ResourceData {
    /// The tracked host ID, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The tracked host ID, or an error naming the operation that needs it
    pub fn require_id(&self, operation: &str) -> Result<&str, ProviderError> {
        self.id()
            .ok_or_else(|| ProviderError::MissingId(format!("{} needs a host ID", operation)))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the remote host; the configuration tool treats the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }
}
