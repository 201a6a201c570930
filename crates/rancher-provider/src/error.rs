//! Provider error types.
//!
//! Errors from the Rancher client are wrapped as-is; everything else carries
//! a short message naming what failed.

use crate::wait::WaitError;
use rancher_client::RancherError;
use thiserror::Error;

/// Errors that can occur while managing a resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Rancher API error
    #[error(transparent)]
    Rancher(#[from] RancherError),

    /// Invalid provider configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The environment (Rancher project) does not exist
    #[error("Failed to find environment: {0}")]
    EnvironmentNotFound(String),

    /// The resource configuration failed schema validation
    #[error("Invalid resource configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Waiting for the remote object to reach a state failed
    #[error("{context}: {source}")]
    Wait {
        context: String,
        #[source]
        source: WaitError<RancherError>,
    },

    /// A host action (deactivate, delete) failed
    #[error("{0}")]
    Action(String),

    /// The operation needs a resource ID but the state has none
    #[error("Resource has no ID: {0}")]
    MissingId(String),

    /// Import ID is not of the form `<environment_id>/<host_id>`
    #[error("Invalid import ID {0:?}, expected <environment_id>/<host_id>")]
    InvalidImportId(String),

    /// The object to import does not exist
    #[error("Cannot import non-existent host: {0}")]
    ImportNotFound(String),
}
