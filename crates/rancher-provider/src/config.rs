//! Provider configuration.
//!
//! Settings come from `RANCHER_URL`, `RANCHER_ACCESS_KEY` and
//! `RANCHER_SECRET_KEY`. Values the environment leaves unset are filled from
//! the Rancher CLI config file (`RANCHER_CLIENT_CONFIG`, or
//! `~/.rancher/cli.json` by default).
//!
//! [`Config`] owns the account-level client and hands out clients scoped to
//! one environment (Rancher project), resolving each environment once.

use crate::error::ProviderError;
use async_trait::async_trait;
use rancher_client::{RancherClient, RancherClientTrait};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const ENV_URL: &str = "RANCHER_URL";
pub const ENV_ACCESS_KEY: &str = "RANCHER_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "RANCHER_SECRET_KEY";
pub const ENV_CLIENT_CONFIG: &str = "RANCHER_CLIENT_CONFIG";

/// Connection settings for the Rancher API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_url: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Subset of the Rancher CLI config file the provider reads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    access_key: Option<String>,
    #[serde(default)]
    secret_key: Option<String>,
}

impl CliConfig {
    fn load(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ProviderError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

fn default_cli_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".rancher").join("cli.json"))
}

impl ProviderSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns the value of an
    /// environment variable.
    ///
    /// An explicitly configured CLI config file must exist; the default one
    /// is optional.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let file = match lookup(ENV_CLIENT_CONFIG) {
            Some(path) => CliConfig::load(Path::new(&path))?,
            None => match default_cli_config_path().filter(|path| path.is_file()) {
                Some(path) => CliConfig::load(&path)?,
                None => CliConfig::default(),
            },
        };

        let api_url = lookup(ENV_URL).or(file.url).ok_or_else(|| {
            ProviderError::InvalidConfig(format!(
                "{} is required (environment or Rancher CLI config)",
                ENV_URL
            ))
        })?;

        let settings = Self {
            api_url: normalize_api_url(&api_url)?,
            access_key: lookup(ENV_ACCESS_KEY).or(file.access_key).unwrap_or_default(),
            secret_key: lookup(ENV_SECRET_KEY).or(file.secret_key).unwrap_or_default(),
        };
        debug!("Loaded provider settings for {}", settings.api_url);
        Ok(settings)
    }
}

/// Normalize a Rancher URL to the account-level API endpoint.
///
/// A trailing `/schemas` is dropped, and `/v2-beta` is appended unless the
/// URL already ends in an API version.
pub fn normalize_api_url(url: &str) -> Result<String, ProviderError> {
    let mut url = url.trim().trim_end_matches('/');
    if let Some(stripped) = url.strip_suffix("/schemas") {
        url = stripped.trim_end_matches('/');
    }
    if url.is_empty() {
        return Err(ProviderError::InvalidConfig("Rancher URL is empty".to_string()));
    }

    if url.ends_with("/v1") || url.ends_with("/v2-beta") {
        Ok(url.to_string())
    } else {
        Ok(format!("{}/v2-beta", url))
    }
}

/// Source of environment-scoped Rancher clients
#[async_trait]
pub trait EnvironmentClients: Send + Sync {
    /// Client whose base URL is the environment's API endpoint
    async fn environment_client(
        &self,
        environment_id: &str,
    ) -> Result<Arc<dyn RancherClientTrait>, ProviderError>;
}

/// Provider configuration: the account-level client plus a cache of
/// environment-scoped clients.
pub struct Config {
    settings: ProviderSettings,
    client: RancherClient,
    environments: Mutex<HashMap<String, Arc<dyn RancherClientTrait>>>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.settings.api_url)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let api_url = normalize_api_url(&settings.api_url)?;
        let client = RancherClient::new(
            api_url.clone(),
            settings.access_key.clone(),
            settings.secret_key.clone(),
        )?;

        info!("Rancher API: {}", api_url);
        Ok(Self {
            settings: ProviderSettings { api_url, ..settings },
            client,
            environments: Mutex::new(HashMap::new()),
        })
    }

    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(ProviderSettings::from_env()?)
    }

    pub fn api_url(&self) -> &str {
        &self.settings.api_url
    }

    /// The account-level client
    pub fn global_client(&self) -> &RancherClient {
        &self.client
    }
}

#[async_trait]
impl EnvironmentClients for Config {
    async fn environment_client(
        &self,
        environment_id: &str,
    ) -> Result<Arc<dyn RancherClientTrait>, ProviderError> {
        if environment_id.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "environment_id must not be empty".to_string(),
            ));
        }

        let mut environments = self.environments.lock().await;
        if let Some(client) = environments.get(environment_id) {
            return Ok(Arc::clone(client));
        }

        let project = self
            .client
            .get_project(environment_id)
            .await?
            .ok_or_else(|| ProviderError::EnvironmentNotFound(environment_id.to_string()))?;

        let base_url = project
            .links
            .get("self")
            .cloned()
            .unwrap_or_else(|| format!("{}/projects/{}", self.settings.api_url, environment_id));

        info!("Using environment {} at {}", environment_id, base_url);
        let client: Arc<dyn RancherClientTrait> = Arc::new(self.client.with_base_url(base_url));
        environments.insert(environment_id.to_string(), Arc::clone(&client));
        Ok(client)
    }
}
