//! Refresh functions polled by the host waits

use rancher_client::{Host, ListOpts, RancherClientTrait, RancherError, STATE_REMOVED};
use tracing::debug;

/// Look a host up by hostname across the whole environment.
///
/// `Ok(None)` while no host with that hostname has registered yet.
pub async fn find_host(
    client: &dyn RancherClientTrait,
    hostname: &str,
) -> Result<Option<(Host, String)>, RancherError> {
    let hosts = client.list_hosts(&ListOpts::all()).await?;

    match hosts.into_iter().find(|host| host.hostname == hostname) {
        Some(host) => {
            let state = host.state.clone();
            debug!("Found host {} ({}) in state {}", hostname, host.id, state);
            Ok(Some((host, state)))
        }
        None => {
            debug!("Host {} has not registered yet", hostname);
            Ok(None)
        }
    }
}

/// Current state of the host with `id`; `Ok(None)` when it does not exist.
pub async fn host_state_refresh(
    client: &dyn RancherClientTrait,
    id: &str,
) -> Result<Option<(Host, String)>, RancherError> {
    Ok(client.get_host(id).await?.map(|host| {
        let state = host.state.clone();
        (host, state)
    }))
}

/// Like [`host_state_refresh`], but a host that no longer exists is
/// reported as removed.
pub async fn host_removal_refresh(
    client: &dyn RancherClientTrait,
    id: &str,
) -> Result<Option<(Option<Host>, String)>, RancherError> {
    match client.get_host(id).await? {
        Some(host) => {
            let state = host.state.clone();
            Ok(Some((Some(host), state)))
        }
        None => {
            debug!("Host {} is gone, treating it as removed", id);
            Ok(Some((None, STATE_REMOVED.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rancher_client::mock::{test_host, MockRancherClient};

    #[tokio::test]
    async fn test_find_host_by_hostname() {
        let client = MockRancherClient::new("http://rancher.test/v2-beta/projects/1a5");
        client.add_host(test_host("1h1", "node-1", "active"));
        client.add_host(test_host("1h2", "node-2", "registering"));

        let (host, state) = find_host(&client, "node-2").await.unwrap().unwrap();
        assert_eq!(host.id, "1h2");
        assert_eq!(state, "registering");

        assert!(find_host(&client, "node-3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_host_propagates_list_errors() {
        let client = MockRancherClient::new("http://rancher.test/v2-beta/projects/1a5");
        client.fail_on("list_hosts", "boom");

        let err = find_host(&client, "node-1").await.unwrap_err();
        assert!(matches!(err, RancherError::Api(ref msg) if msg == "boom"), "got {err:?}");
    }

    #[tokio::test]
    async fn test_host_state_refresh() {
        let client = MockRancherClient::new("http://rancher.test/v2-beta/projects/1a5");
        client.add_host(test_host("1h1", "node-1", "inactive"));

        let (_, state) = host_state_refresh(&client, "1h1").await.unwrap().unwrap();
        assert_eq!(state, "inactive");
        assert!(host_state_refresh(&client, "1h9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_host_counts_as_removed() {
        let client = MockRancherClient::new("http://rancher.test/v2-beta/projects/1a5");

        let (host, state) = host_removal_refresh(&client, "1h1").await.unwrap().unwrap();
        assert!(host.is_none());
        assert_eq!(state, "removed");
    }
}
