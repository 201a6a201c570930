//! HTTP-level tests for the Rancher client
//!
//! These run against an `httpmock` server standing in for the Rancher API.

use httpmock::prelude::*;
use rancher_client::{HostUpdate, ListOpts, RancherClient, RancherError};
use serde_json::json;
use std::collections::BTreeMap;

const BASIC_AUTH: &str = "Basic a2V5OnNlY3JldA==";

fn env_client(server: &MockServer) -> RancherClient {
    RancherClient::new(
        server.url("/v2-beta/projects/1a5"),
        "key".to_string(),
        "secret".to_string(),
    )
    .expect("Failed to create client")
}

#[tokio::test]
async fn test_get_host_sends_basic_auth() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2-beta/projects/1a5/hosts/1h1")
                .header("Authorization", BASIC_AUTH);
            then.status(200).json_body(json!({
                "id": "1h1",
                "type": "host",
                "name": "worker-1",
                "hostname": "node-1",
                "state": "active",
                "labels": { "io.rancher.host.kvm": "true", "role": "worker" },
            }));
        })
        .await;

    let host = env_client(&server).get_host("1h1").await.unwrap().unwrap();

    mock.assert_async().await;
    assert_eq!(host.hostname, "node-1");
    assert_eq!(host.state, "active");
    assert_eq!(host.labels.get("role").map(String::as_str), Some("worker"));
}

#[tokio::test]
async fn test_get_host_not_found_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2-beta/projects/1a5/hosts/1h9");
            then.status(404).json_body(json!({ "type": "error", "status": 404, "code": "notFound" }));
        })
        .await;

    let host = env_client(&server).get_host("1h9").await.unwrap();
    assert!(host.is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2-beta/projects/1a5/hosts/1h1");
            then.status(401).body("Unauthorized");
        })
        .await;

    let err = env_client(&server).get_host("1h1").await.unwrap_err();
    assert!(matches!(err, RancherError::Authentication(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_hosts_follows_pagination() {
    let server = MockServer::start_async().await;
    let next = server.url("/v2-beta/projects/1a5/hosts?marker=m1");
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2-beta/projects/1a5/hosts")
                .query_param("limit", "-2");
            then.status(200).json_body(json!({
                "type": "collection",
                "data": [{ "id": "1h1", "hostname": "node-1", "state": "active" }],
                "pagination": { "next": next, "partial": true },
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2-beta/projects/1a5/hosts")
                .query_param("marker", "m1");
            then.status(200).json_body(json!({
                "type": "collection",
                "data": [{ "id": "1h2", "hostname": "node-2", "state": "registering" }],
                "pagination": { "next": null },
            }));
        })
        .await;

    let hosts = env_client(&server).list_hosts(&ListOpts::all()).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let hostnames: Vec<_> = hosts.iter().map(|h| h.hostname.as_str()).collect();
    assert_eq!(hostnames, vec!["node-1", "node-2"]);
}

#[tokio::test]
async fn test_update_host_puts_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/v2-beta/projects/1a5/hosts/1h1")
                .json_body(json!({
                    "name": "worker-1",
                    "description": "edge node",
                    "labels": { "io.rancher.host.kvm": "true", "role": "edge" },
                }));
            then.status(200).json_body(json!({
                "id": "1h1",
                "name": "worker-1",
                "description": "edge node",
                "hostname": "node-1",
                "state": "active",
                "labels": { "io.rancher.host.kvm": "true", "role": "edge" },
            }));
        })
        .await;

    let update = HostUpdate {
        name: "worker-1".to_string(),
        description: Some("edge node".to_string()),
        labels: BTreeMap::from([
            ("io.rancher.host.kvm".to_string(), "true".to_string()),
            ("role".to_string(), "edge".to_string()),
        ]),
    };
    let host = env_client(&server).update_host("1h1", &update).await.unwrap();

    mock.assert_async().await;
    assert_eq!(host.description.as_deref(), Some("edge node"));
}

#[tokio::test]
async fn test_deactivate_and_delete_host() {
    let server = MockServer::start_async().await;
    let deactivate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2-beta/projects/1a5/hosts/1h1")
                .query_param("action", "deactivate");
            then.status(202).json_body(json!({
                "id": "1h1", "hostname": "node-1", "state": "deactivating",
            }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v2-beta/projects/1a5/hosts/1h1");
            then.status(202).json_body(json!({
                "id": "1h1", "hostname": "node-1", "state": "removing",
            }));
        })
        .await;

    let client = env_client(&server);
    let host = client.deactivate_host("1h1").await.unwrap();
    assert_eq!(host.state, "deactivating");
    client.delete_host("1h1").await.unwrap();

    deactivate.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v2-beta/projects/1a5/hosts/1h1");
            then.status(500).body("boom");
        })
        .await;

    let err = env_client(&server).delete_host("1h1").await.unwrap_err();
    match err {
        RancherError::Api(msg) => assert!(msg.contains("500"), "unexpected message: {msg}"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_project() {
    let server = MockServer::start_async().await;
    let self_link = server.url("/v2-beta/projects/1a5");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2-beta/projects/1a5");
            then.status(200).json_body(json!({
                "id": "1a5",
                "type": "project",
                "name": "Default",
                "state": "active",
                "links": { "self": self_link },
            }));
        })
        .await;

    let global = RancherClient::new(server.url("/v2-beta"), "key".to_string(), "secret".to_string())
        .expect("Failed to create client");
    let project = global.get_project("1a5").await.unwrap().unwrap();
    assert_eq!(project.name.as_deref(), Some("Default"));
    assert!(project.links["self"].ends_with("/v2-beta/projects/1a5"));
}

#[tokio::test]
#[ignore] // Requires a running Rancher server
async fn test_live_list_hosts() {
    let url = std::env::var("RANCHER_URL").unwrap_or_else(|_| "http://localhost:8080/v2-beta".to_string());
    let access_key = std::env::var("RANCHER_ACCESS_KEY").unwrap_or_default();
    let secret_key = std::env::var("RANCHER_SECRET_KEY").unwrap_or_default();
    let environment = std::env::var("RANCHER_ENVIRONMENT_ID")
        .expect("RANCHER_ENVIRONMENT_ID environment variable must be set");

    let global = RancherClient::new(url, access_key, secret_key).expect("Failed to create client");
    let project = global
        .get_project(&environment)
        .await
        .expect("Failed to get project")
        .expect("Environment not found");
    let env = global.with_base_url(project.links["self"].clone());

    let hosts = env.list_hosts(&ListOpts::all()).await.expect("Failed to list hosts");
    println!("Found {} hosts", hosts.len());
}
