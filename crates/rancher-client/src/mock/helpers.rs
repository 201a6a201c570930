//! Helper functions for creating Rancher model types in tests

use crate::models::*;
use std::collections::HashMap;

/// Build a host with the links and actions Rancher would report
pub fn test_host(id: &str, hostname: &str, state: &str) -> Host {
    let base = format!("http://rancher.test/v2-beta/projects/1a5/hosts/{}", id);
    Host {
        id: id.to_string(),
        name: Some(hostname.to_string()),
        hostname: hostname.to_string(),
        state: state.to_string(),
        account_id: Some("1a5".to_string()),
        created: Some(chrono::Utc::now()),
        links: HashMap::from([("self".to_string(), base.clone())]),
        actions: HashMap::from([(
            "deactivate".to_string(),
            format!("{}/?action=deactivate", base),
        )]),
        ..Default::default()
    }
}

/// Build an active project whose `self` link points under `api_url`
pub fn test_project(api_url: &str, id: &str) -> Project {
    Project {
        id: id.to_string(),
        name: Some(format!("env-{}", id)),
        state: "active".to_string(),
        links: HashMap::from([(
            "self".to_string(),
            format!("{}/projects/{}", api_url.trim_end_matches('/'), id),
        )]),
    }
}
