//! Host operations for MockRancherClient

use super::MockRancherClient;
use crate::error::RancherError;
use crate::models::*;

/// Reveal pending hosts whose hidden window elapsed and advance every
/// host with queued states by one step.
fn observe(client: &MockRancherClient) {
    let mut hosts = client.hosts.lock().unwrap();

    let mut pending = client.pending_hosts.lock().unwrap();
    let mut still_hidden = Vec::new();
    for (host, hidden) in pending.drain(..) {
        if hidden == 0 {
            hosts.insert(host.id.clone(), host);
        } else {
            still_hidden.push((host, hidden - 1));
        }
    }
    *pending = still_hidden;

    let mut queued = client.queued_states.lock().unwrap();
    for (id, states) in queued.iter_mut() {
        let Some(host) = hosts.get_mut(id) else {
            continue;
        };
        if let Some(next) = states.pop_front() {
            if is_removed_state(&next) && host.removed.is_none() {
                host.removed = Some(chrono::Utc::now());
            }
            host.state = next;
        }
    }
    queued.retain(|_, states| !states.is_empty());

    let mut vanishing = client.vanishing.lock().unwrap();
    vanishing.retain(|id, remaining| {
        *remaining -= 1;
        if *remaining == 0 {
            hosts.remove(id);
            false
        } else {
            true
        }
    });
}

/// Put a host into `intermediate` and queue `target` after the configured steps
fn start_transition(client: &MockRancherClient, host: &mut Host, intermediate: &str, target: &str) {
    let steps = *client.transition_steps.lock().unwrap();
    host.state = intermediate.to_string();

    let mut queued = client.queued_states.lock().unwrap();
    let states = queued.entry(host.id.clone()).or_default();
    states.clear();
    states.extend(std::iter::repeat_n(intermediate.to_string(), steps));
    states.push_back(target.to_string());
}

pub async fn list_hosts(client: &MockRancherClient, opts: &ListOpts) -> Result<Vec<Host>, RancherError> {
    client.record("list_hosts", &client.base_url)?;
    observe(client);

    let hosts = client.hosts.lock().unwrap();
    let mut result: Vec<Host> = hosts
        .values()
        .filter(|h| {
            opts.filters.iter().all(|(key, value)| match key.as_str() {
                "hostname" => &h.hostname == value,
                "state" => &h.state == value,
                _ => true,
            })
        })
        .cloned()
        .collect();
    result.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(result)
}

pub async fn get_host(client: &MockRancherClient, id: &str) -> Result<Option<Host>, RancherError> {
    client.record("get_host", id)?;
    observe(client);
    Ok(client.hosts.lock().unwrap().get(id).cloned())
}

pub async fn update_host(client: &MockRancherClient, id: &str, update: &HostUpdate) -> Result<Host, RancherError> {
    client.record("update_host", id)?;

    let mut hosts = client.hosts.lock().unwrap();
    let host = hosts
        .get_mut(id)
        .ok_or_else(|| RancherError::NotFound(format!("Host {} not found", id)))?;
    host.name = Some(update.name.clone());
    host.description = update.description.clone();
    host.labels = update.labels.clone();
    Ok(host.clone())
}

pub async fn deactivate_host(client: &MockRancherClient, id: &str) -> Result<Host, RancherError> {
    client.record("deactivate_host", id)?;

    let mut hosts = client.hosts.lock().unwrap();
    let host = hosts
        .get_mut(id)
        .ok_or_else(|| RancherError::NotFound(format!("Host {} not found", id)))?;
    if host.state != STATE_ACTIVE && host.state != STATE_DISCONNECTED {
        return Err(RancherError::InvalidRequest(format!(
            "Action deactivate not available on host {} in state {}",
            id, host.state
        )));
    }
    start_transition(client, host, STATE_DEACTIVATING, STATE_INACTIVE);
    Ok(host.clone())
}

pub async fn delete_host(client: &MockRancherClient, id: &str) -> Result<(), RancherError> {
    client.record("delete_host", id)?;

    let mut hosts = client.hosts.lock().unwrap();
    let host = hosts
        .get_mut(id)
        .ok_or_else(|| RancherError::NotFound(format!("Host {} not found", id)))?;
    if host.state != STATE_INACTIVE {
        return Err(RancherError::InvalidRequest(format!(
            "Host {} must be inactive before removal, is {}",
            id, host.state
        )));
    }
    start_transition(client, host, STATE_REMOVING, STATE_REMOVED);
    Ok(())
}
