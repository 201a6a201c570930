//! Read-only host labels.
//!
//! The Rancher agent stamps every host with a handful of `io.rancher.host.*`
//! labels describing the machine. They are owned by Rancher: users never see
//! them in their configuration and their values survive every update.

use std::collections::BTreeMap;
use tracing::warn;

/// Labels set by the Rancher agent. Undocumented and not user-settable.
pub const READ_ONLY_LABELS: [&str; 4] = [
    "io.rancher.host.agent_image",
    "io.rancher.host.docker_version",
    "io.rancher.host.kvm",
    "io.rancher.host.linux_kernel_version",
];

pub fn is_read_only(key: &str) -> bool {
    READ_ONLY_LABELS.contains(&key)
}

/// Labels as shown to the user: the remote labels minus the read-only ones.
pub fn user_labels(remote: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    remote
        .iter()
        .filter(|(key, _)| !is_read_only(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Labels to send on update: the user's labels plus the read-only labels
/// carried over unchanged from the current remote host.
///
/// A read-only key supplied by the user is discarded; the remote value (or
/// the absence of one) wins.
pub fn merge_read_only(
    mut desired: BTreeMap<String, String>,
    remote: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    for key in READ_ONLY_LABELS {
        if let Some(value) = desired.remove(key) {
            warn!("Ignoring read-only label {}={} from configuration", key, value);
        }
        if let Some(value) = remote.get(key) {
            desired.insert(key.to_string(), value.clone());
        }
    }
    desired
}
