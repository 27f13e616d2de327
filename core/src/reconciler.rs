//! C8: periodic reconciliation of records still in `unknown` status.
//!
//! The actual per-minute cadence is owned by the runtime (`listener`), which
//! calls [`run_once`] on a `tokio::time::interval`. This module only knows how
//! to do one pass; it never surfaces an error out of [`run_once`] — per the
//! design, the reconciler logs and continues, leaving affected records for
//! the next tick.

use {
    crate::{
        beacon,
        error::ServiceResult,
        store::{SignatureStore, UnknownRecordKey},
        types::{Network, Status},
    },
    std::collections::HashMap,
};

/// What a single reconciled key resolved to, for logging/testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Promote,
    Delete,
    NoOp,
}

/// The beacon-observed status for an unknown record maps directly to an action:
/// active promotes, inactive deletes, unknown (beacon still down) is a no-op.
fn decide_action(status: Status) -> ReconcileAction {
    match status {
        Status::Active => ReconcileAction::Promote,
        Status::Inactive => ReconcileAction::Delete,
        Status::Unknown => ReconcileAction::NoOp,
    }
}

fn group_by_network(keys: Vec<UnknownRecordKey>) -> HashMap<Network, Vec<UnknownRecordKey>> {
    let mut groups: HashMap<Network, Vec<UnknownRecordKey>> = HashMap::new();
    for key in keys {
        groups.entry(key.network).or_default().push(key);
    }
    groups
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub promoted: u32,
    pub deleted: u32,
}

/// Run one reconciliation pass. Never returns an error to the caller; any
/// per-step failure is logged and the loop moves on, per the design's "C8
/// never surfaces errors" rule.
pub async fn run_once(
    store: &SignatureStore,
    beacon_urls: &HashMap<Network, String>,
    client: &reqwest::Client,
) -> ReconcileSummary {
    match reconcile_once(store, beacon_urls, client).await {
        Ok(summary) => {
            log::debug!(
                "reconciler tick: promoted={} deleted={}",
                summary.promoted,
                summary.deleted
            );
            summary
        }
        Err(err) => {
            log::warn!("reconciler tick failed, will retry next minute: {err}");
            ReconcileSummary::default()
        }
    }
}

async fn reconcile_once(
    store: &SignatureStore,
    beacon_urls: &HashMap<Network, String>,
    client: &reqwest::Client,
) -> ServiceResult<ReconcileSummary> {
    let keys = store.unknown_record_keys().await?;
    if keys.is_empty() {
        return Ok(ReconcileSummary::default());
    }

    let mut summary = ReconcileSummary::default();
    for (network, group) in group_by_network(keys) {
        let Some(beacon_url) = beacon_urls.get(&network) else {
            log::warn!("no beacon URL configured for network {network}, skipping reconcile group");
            continue;
        };

        let pubkeys: Vec<String> = {
            let mut seen = std::collections::HashSet::new();
            group
                .iter()
                .map(|k| k.pubkey.clone())
                .filter(|p| seen.insert(p.clone()))
                .collect()
        };

        let statuses = match beacon::get_validators_status(client, beacon_url, &pubkeys).await {
            Ok(statuses) => statuses,
            Err(err) => {
                log::warn!("beacon lookup failed for network {network}, skipping group: {err}");
                continue;
            }
        };

        for key in group {
            let Some(status) = statuses.get(&key.pubkey).copied() else {
                continue;
            };
            match decide_action(status) {
                ReconcileAction::Promote => {
                    store
                        .promote_to_active(&key.pubkey, &key.tag, key.network)
                        .await?;
                    summary.promoted += 1;
                }
                ReconcileAction::Delete => {
                    store
                        .delete_if_still_unknown(&key.pubkey, &key.tag, key.network)
                        .await?;
                    summary.deleted += 1;
                }
                ReconcileAction::NoOp => {}
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_promotes_inactive_deletes_unknown_is_noop() {
        assert_eq!(decide_action(Status::Active), ReconcileAction::Promote);
        assert_eq!(decide_action(Status::Inactive), ReconcileAction::Delete);
        assert_eq!(decide_action(Status::Unknown), ReconcileAction::NoOp);
    }

    #[test]
    fn groups_keys_by_network() {
        let keys = vec![
            UnknownRecordKey {
                pubkey: "0xaa".to_string(),
                tag: "solo".to_string(),
                network: Network::Mainnet,
            },
            UnknownRecordKey {
                pubkey: "0xbb".to_string(),
                tag: "ssv".to_string(),
                network: Network::Holesky,
            },
            UnknownRecordKey {
                pubkey: "0xcc".to_string(),
                tag: "solo".to_string(),
                network: Network::Mainnet,
            },
        ];
        let groups = group_by_network(keys);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Network::Mainnet].len(), 2);
        assert_eq!(groups[&Network::Holesky].len(), 1);
    }
}
